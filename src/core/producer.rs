//! Producer side dari ring buffer.

use std::fmt;

use super::ring_buffer::RingBuffer;
use super::sync::{Arc, Ordering};

/// Satu-satunya handle penulis untuk sebuah [`RingBuffer`].
///
/// Bisa dipindah ke thread lain (`Send` jika `T: Send`), tapi tidak bisa
/// di-clone: hanya ada satu producer per buffer.
pub struct Producer<T> {
    ring: Arc<RingBuffer<T>>,
    // Salinan head milik producer, di-refresh hanya saat terlihat penuh
    head_cache: usize,
}

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        let head_cache = ring.head().load(Ordering::Acquire);
        Self { ring, head_cache }
    }

    /// Push data ke buffer (Producer side)
    ///
    /// Returns `Ok(())` jika berhasil, `Err(value)` jika buffer penuh. Saat
    /// penuh tidak ada state yang berubah dan value dikembalikan utuh.
    /// Zero-allocation, lock-free, tidak pernah retry.
    #[inline(always)]
    pub fn try_push(&mut self, value: T) -> Result<(), T> {
        match self.claim() {
            Some((tail, next_tail)) => {
                self.commit(tail, next_tail, value);
                Ok(())
            }
            None => Err(value),
        }
    }

    /// Push salinan dari `value`.
    ///
    /// Clone hanya dilakukan jika ada slot kosong.
    /// Returns `false` jika buffer penuh.
    #[inline(always)]
    pub fn try_push_clone(&mut self, value: &T) -> bool
    where
        T: Clone,
    {
        match self.claim() {
            Some((tail, next_tail)) => {
                self.commit(tail, next_tail, value.clone());
                true
            }
            None => false,
        }
    }

    /// Cari slot kosong di tail. Returns `(tail, next_tail)` atau `None` jika penuh.
    #[inline(always)]
    fn claim(&mut self) -> Option<(usize, usize)> {
        let ring = &*self.ring;
        // Hanya producer yang menulis tail, Relaxed cukup
        let tail = ring.tail().load(Ordering::Relaxed);
        let next_tail = ring.next_index(tail);

        if next_tail == self.head_cache {
            // Acquire: pasangan dari Release-store head di consumer, slot
            // yang sudah di-pop selesai dibaca sebelum kita menimpanya
            self.head_cache = ring.head().load(Ordering::Acquire);
            if next_tail == self.head_cache {
                return None;
            }
        }

        Some((tail, next_tail))
    }

    #[inline(always)]
    fn commit(&self, tail: usize, next_tail: usize, value: T) {
        let ring = &*self.ring;

        // SAFETY: claim() memastikan slot tail berada di luar [head, tail),
        // dan hanya producer ini yang menulis slot tersebut
        unsafe { ring.slot(tail).write(value) };

        // Release: tulisan slot di atas visible sebelum tail baru terlihat consumer
        ring.tail().store(next_tail, Ordering::Release);
    }

    /// Cek apakah buffer terlihat penuh (best-effort).
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Cek apakah buffer terlihat kosong (best-effort).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Perkiraan jumlah elemen dalam buffer.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Kapasitas yang bisa dipakai.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Ring buffer yang dipakai bersama consumer.
    pub fn buffer(&self) -> &RingBuffer<T> {
        &self.ring
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("ring", &*self.ring)
            .field("head_cache", &self.head_cache)
            .finish()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_try_push_returns_value_when_full() {
        let (mut producer, _consumer) = RingBuffer::new(2).unwrap().split();

        assert!(producer.try_push(vec![1, 2, 3]).is_ok());
        let rejected = producer.try_push(vec![4, 5]).unwrap_err();
        assert_eq!(rejected, vec![4, 5]);
        assert_eq!(producer.len(), 1);
    }

    #[test]
    fn test_try_push_clone() {
        let (mut producer, mut consumer) = RingBuffer::new(3).unwrap().split();
        let value = String::from("payload");

        assert!(producer.try_push_clone(&value));
        assert!(producer.try_push_clone(&value));
        assert!(producer.try_push_clone(&value));
        assert!(!producer.try_push_clone(&value));

        // Source tetap bisa dipakai
        assert_eq!(value, "payload");
        assert_eq!(consumer.try_pop().as_deref(), Some("payload"));
        assert!(producer.try_push_clone(&value));
    }

    #[test]
    fn test_no_clone_when_full() {
        use std::cell::Cell;

        struct Counted<'a>(&'a Cell<usize>);

        impl Clone for Counted<'_> {
            fn clone(&self) -> Self {
                self.0.set(self.0.get() + 1);
                Counted(self.0)
            }
        }

        let clones = Cell::new(0);
        let source = Counted(&clones);
        let (mut producer, _consumer) = RingBuffer::new(2).unwrap().split();

        assert!(producer.try_push_clone(&source));
        assert!(!producer.try_push_clone(&source));
        assert_eq!(clones.get(), 1);
    }

    #[test]
    fn test_head_cache_refreshed_after_pop() {
        let (mut producer, mut consumer) = RingBuffer::new(4).unwrap().split();
        for i in 0..3u8 {
            producer.try_push(i).unwrap();
        }
        assert!(producer.try_push(3).is_err());
        let stale = producer.head_cache;

        assert_eq!(consumer.try_pop(), Some(0));
        assert!(producer.try_push(3).is_ok());
        assert_ne!(producer.head_cache, stale);
    }
}
