//! Consumer side dari ring buffer.

use std::fmt;

use super::ring_buffer::RingBuffer;
use super::sync::{Arc, Ordering};

/// Satu-satunya handle pembaca untuk sebuah [`RingBuffer`].
///
/// Bisa dipindah ke thread lain (`Send` jika `T: Send`), tapi tidak bisa
/// di-clone: hanya ada satu consumer per buffer.
pub struct Consumer<T> {
    ring: Arc<RingBuffer<T>>,
    // Salinan tail milik consumer, di-refresh hanya saat terlihat kosong
    tail_cache: usize,
}

impl<T> Consumer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        let tail_cache = ring.tail().load(Ordering::Acquire);
        Self { ring, tail_cache }
    }

    /// Index head jika ada elemen yang siap dibaca.
    #[inline(always)]
    fn readable(&mut self) -> Option<usize> {
        let ring = &*self.ring;
        // Hanya consumer yang menulis head, Relaxed cukup
        let head = ring.head().load(Ordering::Relaxed);

        if head == self.tail_cache {
            // Acquire: pasangan dari Release-store tail di producer
            self.tail_cache = ring.tail().load(Ordering::Acquire);
            if head == self.tail_cache {
                return None;
            }
        }

        Some(head)
    }

    /// Lihat elemen di head tanpa mengeluarkannya (zero-copy).
    ///
    /// Returns `None` jika buffer kosong. Reference terikat ke `&mut self`,
    /// jadi tidak bisa dipakai lagi setelah [`Consumer::pop`].
    #[inline(always)]
    pub fn front(&mut self) -> Option<&T> {
        let head = self.readable()?;
        // SAFETY: slot head berada di [head, tail) dan baru akan dibebaskan
        // oleh pop() yang butuh &mut self
        Some(unsafe { self.ring.slot(head).get() })
    }

    /// Buang elemen di head.
    ///
    /// Returns `false` (tanpa mengubah state) jika buffer kosong.
    /// Elemen di-drop setelah head baru dipublish.
    #[inline(always)]
    #[must_use = "returns false when the buffer was empty and nothing was removed"]
    pub fn pop(&mut self) -> bool {
        self.try_pop().is_some()
    }

    /// Pop data dari buffer (Consumer side)
    ///
    /// Returns `Some(T)` jika ada data, `None` jika buffer kosong.
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub fn try_pop(&mut self) -> Option<T> {
        let head = self.readable()?;
        let ring = &*self.ring;

        // SAFETY: slot head sudah ditulis (Acquire pada tail) dan producer
        // tidak akan menyentuhnya sebelum head maju
        let value = unsafe { ring.slot(head).read() };

        // Release: pembacaan slot selesai sebelum producer melihat slot kosong
        ring.head().store(ring.next_index(head), Ordering::Release);

        Some(value)
    }

    /// Cek apakah buffer terlihat kosong (best-effort).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Cek apakah buffer terlihat penuh (best-effort).
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
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

    /// Ring buffer yang dipakai bersama producer.
    pub fn buffer(&self) -> &RingBuffer<T> {
        &self.ring
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("ring", &*self.ring)
            .field("tail_cache", &self.tail_cache)
            .finish()
    }
}
