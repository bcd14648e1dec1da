//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring Buffer
//!
//! Implementasi menggunakan Lamport Queue dengan memory ordering yang tepat.
//! Tidak ada Mutex, tidak ada CAS, tidak ada alokasi setelah inisialisasi.
//!
//! Index `head` dan `tail` selalu disimpan dalam range `0..slots` (sudah
//! di-mask). Satu slot selalu dibiarkan kosong sehingga `head == tail`
//! berarti kosong dan `(tail + 1) & mask == head` berarti penuh.
//!
//! ```text
//! Producer: tulis slot, lalu Release-store tail  ->  Consumer: Acquire-load tail, baca slot
//! Consumer: baca slot, lalu Release-store head   ->  Producer: Acquire-load head, tulis slot
//! ```

use std::fmt;
use std::mem::{self, MaybeUninit};

use super::consumer::Consumer;
use super::error::{Result, RingBufferError};
use super::producer::Producer;
use super::sync::{Arc, AtomicUsize, Ordering, UnsafeCell};

/// Jumlah slot minimum. Dengan satu slot cadangan, buffer 1 slot tidak
/// pernah bisa menampung elemen.
const MIN_SLOTS: usize = 2;

/// Slot dalam ring buffer
pub(crate) struct Slot<T> {
    data: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    #[cfg(feature = "loom")]
    fn new() -> Self {
        Self {
            data: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// # Safety
    /// Hanya producer, dan slot harus berada di luar range `[head, tail)`.
    #[inline(always)]
    pub(crate) unsafe fn write(&self, value: T) {
        self.data.with_mut(|ptr| unsafe {
            (*ptr).write(value);
        });
    }

    /// Move elemen keluar dari slot. Setelah ini slot dianggap kosong.
    ///
    /// # Safety
    /// Hanya consumer, dan slot harus berada di dalam range `[head, tail)`.
    #[inline(always)]
    pub(crate) unsafe fn read(&self) -> T {
        self.data.with(|ptr| unsafe { (*ptr).assume_init_read() })
    }

    /// # Safety
    /// Sama seperti [`Slot::read`]; reference tidak boleh hidup melewati
    /// publish `head` berikutnya.
    #[inline(always)]
    pub(crate) unsafe fn get(&self) -> &T {
        // Reference keluar dari closure: di bawah loom akses hanya dicatat
        // saat borrow dibuat, bukan saat caller membaca lewat reference ini.
        self.data.with(|ptr| unsafe { &*(*ptr).as_ptr() })
    }

    /// # Safety
    /// Slot harus berisi elemen yang sudah diinisialisasi dan tidak ada
    /// akses lain secara bersamaan.
    unsafe fn drop_in_place(&self) {
        self.data.with_mut(|ptr| unsafe { (*ptr).assume_init_drop() });
    }
}

/// Padding untuk cache line isolation (64 bytes pada x86-64)
#[repr(C, align(64))]
struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

/// Lock-Free SPSC Ring Buffer
///
/// Menggunakan separate cache lines untuk head dan tail
/// untuk menghindari false sharing antara producer dan consumer.
///
/// Buffer dibuat dengan [`RingBuffer::new`] lalu dipecah dengan
/// [`RingBuffer::split`] menjadi tepat satu [`Producer`] dan satu
/// [`Consumer`]. Setelah split, ring tinggal di satu alokasi bersama dan
/// tidak bisa dipindah atau diduplikasi.
///
/// ```
/// use spsc_ring::RingBuffer;
///
/// let (mut producer, mut consumer) = RingBuffer::new(4).unwrap().split();
/// assert_eq!(producer.capacity(), 3);
///
/// assert!(producer.try_push("A").is_ok());
/// assert_eq!(consumer.try_pop(), Some("A"));
/// assert_eq!(consumer.try_pop(), None);
/// ```
#[repr(C)]
pub struct RingBuffer<T> {
    // Consumer index - hanya ditulis oleh consumer
    head: CacheLinePadded<AtomicUsize>,
    // Producer index - hanya ditulis oleh producer
    tail: CacheLinePadded<AtomicUsize>,
    // Pre-allocated buffer di heap - tidak ada alokasi setelah init
    slots: Box<[Slot<T>]>,
    // Mask untuk operasi modulo yang cepat (jumlah slot selalu power of 2)
    mask: usize,
}

// SAFETY: RingBuffer aman untuk Send/Sync karena:
// - Hanya satu producer (menulis tail), dijamin oleh Producer yang tidak Clone
// - Hanya satu consumer (menulis head), dijamin oleh Consumer yang tidak Clone
// - Setiap slot hanya diakses oleh satu role pada satu waktu, dan
//   perpindahan kepemilikan slot dipublish lewat Release/Acquire
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

/// Membulatkan kapasitas yang diminta ke jumlah slot (power of 2, minimal 2).
///
/// Permintaan `0` diperlakukan sebagai `1`. Mengembalikan `None` jika hasil
/// pembulatan tidak muat di `usize`.
pub(crate) fn slot_count_for(requested: usize) -> Option<usize> {
    requested
        .max(1)
        .checked_next_power_of_two()
        .map(|slots| slots.max(MIN_SLOTS))
}

/// Mengisi `slots` sampai `count` slot kosong. Kapasitas sudah di-reserve.
#[cfg(not(feature = "loom"))]
fn fill_slots<T>(slots: &mut Vec<Slot<T>>, count: usize) {
    debug_assert!(slots.capacity() >= count);
    // SAFETY: Slot<T> hanya membungkus MaybeUninit<T>, memori yang belum
    // diinisialisasi adalah nilai yang valid. O(1), juga untuk T zero-sized.
    unsafe { slots.set_len(count) };
}

/// Cell loom harus dibuat satu per satu agar akses bisa dilacak.
#[cfg(feature = "loom")]
fn fill_slots<T>(slots: &mut Vec<Slot<T>>, count: usize) {
    slots.extend((0..count).map(|_| Slot::new()));
}

impl<T> RingBuffer<T> {
    /// Membuat ring buffer baru.
    ///
    /// `requested` dibulatkan ke power of 2 berikutnya (minimal 2 slot).
    /// Kapasitas yang bisa dipakai adalah jumlah slot dikurangi satu.
    ///
    /// Alokasi hanya terjadi sekali saat inisialisasi.
    /// Setelah itu, tidak ada alokasi di hot path.
    ///
    /// # Errors
    /// [`RingBufferError::CapacityOverflow`] jika pembulatan overflow,
    /// [`RingBufferError::AllocationFailed`] jika storage tidak bisa dialokasi.
    pub fn new(requested: usize) -> Result<Self> {
        let slot_count =
            slot_count_for(requested).ok_or(RingBufferError::CapacityOverflow { requested })?;

        // Alokasi buffer di heap, gagal dengan error alih-alih abort
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(slot_count)
            .map_err(|_| RingBufferError::AllocationFailed {
                slots: slot_count,
                bytes: slot_count.saturating_mul(mem::size_of::<Slot<T>>()),
            })?;
        fill_slots(&mut slots, slot_count);

        log::debug!(
            "ring buffer allocated: requested={} slots={} usable={}",
            requested,
            slot_count,
            slot_count - 1
        );

        Ok(Self {
            head: CacheLinePadded::new(AtomicUsize::new(0)),
            tail: CacheLinePadded::new(AtomicUsize::new(0)),
            slots: slots.into_boxed_slice(),
            mask: slot_count - 1,
        })
    }

    /// Memecah buffer menjadi satu-satunya producer dan consumer.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        let ring = Arc::new(self);
        (Producer::new(Arc::clone(&ring)), Consumer::new(ring))
    }

    /// Kapasitas yang bisa dipakai (jumlah slot - 1).
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Jumlah slot yang dialokasi. Untuk debugging/testing.
    #[inline(always)]
    pub fn buffer_size(&self) -> usize {
        self.slots.len()
    }

    /// Perkiraan jumlah elemen dalam buffer.
    ///
    /// Hanya exact jika tidak ada push/pop yang berjalan bersamaan.
    #[inline(always)]
    pub fn len(&self) -> usize {
        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Relaxed);
        tail.wrapping_sub(head) & self.mask
    }

    /// Cek apakah buffer kosong (best-effort, bisa stale).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.head.value.load(Ordering::Relaxed) == self.tail.value.load(Ordering::Relaxed)
    }

    /// Cek apakah buffer penuh (best-effort, bisa stale).
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        let next_tail = self.next_index(self.tail.value.load(Ordering::Relaxed));
        next_tail == self.head.value.load(Ordering::Relaxed)
    }

    #[inline(always)]
    pub(crate) fn head(&self) -> &AtomicUsize {
        &self.head.value
    }

    #[inline(always)]
    pub(crate) fn tail(&self) -> &AtomicUsize {
        &self.tail.value
    }

    #[inline(always)]
    pub(crate) fn next_index(&self, index: usize) -> usize {
        (index + 1) & self.mask
    }

    #[inline(always)]
    pub(crate) fn slot(&self, index: usize) -> &Slot<T> {
        debug_assert!(index <= self.mask, "index {index} out of range");
        &self.slots[index]
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // &mut self: kedua handle sudah di-drop, tidak ada akses bersamaan
        let mut head = self.head.value.load(Ordering::Acquire);
        let tail = self.tail.value.load(Ordering::Acquire);

        let in_flight = tail.wrapping_sub(head) & self.mask;
        if in_flight > 0 {
            log::trace!("ring buffer dropped with {} in-flight elements", in_flight);
        }

        if mem::needs_drop::<T>() {
            while head != tail {
                // SAFETY: slot dalam [head, tail) berisi elemen yang sudah diinisialisasi
                unsafe { self.slots[head].drop_in_place() };
                head = self.next_index(head);
            }
        }
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("buffer_size", &self.buffer_size())
            .field("head", &self.head.value.load(Ordering::Relaxed))
            .field("tail", &self.tail.value.load(Ordering::Relaxed))
            .finish()
    }
}
