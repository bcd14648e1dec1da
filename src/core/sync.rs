//! Primitive sinkronisasi yang dipakai ring buffer.
//!
//! Default: `std`. Dengan feature `loom`, semua atomic, `Arc` dan
//! `UnsafeCell` diganti versi loom sehingga protokol Acquire/Release
//! bisa di-model-check secara exhaustive.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};
#[cfg(feature = "loom")]
pub(crate) use loom::sync::Arc;

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::Arc;

#[cfg(feature = "loom")]
pub(crate) use loom::cell::UnsafeCell;

/// Wrapper tipis di atas `std::cell::UnsafeCell` dengan API `with`/`with_mut`
/// yang sama seperti `loom::cell::UnsafeCell`.
///
/// Tidak ada constructor: slot dibuat langsung dari memori yang belum
/// diinisialisasi (lihat `fill_slots`).
#[cfg(not(feature = "loom"))]
#[repr(transparent)]
pub(crate) struct UnsafeCell<T>(std::cell::UnsafeCell<T>);

#[cfg(not(feature = "loom"))]
impl<T> UnsafeCell<T> {
    #[inline(always)]
    pub(crate) fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
        f(self.0.get())
    }

    #[inline(always)]
    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
        f(self.0.get())
    }
}
