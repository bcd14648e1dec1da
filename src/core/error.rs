//! Error konstruksi ring buffer.
//!
//! Buffer penuh atau kosong bukan error: keduanya dikembalikan sebagai
//! `Err(value)` / `None` / `false` oleh operasi push dan pop.

use thiserror::Error;

/// Result alias untuk operasi yang bisa gagal saat konstruksi.
pub type Result<T, E = RingBufferError> = std::result::Result<T, E>;

/// Kegagalan saat membuat [`RingBuffer`](super::RingBuffer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingBufferError {
    /// Kapasitas yang diminta tidak bisa dibulatkan ke power of 2 dalam `usize`.
    #[error("requested capacity {requested} cannot be rounded up to a power of two")]
    CapacityOverflow { requested: usize },

    /// Alokasi backing storage gagal.
    #[error("failed to allocate {slots} slots ({bytes} bytes) for ring buffer storage")]
    AllocationFailed { slots: usize, bytes: usize },
}
