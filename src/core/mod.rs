//! Core module: Lock-Free SPSC Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: Hanya atomic load/store, tidak ada Mutex, CAS, atau retry loop
//! - No-Allocation: Semua slot pre-allocated saat init
//! - Single Owner: Tepat satu Producer dan satu Consumer per buffer

mod consumer;
mod error;
mod producer;
mod ring_buffer;
mod sync;

pub use consumer::Consumer;
pub use error::{Result, RingBufferError};
pub use producer::Producer;
pub use ring_buffer::RingBuffer;
