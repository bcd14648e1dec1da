//! Bounded lock-free single-producer single-consumer ring buffer.
//!
//! Arsitektur:
//! - Lamport Queue dengan index yang di-mask (kapasitas power of 2)
//! - Head dan tail di cache line terpisah untuk menghindari false sharing
//! - Cached remote index: producer dan consumer hanya membaca index lawan
//!   saat buffer terlihat penuh/kosong
//!
//! ```
//! use spsc_ring::RingBuffer;
//! use std::thread;
//!
//! let (mut producer, mut consumer) = RingBuffer::new(1024).unwrap().split();
//!
//! let handle = thread::spawn(move || {
//!     for i in 0..10_000u64 {
//!         let mut value = i;
//!         while let Err(back) = producer.try_push(value) {
//!             value = back;
//!             std::hint::spin_loop();
//!             thread::yield_now();
//!         }
//!     }
//! });
//!
//! let mut expected = 0u64;
//! while expected < 10_000 {
//!     match consumer.try_pop() {
//!         Some(value) => {
//!             assert_eq!(value, expected);
//!             expected += 1;
//!         }
//!         None => thread::yield_now(),
//!     }
//! }
//! handle.join().unwrap();
//! ```

pub mod core;

pub use crate::core::{Consumer, Producer, Result, RingBuffer, RingBufferError};
