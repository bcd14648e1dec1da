//! Criterion benchmark untuk Ring Buffer
//!
//! Run dengan: cargo bench

use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use spsc_ring::RingBuffer;

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer");
    group.throughput(Throughput::Elements(1));

    // Benchmark push
    group.bench_function("push", |b| {
        let (mut producer, mut consumer) = RingBuffer::<u64>::new(65536).unwrap().split();
        let mut i = 0u64;
        b.iter(|| {
            if producer.try_push(black_box(i)).is_err() {
                let _ = consumer.pop();
                let _ = producer.try_push(black_box(i));
            }
            i = i.wrapping_add(1);
        });
    });

    // Benchmark pop
    group.bench_function("pop", |b| {
        let (mut producer, mut consumer) = RingBuffer::<u64>::new(65536).unwrap().split();
        // Pre-fill
        for i in 0..32768 {
            let _ = producer.try_push(i);
        }
        b.iter(|| {
            if let Some(v) = consumer.try_pop() {
                let _ = producer.try_push(black_box(v));
            }
        });
    });

    // Benchmark front + pop (zero-copy read)
    group.bench_function("front_pop", |b| {
        let (mut producer, mut consumer) = RingBuffer::<u64>::new(65536).unwrap().split();
        for i in 0..32768 {
            let _ = producer.try_push(i);
        }
        b.iter(|| {
            let v = consumer.front().copied();
            let _ = consumer.pop();
            if let Some(v) = v {
                let _ = producer.try_push(black_box(v));
            }
        });
    });

    // Benchmark push+pop cycle
    group.bench_function("push_pop_cycle", |b| {
        let (mut producer, mut consumer) = RingBuffer::<u64>::new(65536).unwrap().split();
        let mut i = 0u64;
        b.iter(|| {
            let _ = producer.try_push(black_box(i));
            let _ = consumer.try_pop();
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    // Batch operations
    for batch_size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_function(format!("batch_{}", batch_size), |b| {
            let (mut producer, mut consumer) = RingBuffer::<u64>::new(65536).unwrap().split();
            b.iter(|| {
                for i in 0..*batch_size {
                    let _ = producer.try_push(black_box(i as u64));
                }
                for _ in 0..*batch_size {
                    black_box(consumer.try_pop());
                }
            });
        });
    }

    group.finish();
}

fn bench_cross_thread(c: &mut Criterion) {
    const MESSAGES: u64 = 100_000;

    let mut group = c.benchmark_group("cross_thread");
    group.throughput(Throughput::Elements(MESSAGES));

    for capacity in [64usize, 4096].iter() {
        group.bench_function(format!("transfer_cap_{}", capacity), |b| {
            b.iter(|| {
                let (mut producer, mut consumer) =
                    RingBuffer::<u64>::new(*capacity).unwrap().split();

                let handle = thread::spawn(move || {
                    for i in 0..MESSAGES {
                        let mut value = i;
                        while let Err(back) = producer.try_push(value) {
                            value = back;
                            std::hint::spin_loop();
                            thread::yield_now();
                        }
                    }
                });

                let mut received = 0u64;
                while received < MESSAGES {
                    match consumer.try_pop() {
                        Some(v) => {
                            black_box(v);
                            received += 1;
                        }
                        None => {
                            std::hint::spin_loop();
                            thread::yield_now();
                        }
                    }
                }
                handle.join().unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_throughput, bench_cross_thread);
criterion_main!(benches);
