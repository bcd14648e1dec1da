//! spsc-ring - Benchmark runner
//!
//! Mengukur latency push/pop (single thread) dan throughput
//! producer -> consumer antar dua thread.
//!
//! Usage:
//!   cargo run --release --features cli -- [latency|throughput|all] [OPTIONS]
//!
//! Set `RUST_LOG=debug` untuk melihat detail alokasi buffer.

use std::hint::spin_loop;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::{Parser, Subcommand};
use spsc_ring::RingBuffer;

/// Benchmark configuration
#[derive(Parser, Debug)]
#[command(name = "spsc-ring", about = "Lock-free SPSC ring buffer benchmark")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Kapasitas yang diminta (dibulatkan ke power of 2)
    #[arg(long, default_value_t = 65_536, global = true)]
    capacity: usize,

    /// Jumlah operasi per benchmark
    #[arg(long, default_value_t = 1_000_000, global = true)]
    iterations: u64,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Single-thread push/pop latency
    Latency,
    /// Producer/consumer di dua thread
    Throughput,
    /// Jalankan semua benchmark
    All,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ensure!(cli.iterations > 0, "--iterations must be greater than zero");

    println!("🚀 spsc-ring Benchmark");
    println!("======================\n");

    match cli.command.unwrap_or(Commands::All) {
        Commands::Latency => benchmark_latency(&cli)?,
        Commands::Throughput => benchmark_throughput(&cli)?,
        Commands::All => {
            benchmark_latency(&cli)?;
            benchmark_throughput(&cli)?;
        }
    }

    println!("\n✅ All benchmarks complete!");
    Ok(())
}

fn benchmark_latency(cli: &Cli) -> Result<()> {
    println!("📊 Ring Buffer Latency (single thread)");
    println!("--------------------------------------");

    let (mut producer, mut consumer) = RingBuffer::<u64>::new(cli.capacity)?.split();
    let iterations = cli.iterations;
    log::debug!("latency benchmark: {:?}", producer.buffer());

    // Warm up
    for i in 0..1000.min(producer.capacity() as u64) {
        let _ = producer.try_push(i);
    }
    while consumer.pop() {}

    // Benchmark push
    let start = Instant::now();
    for i in 0..iterations {
        let mut value = i;
        while let Err(back) = producer.try_push(value) {
            value = back;
            let _ = consumer.pop();
        }
    }
    let push_duration = start.elapsed();

    // Drain
    while consumer.pop() {}

    // Benchmark pop: isi sampai penuh lalu kosongkan, berulang
    let mut popped = 0u64;
    let mut pop_duration = Duration::ZERO;
    while popped < iterations {
        while producer.try_push(popped).is_ok() {}

        let start = Instant::now();
        while popped < iterations {
            match consumer.try_pop() {
                Some(value) => {
                    std::hint::black_box(value);
                    popped += 1;
                }
                None => break,
            }
        }
        pop_duration += start.elapsed();
    }

    let push_ns = push_duration.as_nanos() as f64 / iterations as f64;
    let pop_ns = pop_duration.as_nanos() as f64 / iterations as f64;

    println!(
        "  Capacity:     {} (slots: {})",
        producer.capacity(),
        producer.buffer().buffer_size()
    );
    println!("  Operations:   {}", iterations);
    println!(
        "  Push latency: {:.2} ns/op ({:.3} μs/op)",
        push_ns,
        push_ns / 1000.0
    );
    println!(
        "  Pop latency:  {:.2} ns/op ({:.3} μs/op)",
        pop_ns,
        pop_ns / 1000.0
    );
    println!(
        "  Throughput:   {:.2} M ops/sec\n",
        iterations as f64 / push_duration.as_secs_f64() / 1_000_000.0
    );

    Ok(())
}

/// Spin sebentar, lalu yield agar thread lawan tetap bisa jalan saat
/// jumlah core lebih sedikit dari jumlah thread.
struct Backoff {
    spins: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 64;

    fn new() -> Self {
        Self { spins: 0 }
    }

    #[inline(always)]
    fn snooze(&mut self) {
        if self.spins < Self::SPIN_LIMIT {
            self.spins += 1;
            spin_loop();
        } else {
            thread::yield_now();
        }
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.spins = 0;
    }
}

fn benchmark_throughput(cli: &Cli) -> Result<()> {
    println!("📊 Ring Buffer Throughput (producer -> consumer)");
    println!("------------------------------------------------");

    let (mut producer, mut consumer) = RingBuffer::<u64>::new(cli.capacity)?.split();
    let iterations = cli.iterations;
    let capacity = producer.capacity();

    let start = Instant::now();

    let producer_thread = thread::spawn(move || {
        let mut full_spins = 0u64;
        let mut backoff = Backoff::new();
        for i in 0..iterations {
            let mut value = i;
            while let Err(back) = producer.try_push(value) {
                value = back;
                full_spins += 1;
                backoff.snooze();
            }
            backoff.reset();
        }
        full_spins
    });

    let mut expected = 0u64;
    let mut empty_spins = 0u64;
    let mut backoff = Backoff::new();
    while expected < iterations {
        match consumer.try_pop() {
            Some(value) => {
                ensure!(
                    value == expected,
                    "out of order receipt: expected {expected}, got {value}"
                );
                expected += 1;
                backoff.reset();
            }
            None => {
                empty_spins += 1;
                backoff.snooze();
            }
        }
    }

    let duration = start.elapsed();
    let full_spins = producer_thread
        .join()
        .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;

    ensure!(consumer.is_empty(), "buffer not drained after transfer");
    log::debug!(
        "throughput benchmark finished: full_spins={} empty_spins={}",
        full_spins,
        empty_spins
    );

    println!("  Capacity:     {}", capacity);
    println!("  Transferred:  {} (verified in order)", iterations);
    println!("  Duration:     {:.2} ms", duration.as_secs_f64() * 1000.0);
    println!(
        "  Throughput:   {:.2} M msgs/sec",
        iterations as f64 / duration.as_secs_f64() / 1_000_000.0
    );
    println!(
        "  Per message:  {:.2} ns",
        duration.as_nanos() as f64 / iterations as f64
    );
    println!("  Spins:        {} full / {} empty", full_spins, empty_spins);

    Ok(())
}
