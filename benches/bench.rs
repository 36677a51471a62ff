use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use seqid::{IdAllocator, SequenceId, TimeSource};
use std::time::Instant;

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// One full sequence budget per iteration: with a fixed clock, a fresh
// allocator yields exactly this many IDs before it would have to wait.
const TOTAL_IDS: u64 = SequenceId::SEQUENCE_MASK + 1;

/// Benchmarks the hot path where every allocation is within the current tick.
fn bench_allocator_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocator/fixed_tick");
    group.throughput(Throughput::Elements(TOTAL_IDS));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let allocator =
                    IdAllocator::with_clock(1, FixedMockTime { millis: 42 }).expect("valid node");
                for _ in 0..TOTAL_IDS {
                    black_box(allocator.next_id().expect("sequence has room"));
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks allocation against the real wall clock, ticks included.
fn bench_allocator_wall_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocator/wall_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS));

    let allocator = IdAllocator::new(1).expect("valid node");
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(allocator.next_id().expect("healthy clock"));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_allocator_hot_path, bench_allocator_wall_clock);
criterion_main!(benches);
