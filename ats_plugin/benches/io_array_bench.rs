//! I/O array access benchmarks: per-tick panel/sound traffic.

use ats_plugin::io_array::IoArray;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Benchmark single-slot reads and writes through the bounds check.
fn bench_slot_access(c: &mut Criterion) {
    let mut buf = vec![0i32; 256];
    let mut view = unsafe { IoArray::bind(buf.as_mut_ptr(), 256) };

    c.bench_function("set_one_slot", |b| {
        b.iter(|| {
            black_box(view.set(black_box(128), black_box(1)).unwrap());
        });
    });

    c.bench_function("get_one_slot", |b| {
        b.iter(|| {
            black_box(view.get(black_box(128)).unwrap());
        });
    });
}

/// Benchmark a full panel sweep, the worst case a tick can do.
fn bench_full_sweep(c: &mut Criterion) {
    let mut buf = vec![0i32; 256];
    let mut view = unsafe { IoArray::bind(buf.as_mut_ptr(), 256) };

    c.bench_function("sweep_256_slots", |b| {
        b.iter(|| {
            for i in 0..256 {
                view.set(i, i).unwrap();
            }
            black_box(view.get(255).unwrap());
        });
    });
}

criterion_group!(benches, bench_slot_access, bench_full_sweep);
criterion_main!(benches);
