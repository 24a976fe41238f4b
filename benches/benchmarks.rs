use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flowline::prelude::*;
use std::sync::Arc;

pub fn bump_benchmark(c: &mut Criterion) {
    let x: Vec<f64> = (0..4001).map(|i| -25e3 + 50.0 * i as f64).collect();
    let surface = Bump::synthetic_surface();
    c.bench_function("bump_4001", |b| b.iter(|| bump(black_box(&x), &surface)));
}

pub fn geometry_benchmark(c: &mut Criterion) {
    let grid = Arc::new(Grid::flowline(-25e3, 175e3, 500.0).unwrap());
    c.bench_function("synthetic_geometry", |b| {
        b.iter(|| synthetic_geometry(black_box(&grid), &Bump::synthetic_bed(), &Bump::synthetic_surface()))
    });
}

pub fn ltop_benchmark(c: &mut Criterion) {
    let grid = Arc::new(Grid::flowline(-25e3, 175e3, 500.0).unwrap());
    let geometry = synthetic_geometry(&grid, &Bump::synthetic_bed(), &Bump::synthetic_surface()).unwrap();
    c.bench_function("ltop", |b| {
        b.iter(|| ltop(black_box(&geometry), OrographicOptions::flowline_tuned()))
    });
}

criterion_group!(benches, bump_benchmark, geometry_benchmark, ltop_benchmark);
criterion_main!(benches);
