//! Benchmarks for distance-field generation.
//!
//! Run with: cargo bench -p outline-sdf
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p outline-sdf -- --save-baseline main
//! 2. After changes: cargo bench -p outline-sdf -- --baseline main

#![allow(missing_docs, clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use outline_coloring::{ColoringConfig, color_edges};
use outline_sdf::{
    AnyBitmap, FieldEncoding, FieldMode, FieldSpace, GeneratorConfig, Range, auto_frame,
    correct_errors, correct_signs, generate_field,
};
use outline_types::{Contour, EdgeSegment, Point2, Shape};

// =============================================================================
// Test Shape Generation
// =============================================================================

/// A circle made of four cubic arcs.
fn circle(radius: f64) -> Contour {
    let k = 0.552_284_749_831 * radius;
    let mut contour = Contour::new();
    let p = |x: f64, y: f64| Point2::new(x, y);
    contour.push(EdgeSegment::cubic(p(-radius, 0.0), p(-radius, k), p(-k, radius), p(0.0, radius)));
    contour.push(EdgeSegment::cubic(p(0.0, radius), p(k, radius), p(radius, k), p(radius, 0.0)));
    contour.push(EdgeSegment::cubic(p(radius, 0.0), p(radius, -k), p(k, -radius), p(0.0, -radius)));
    contour.push(EdgeSegment::cubic(p(0.0, -radius), p(-k, -radius), p(-radius, -k), p(-radius, 0.0)));
    contour
}

/// A star with `points` spikes, all straight edges.
fn star(points: usize) -> Contour {
    let n = points * 2;
    let vertices: Vec<_> = (0..n)
        .map(|i| {
            let angle = -(i as f64) * std::f64::consts::TAU / n as f64;
            let r = if i % 2 == 0 { 10.0 } else { 4.0 };
            Point2::new(r * angle.cos(), r * angle.sin())
        })
        .collect();
    Contour::polygon(&vertices)
}

fn shapes() -> Vec<(&'static str, Shape)> {
    let mut shapes = vec![
        ("circle", Shape::from_contours([circle(10.0)])),
        ("star", Shape::from_contours([star(7)])),
        ("ring_and_star", Shape::from_contours([circle(12.0), star(5)])),
    ];
    for (_, shape) in &mut shapes {
        shape.normalize();
        color_edges(shape, &ColoringConfig::default());
    }
    shapes
}

fn space_for(shape: &Shape, size: usize) -> FieldSpace {
    let range = Range::Pixels(4.0);
    let projection = auto_frame(&shape.bounds(), size, size, range, 0.0, None).unwrap();
    FieldSpace::with_range(projection, range, FieldEncoding::Normalized).unwrap()
}

// =============================================================================
// Generation Benchmarks
// =============================================================================

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generation");
    let size = 64;
    group.throughput(Throughput::Elements((size * size) as u64));

    for (name, shape) in &shapes() {
        let space = space_for(shape, size);
        for mode in FieldMode::ALL {
            for (label, config) in [
                ("current", GeneratorConfig::default()),
                ("legacy", GeneratorConfig::legacy()),
                ("overlapping", GeneratorConfig::overlapping()),
            ] {
                let id = BenchmarkId::new(format!("{mode}_{label}"), name);
                group.bench_with_input(id, shape, |b, shape| {
                    let mut output = AnyBitmap::new_float(size, size, mode.channels()).unwrap();
                    b.iter(|| {
                        generate_field(black_box(shape), &space, mode, &config, &mut output).unwrap();
                    });
                });
            }
        }
    }

    group.finish();
}

fn bench_parallelism(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parallelism");
    let shape = Shape::from_contours([circle(12.0), star(5)]);

    for size in [32, 128] {
        let space = space_for(&shape, size);
        group.throughput(Throughput::Elements((size * size) as u64));
        for (label, config) in [
            ("parallel", GeneratorConfig::default()),
            ("sequential", GeneratorConfig::sequential()),
        ] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &size| {
                let mut output = AnyBitmap::new_float(size, size, 3).unwrap();
                b.iter(|| {
                    generate_field(&shape, &space, FieldMode::Multi, &config, &mut output).unwrap();
                });
            });
        }
    }

    group.finish();
}

// =============================================================================
// Correction Benchmarks
// =============================================================================

fn bench_correction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Correction");
    let size = 64;

    for (name, shape) in &shapes() {
        let space = space_for(shape, size);
        let mut field = AnyBitmap::new_float(size, size, 4).unwrap();
        generate_field(shape, &space, FieldMode::MultiAndTrue, &GeneratorConfig::legacy(), &mut field).unwrap();

        group.bench_with_input(BenchmarkId::new("correct_signs", name), &field, |b, field| {
            b.iter(|| {
                let mut field = field.clone();
                correct_signs(&mut field, shape, &space, shape.fill_rule, true).unwrap();
                field
            });
        });

        group.bench_with_input(BenchmarkId::new("correct_errors", name), &field, |b, field| {
            b.iter(|| {
                let mut field = field.clone();
                correct_errors(&mut field, &space, 1.001, true).unwrap();
                field
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_generation, bench_parallelism, bench_correction);

criterion_main!(benches);
