//! Pipeline benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Matrix2x3;

use flutter_rs::video::IterSource;
use flutter_rs::{
    run, FilterKind, FrameImage, FrameSink, FrameSize, MotionEstimator, RenderedFrame, Result,
    SinkControl, StabilizerConfig, Transform, Warper,
};

#[derive(Clone, Copy)]
struct BenchImage(usize);

impl FrameImage for BenchImage {
    fn size(&self) -> FrameSize {
        FrameSize::new(1920, 1080)
    }
}

/// Deterministic jitter around a slow pan.
struct JitterEstimator;

impl MotionEstimator<BenchImage> for JitterEstimator {
    fn estimate(&mut self, _: &BenchImage, next: &BenchImage, _: f64, _: f64) -> Option<Matrix2x3<f64>> {
        let i = next.0 as f64;
        Some(Transform::new(1.0 + (i * 1.7).sin() * 4.0, (i * 2.3).cos() * 3.0, (i * 0.9).sin() * 0.01).to_affine())
    }
}

struct NullWarper;

impl Warper<BenchImage> for NullWarper {
    type Output = f64;

    fn warp(&mut self, _: &BenchImage, transform: &Matrix2x3<f64>, _: FrameSize) -> Result<f64> {
        Ok(transform[(0, 2)])
    }
}

struct NullSink;

impl FrameSink<f64> for NullSink {
    fn consume(&mut self, frame: RenderedFrame<f64>) -> Result<SinkControl> {
        black_box(frame.image);
        Ok(SinkControl::Continue)
    }
}

fn run_pipeline(config: &StabilizerConfig, frames: usize) {
    let mut source = IterSource::new((0..frames).map(BenchImage));
    run(config, &mut source, &mut JitterEstimator, &mut NullWarper, &mut NullSink, None)
        .expect("pipeline run");
}

fn benchmark_low_pass_1000_frames(c: &mut Criterion) {
    let config = StabilizerConfig::default();

    c.bench_function("low_pass_1000_frames", |b| {
        b.iter(|| run_pipeline(black_box(&config), 1000));
    });
}

fn benchmark_moving_average_1000_frames(c: &mut Criterion) {
    let config = StabilizerConfig {
        avg_window: 30,
        ..Default::default()
    };

    c.bench_function("moving_average_30_1000_frames", |b| {
        b.iter(|| run_pipeline(black_box(&config), 1000));
    });
}

fn benchmark_no_filter_1000_frames(c: &mut Criterion) {
    let config = StabilizerConfig {
        avg_window: 30,
        filter: FilterKind::None,
        ..Default::default()
    };

    c.bench_function("no_filter_moving_average_30_1000_frames", |b| {
        b.iter(|| run_pipeline(black_box(&config), 1000));
    });
}

criterion_group!(
    benches,
    benchmark_low_pass_1000_frames,
    benchmark_moving_average_1000_frames,
    benchmark_no_filter_1000_frames,
);

criterion_main!(benches);
