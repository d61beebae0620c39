//! Benchmarks for Mien per-frame operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mien_core::{blend, Blender, FrameDelta};
use mien_runtime::{AvatarController, ControllerConfig, HeadlessRig};
use mien_scene::{compute_framing, FramingConfig};
use mien_test::{default_bounds, default_roster};

const DT: f64 = 1.0 / 60.0;

fn controller() -> AvatarController<HeadlessRig> {
    let library = default_roster();
    let rig = HeadlessRig::new(&library, default_bounds());
    let config = ControllerConfig {
        seed: Some(1),
        ..Default::default()
    };
    AvatarController::new(rig, library, config).unwrap()
}

fn bench_blend(c: &mut Criterion) {
    c.bench_function("blend", |b| {
        b.iter(|| blend(black_box(0.25), black_box(0.75), black_box(0.2)))
    });
}

fn bench_blender_step(c: &mut Criterion) {
    let blender = Blender::default();
    let delta = FrameDelta::from_secs(DT);

    c.bench_function("blender_step", |b| {
        b.iter(|| blender.step(black_box(0.25), black_box(1.0), black_box(delta)))
    });
}

fn bench_idle_frame(c: &mut Criterion) {
    let mut controller = controller();

    c.bench_function("controller_idle_frame", |b| {
        b.iter(|| black_box(controller.update(black_box(DT))))
    });
}

fn bench_speaking_frame(c: &mut Criterion) {
    let mut controller = controller();
    controller.set_speaking(true);
    controller.set_emotion_target("happy", 0.7).unwrap();

    c.bench_function("controller_speaking_frame", |b| {
        b.iter(|| black_box(controller.update(black_box(DT))))
    });
}

fn bench_compute_framing(c: &mut Criterion) {
    let bounds = default_bounds();
    let config = FramingConfig::default();

    c.bench_function("compute_framing", |b| {
        b.iter(|| compute_framing(black_box(&bounds), black_box(&config)))
    });
}

criterion_group!(
    benches,
    bench_blend,
    bench_blender_step,
    bench_idle_frame,
    bench_speaking_frame,
    bench_compute_framing,
);
criterion_main!(benches);
