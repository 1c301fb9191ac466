use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lumen_core::presets::{demo_scene, DEFAULT_SEED, DEFAULT_SPHERE_COUNT};
use lumen_renderer::{encode_bmp, BatchSize, RenderConfig, RenderMode, Renderer};

const WIDTH: usize = 1920;
const HEIGHT: usize = 1080;

fn prepared_renderer() -> Renderer {
    let scene = demo_scene(DEFAULT_SPHERE_COUNT, DEFAULT_SEED, false);
    let mut renderer = Renderer::new(scene, RenderConfig::default());
    renderer.prepare(WIDTH, HEIGHT);
    renderer
}

fn prepare_benchmark(c: &mut Criterion) {
    let mut renderer = prepared_renderer();
    c.bench_function("prepare", |b| {
        b.iter(|| renderer.prepare(black_box(WIDTH), black_box(HEIGHT)))
    });
}

fn render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render 1920x1080");
    group.sample_size(10);

    let mut renderer = prepared_renderer();
    group.bench_function("serial", |b| {
        b.iter(|| renderer.render_image(RenderMode::Serial).map(|_| ()))
    });
    group.bench_function("parallel", |b| {
        b.iter(|| renderer.render_image(RenderMode::Parallel).map(|_| ()))
    });
    for size in BatchSize::ALL.into_iter().filter(|s| s.get() >= 2) {
        group.bench_function(format!("simd x{}", size), |b| {
            b.iter(|| renderer.render_image(RenderMode::Batched(size)).map(|_| ()))
        });
    }

    group.finish();
}

fn save_benchmark(c: &mut Criterion) {
    let mut renderer = prepared_renderer();
    let image = renderer
        .render_image(RenderMode::Parallel)
        .expect("render")
        .clone();
    let mut bytes = Vec::with_capacity(54 + 3 * WIDTH * HEIGHT);

    c.bench_function("encode bmp", |b| {
        b.iter(|| {
            bytes.clear();
            encode_bmp(black_box(&image), &mut bytes)
        })
    });
}

criterion_group!(benches, prepare_benchmark, render_benchmark, save_benchmark);
criterion_main!(benches);
