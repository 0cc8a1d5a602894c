use std::hint::black_box;
use std::time::{Duration, Instant};

use glam::Vec2;
use heightscape_common::MeshHandle;
use heightscape_stream::{BuildOutcome, BuildRequest, Scene, StreamConfig, World};

#[derive(Default)]
struct NullScene;

impl Scene for NullScene {
    fn attach(&mut self, mesh: MeshHandle) {
        black_box(mesh);
    }

    fn detach(&mut self, mesh: MeshHandle) {
        black_box(mesh);
    }
}

fn instant_builder() -> impl FnMut(&BuildRequest) -> BuildOutcome {
    let mut next = 0;
    move |_| {
        next += 1;
        BuildOutcome::Ready(MeshHandle(next))
    }
}

fn bench_straight_flight(radius: i32, steps: usize) {
    let config = StreamConfig {
        radius,
        ..StreamConfig::default()
    };
    let mut world = World::new(NullScene, &config).expect("valid config");
    let mut builder = instant_builder();

    let start = Instant::now();
    for i in 0..steps {
        let viewer = Vec2::new(i as f32 * 16.0, 0.0);
        black_box(world.update(black_box(viewer), &mut builder));
        world.advance(Duration::from_millis(16), &mut builder);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / steps as u32;
    println!(
        "  straight flight (r={radius}, {steps} frames, {} cells): {per_iter:?}/frame, total {elapsed:?}",
        world.cells().len()
    );
}

fn bench_stationary(radius: i32, iterations: usize) {
    let config = StreamConfig {
        radius,
        ..StreamConfig::default()
    };
    let mut world = World::new(NullScene, &config).expect("valid config");
    let mut builder = instant_builder();
    world.update(Vec2::ZERO, &mut builder);

    let start = Instant::now();
    for i in 0..iterations {
        let viewer = Vec2::new((i % 100) as f32, 0.0);
        black_box(world.update(black_box(viewer), &mut builder));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  stationary (r={radius}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Cell Window Benchmarks ===\n");

    println!("Window shift (full sweep grows with session length):");
    bench_straight_flight(1, 10000);
    bench_straight_flight(3, 10000);
    bench_straight_flight(5, 5000);

    println!("\nSame-cell early exit:");
    bench_stationary(5, 100000);

    println!("\n=== Done ===");
}
