use criterion::{criterion_group, criterion_main, Criterion, black_box};

use flightsim::core::input::ControlInput;
use flightsim::particles::{EmitterConfig, ParticleSystem};
use flightsim::scene::{SceneManager, SimConfig};
use flightsim::terrain::diamond_square;
use flightsim::terrain::{Terrain, TerrainParams};

use glam::{Mat4, Vec3};

fn bench_diamond_square_257(c: &mut Criterion) {
    c.bench_function("diamond_square_257", |b| {
        b.iter(|| diamond_square::generate(black_box(257), 0.5, black_box(1519128009)))
    });
}

fn bench_diamond_square_1025(c: &mut Criterion) {
    c.bench_function("diamond_square_1025", |b| {
        b.iter(|| diamond_square::generate(black_box(1025), 0.5, black_box(7)))
    });
}

fn bench_sampler(c: &mut Criterion) {
    let terrain = Terrain::generate(TerrainParams::default(), None).unwrap();
    let extent = terrain.extent();

    c.bench_function("sampler_height_at_10k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..10_000 {
                let x = (i as f32 * 0.618).fract() * extent;
                let z = (i as f32 * 0.377).fract() * extent;
                sum += terrain.height_at(black_box(x), black_box(z));
            }
            sum
        });
    });
}

fn bench_mesh_build(c: &mut Criterion) {
    let terrain = Terrain::generate(TerrainParams::default(), None).unwrap();

    c.bench_function("terrain_mesh_257", |b| {
        b.iter(|| terrain.mesh())
    });
}

fn bench_particle_tick(c: &mut Criterion) {
    let mut system = ParticleSystem::new(EmitterConfig {
        capacity: 2000,
        particles_per_second: 600.0,
        ..Default::default()
    })
    .unwrap();
    let dt = 1.0 / 60.0;
    let mut frame = 0u32;

    c.bench_function("particle_tick_2000", |b| {
        b.iter(|| {
            frame += 1;
            let parent = Mat4::from_translation(Vec3::new(0.0, 10.0, frame as f32 * 0.5));
            system.update(Some(&parent), Vec3::new(0.0, 15.0, -20.0), Vec3::Z, black_box(dt));
            system.len()
        });
    });
}

fn bench_world_tick(c: &mut Criterion) {
    let mut world = SceneManager::new(SimConfig::default()).unwrap();
    let input = ControlInput::throttle(1);

    c.bench_function("world_tick", |b| {
        b.iter(|| world.step(black_box(&input), 1.0 / 60.0))
    });
}

criterion_group!(
    benches,
    bench_diamond_square_257,
    bench_diamond_square_1025,
    bench_sampler,
    bench_mesh_build,
    bench_particle_tick,
    bench_world_tick,
);

criterion_main!(benches);
