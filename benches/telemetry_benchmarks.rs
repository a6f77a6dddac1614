// benches/telemetry_benchmarks.rs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dumbbell_core::config::WorkoutConfig;
use dumbbell_core::control::{decode_command, Command};
use dumbbell_core::simulation::{phase_samples, FrameBuilder, KinematicModel, Phase};
use dumbbell_core::utils::time::MockTimeProvider;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const COMMANDS: &[&str] = &["use", "act:curl", "act pause now", "ping"];

fn benchmark_kinematics(c: &mut Criterion) {
    let mut group = c.benchmark_group("kinematics");
    let model = KinematicModel::default();
    let mut rng = StdRng::seed_from_u64(1);

    // One rep is 20 samples
    group.throughput(Throughput::Elements(20));
    group.bench_function("positions_per_rep", |b| {
        b.iter(|| {
            for phase in Phase::REP {
                for progress in phase_samples() {
                    black_box(model.positions(black_box(progress), phase, &mut rng));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_frame_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");
    let config = WorkoutConfig::default();
    let clock = Arc::new(MockTimeProvider::new(chrono::Local::now().naive_local()));
    let builder = FrameBuilder::with_clock(&config, clock);
    let model = KinematicModel::default();
    let mut rng = StdRng::seed_from_u64(2);

    group.bench_function("build", |b| {
        b.iter(|| {
            let sensors = model.positions(0.5, Phase::Up, &mut rng);
            black_box(builder.build(2, 11, sensors, &mut rng))
        });
    });

    group.bench_function("build_and_serialize", |b| {
        b.iter(|| {
            let sensors = model.positions(0.5, Phase::Down, &mut rng);
            let frame = builder.build(2, 11, sensors, &mut rng);
            black_box(serde_json::to_vec(&frame))
        });
    });

    group.finish();
}

fn benchmark_command_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("commands");

    for command in COMMANDS {
        let wire = format!("{command}\r\n");
        group.bench_with_input(BenchmarkId::new("decode_and_parse", command), &wire, |b, wire| {
            b.iter(|| {
                let text = decode_command(black_box(wire.as_bytes())).ok();
                black_box(text.map(Command::parse))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_kinematics,
    benchmark_frame_building,
    benchmark_command_parsing
);
criterion_main!(benches);
