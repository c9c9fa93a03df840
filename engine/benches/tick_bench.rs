use criterion::{Criterion, criterion_group, criterion_main};
use serpent_engine::game::{Direction, GameEngine, GameRng, GameSettings};
use serpent_engine::highscore::InMemoryHighScoreStore;

fn create_engine(seed: u64) -> (GameEngine, GameRng) {
    let mut rng = GameRng::new(seed);
    let engine = GameEngine::new(
        GameSettings::default(),
        Box::new(InMemoryHighScoreStore::default()),
        &mut rng,
    );
    (engine, rng)
}

fn bench_thousand_ticks() {
    let (mut engine, mut rng) = create_engine(42);
    let turns = [Direction::Left, Direction::Up, Direction::Right, Direction::Up];

    for i in 0..1000 {
        engine.set_direction(turns[i % turns.len()]);
        engine.tick(&mut rng);
    }
}

fn bench_snapshot_per_tick() {
    let (mut engine, mut rng) = create_engine(7);

    for _ in 0..1000 {
        engine.tick(&mut rng);
        let snapshot = engine.snapshot();
        assert!(!snapshot.cells.is_empty());
    }
}

fn tick_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    group.bench_function("thousand_ticks", |b| b.iter(bench_thousand_ticks));

    group.bench_function("snapshot_per_tick", |b| b.iter(bench_snapshot_per_tick));

    group.finish();
}

criterion_group!(benches, tick_bench);
criterion_main!(benches);
