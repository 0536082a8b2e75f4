//! Criterion benchmarks for the input pipeline.
//!
//! Benchmarks:
//!   - `next` with a worker placement
//!   - `get_possible_game_inputs` on a fresh table
//!   - private snapshot encode and restore
//!
//! Run with: cargo bench --bench next_input

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use everdell_engine::board::LocationName;
use everdell_engine::{GameInput, GameOptions, GameState, GameStateSnapshot, NewleafOptions, Player, PlayerId};

fn table(options: GameOptions) -> GameState {
    let players = (0..4u8)
        .map(|i| Player::new(format!("P{i}"), PlayerId::new(i), format!("s{i}")))
        .collect();
    GameState::initial(players, options, 99).unwrap()
}

// ---------------------------------------------------------------------------
// Benchmark: next
// ---------------------------------------------------------------------------

fn bench_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("next");
    let base = table(GameOptions::base());
    let full = table(GameOptions::base().with_pearlbrook().with_newleaf(NewleafOptions::all()));
    let input = GameInput::PlaceWorker { location: LocationName::BasicOneBerry };

    group.bench_function("place_worker_base", |b| {
        b.iter(|| black_box(base.next(black_box(input.clone()))));
    });
    group.bench_function("place_worker_all_expansions", |b| {
        b.iter(|| black_box(full.next(black_box(input.clone()))));
    });
    group.bench_function("possible_inputs", |b| {
        b.iter(|| black_box(base.get_possible_game_inputs()));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: snapshots
// ---------------------------------------------------------------------------

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    let state = table(GameOptions::base().with_pearlbrook().with_newleaf(NewleafOptions::all()));
    let bytes = state.to_snapshot(true).to_bytes().unwrap();

    group.bench_function("encode", |b| {
        b.iter(|| black_box(state.to_snapshot(true).to_bytes()));
    });
    group.bench_function("restore", |b| {
        b.iter(|| {
            let snapshot = GameStateSnapshot::from_bytes(black_box(&bytes)).unwrap();
            black_box(GameState::from_snapshot(snapshot))
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Register groups
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_next, bench_snapshot);
criterion_main!(benches);
