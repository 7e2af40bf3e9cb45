use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use minichess::{AiConfig, Game, Minimax, MinimaxGame};

/// Leaf count of the legal move tree, with the known start position values
/// doubling as a correctness guard.
fn perft(game: &mut Game, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in game.all_moves() {
        game.make_move(&mv).expect("generated move should be legal");
        nodes += perft(game, depth - 1);
        game.undo_move().expect("undo after make");
    }
    nodes
}

fn max_depth() -> usize {
    std::env::var("MINICHESS_BENCH_DEPTH")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(2)
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft_start");
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(10);

    for (depth, expected) in [(1usize, 20u64), (2, 400), (3, 8902)] {
        if depth > max_depth() + 1 {
            break;
        }
        let mut game = Game::new();
        assert_eq!(perft(&mut game, depth), expected, "perft mismatch at depth {depth}");

        group.throughput(Throughput::Elements(expected));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| black_box(perft(&mut game, black_box(depth))));
        });
    }
    group.finish();
}

fn bench_get_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_move_start");
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(10);

    for depth in 1..=max_depth() {
        let config = AiConfig {
            depth,
            randomize_ties: false,
            seed: None,
        };
        let mut game = Game::new();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &config, |b, config| {
            b.iter(|| {
                let mut searcher = Minimax::<Game>::new(false, config.clone());
                let result = searcher.get_move(black_box(&mut game));
                black_box(result.map(|r| r.score))
            });
        });
        assert_eq!(game.history().len(), 0);
        assert_eq!(game.legal_moves().len(), 20);
    }
    group.finish();
}

criterion_group!(search_benches, bench_perft, bench_get_move);
criterion_main!(search_benches);
