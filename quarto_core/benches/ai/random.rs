//! `quarto_core::ai::random` と `ai::heuristic` の性能計測（1手選択）。

use core::hint::black_box;
use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use quarto_core::ai::types::Ai;
use quarto_core::{ai, engine};

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    Criterion::default().configure_from_args()
}

/// 指定手数だけ進めた局面を返す（途中で終局した場合はその直前で止める）。
fn state_after_turns(turns: u8) -> engine::GameState {
    let mut first = ai::random::Agent::new(0);
    let mut second = ai::random::Agent::new(1);
    let mut game = engine::Game::new();

    for _turn in 0..turns {
        let state = game.state();
        let mv = match game.side_to_move() {
            engine::Player::First => first.select_move(state),
            engine::Player::Second => second.select_move(state),
        };
        let Ok(mv) = mv else { break };

        let mut next = game;
        if next.play(mv).is_err() || next.is_game_over() {
            break;
        }
        game = next;
    }

    game.state()
}

/// ベンチ用に代表局面をいくつか用意する。
fn state_samples() -> [engine::GameState; 3] {
    [
        engine::GameState::opening(),
        state_after_turns(5),
        state_after_turns(11),
    ]
}

/// `random::Agent::select_move` を計測する。
fn bench_random(criterion: &mut Criterion) {
    let samples = state_samples();
    let mut group = criterion.benchmark_group("ai/random/select_move");

    for (index, state) in samples.iter().enumerate() {
        let bench_id = BenchmarkId::new("state", index);
        group.bench_with_input(bench_id, state, |bench, input| {
            bench.iter_batched(
                || ai::random::Agent::new(0),
                |mut agent| black_box(agent.select_move(*input)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// `heuristic::Agent::select_move` を計測する。
fn bench_heuristic(criterion: &mut Criterion) {
    let samples = state_samples();
    let mut group = criterion.benchmark_group("ai/heuristic/select_move");

    for (index, state) in samples.iter().enumerate() {
        let bench_id = BenchmarkId::new("state", index);
        group.bench_with_input(bench_id, state, |bench, input| {
            bench.iter_batched(
                || ai::heuristic::Agent::new(0),
                |mut agent| black_box(agent.select_move(*input)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();
    bench_random(&mut criterion);
    bench_heuristic(&mut criterion);
    criterion.final_summary();
}
