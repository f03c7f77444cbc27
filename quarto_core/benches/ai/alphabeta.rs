//! `quarto_core::ai::alphabeta` の性能計測（ノード数を固定した1手選択）。

use core::hint::black_box;
use core::time::Duration;
use criterion::BenchmarkId;
use criterion::Criterion;
use quarto_core::ai::alphabeta::{Agent, Config, ForcedProbe};
use quarto_core::engine;

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    Criterion::default().configure_from_args().sample_size(20)
}

/// 駒コードの並びから局面を作る。
fn state_from(cells: &[(usize, &str)], pending: &str) -> Option<engine::GameState> {
    let mut board: Vec<Option<&str>> = vec![None; 16];
    for &(index, code) in cells {
        *board.get_mut(index)? = Some(code);
    }
    engine::GameState::from_codes(&board, Some(pending)).ok()
}

/// 序盤・中盤・終盤の代表局面。
fn state_samples() -> Vec<(&'static str, engine::GameState)> {
    let samples = [
        ("early", state_from(&[(0, "BDEC"), (5, "SLFP")], "BLEP")),
        (
            "middle",
            state_from(
                &[
                    (0, "BDEC"),
                    (3, "SLFP"),
                    (5, "BLEP"),
                    (6, "SDFC"),
                    (9, "BDFP"),
                    (12, "SLEC"),
                ],
                "BLFC",
            ),
        ),
        (
            "late",
            state_from(
                &[
                    (0, "BDEC"),
                    (1, "SDFP"),
                    (2, "BDEP"),
                    (3, "BLFC"),
                    (5, "BDFC"),
                    (6, "SDFC"),
                    (10, "SLEC"),
                    (11, "BLEP"),
                    (12, "SLFC"),
                    (13, "BLFP"),
                    (14, "BLEC"),
                    (15, "BDFP"),
                ],
                "SLEP",
            ),
        ),
    ];
    samples
        .into_iter()
        .filter_map(|(name, state)| state.map(|value| (name, value)))
        .collect()
}

/// `alphabeta::Agent::analyse` を計測する。
fn bench_analyse(criterion: &mut Criterion) {
    let config = Config::default()
        .with_time_budget(Duration::from_secs(60))
        .with_endgame_time_budget(Duration::from_secs(60))
        .with_forced_probe(ForcedProbe::Disabled)
        .with_node_budget(Some(20_000));
    let agent = Agent::new(config);
    let mut group = criterion.benchmark_group("ai/alphabeta/analyse");

    for (name, state) in state_samples() {
        group.bench_with_input(BenchmarkId::new("state", name), &state, |bench, input| {
            bench.iter(|| black_box(agent.analyse(*input)));
        });
    }

    group.finish();
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();
    bench_analyse(&mut criterion);
    criterion.final_summary();
}
