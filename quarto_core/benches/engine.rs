//! `quarto_core::engine` の性能計測（配置、勝利判定、渡せる駒の計算）。

use core::hint::black_box;
use criterion::BatchSize;
use criterion::Criterion;
use quarto_core::engine;

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    Criterion::default().configure_from_args()
}

/// 中盤の代表局面（8マス埋まり、ラインは未完成）。
fn midgame_board() -> Option<engine::Board> {
    let cells = [
        (0, "BDEC"),
        (1, "SLFP"),
        (2, "BLEP"),
        (5, "SDFC"),
        (6, "BDFP"),
        (9, "SLEC"),
        (10, "BLFC"),
        (15, "SDEP"),
    ];
    let mut board = engine::Board::new();
    for (index, code) in cells {
        let square = engine::Square::from_index(index)?;
        let piece: engine::Piece = code.parse().ok()?;
        board = board.place(square, piece).ok()?;
    }
    Some(board)
}

/// `Board::place` を計測する。
fn bench_place(criterion: &mut Criterion, board: engine::Board) {
    let Some(square) = board.empty_squares().next() else {
        return;
    };
    let Some(piece) = engine::pieces::available(board, None).first() else {
        return;
    };

    criterion.bench_function("engine/place_midgame", |bench| {
        bench.iter_batched(
            || board,
            |input| black_box(input.place(square, piece)),
            BatchSize::SmallInput,
        );
    });
}

/// `Board::is_winning` を計測する。
fn bench_is_winning(criterion: &mut Criterion, board: engine::Board) {
    criterion.bench_function("engine/is_winning_midgame", |bench| {
        bench.iter(|| black_box(black_box(board).is_winning()));
    });
}

/// `pieces::available` を計測する。
fn bench_available(criterion: &mut Criterion, board: engine::Board) {
    let pending = engine::pieces::available(board, None).first();
    criterion.bench_function("engine/available_midgame", |bench| {
        bench.iter(|| black_box(engine::pieces::available(black_box(board), pending)));
    });
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();

    if let Some(board) = midgame_board() {
        bench_place(&mut criterion, board);
        bench_is_winning(&mut criterion, board);
        bench_available(&mut criterion, board);
    }

    criterion.final_summary();
}
