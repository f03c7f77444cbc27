use crate::engine::board::{Board, common_attributes};

use super::WIN_SCORE;

/// 空きが1マスのラインに掛ける重み（埋まっている駒の数）。
const LIVE_LINE_WEIGHT: i32 = 3;

/// 静的評価（`maximizing` 側から見た値）。
///
/// ラインが完成していれば `±WIN_SCORE`。そうでなければ残り1マスのラインの共通属性数を合計する。
pub(super) fn evaluate(board: Board, maximizing: bool) -> i32 {
    let score = if board.is_winning() {
        WIN_SCORE
    } else {
        live_line_score(board)
    };
    if maximizing { score } else { -score }
}

/// 空きが1マスのラインが持つ共通属性の数の重み付き合計。
pub(super) fn live_line_score(board: Board) -> i32 {
    board
        .live_lines()
        .filter(|(_, cells)| cells.iter().filter(|cell| cell.is_none()).count() == 1)
        .map(|(_, cells)| {
            let shared = i32::try_from(common_attributes(cells).count()).unwrap_or(0);
            shared.wrapping_mul(LIVE_LINE_WEIGHT)
        })
        .sum()
}
