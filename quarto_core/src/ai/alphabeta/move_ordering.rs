use crate::ai::tactics::{CENTER_MASK, CORNER_MASK, winning_square};
use crate::engine::board::Board;
use crate::engine::pieces::PieceSet;
use crate::engine::types::{Piece, Square, squares_in};

/// 空きマスを中央、四隅、その他の順に並べる（同じ順位はインデックス昇順）。
pub(super) fn order_squares(board: Board) -> Vec<Square> {
    let empty = board.empty_mask();
    let center = empty & CENTER_MASK;
    let corner = empty & CORNER_MASK;
    let rest = empty & !(CENTER_MASK | CORNER_MASK);
    [center, corner, rest].into_iter().flat_map(squares_in).collect()
}

/// 渡す駒を、相手が即勝ちできない駒、できる駒の順に並べる（同じ順位はインデックス昇順）。
///
/// `after` は手持ちの駒を置いた後の盤面。
pub(super) fn order_handoffs(after: Board, available: PieceSet) -> Vec<Piece> {
    let (safe, losing): (Vec<Piece>, Vec<Piece>) = available
        .iter()
        .partition(|&piece| winning_square(after, piece).is_none());
    safe.into_iter().chain(losing).collect()
}
