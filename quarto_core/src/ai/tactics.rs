//! 探索前に使う即断ヒューリスティック。
//!
//! マスの候補はすべてインデックス昇順に調べ、最初に条件を満たしたものを返す。

use crate::ai::tiebreak::TieBreaker;
use crate::engine::board::Board;
use crate::engine::pieces::PieceSet;
use crate::engine::types::{Piece, Square};

/// 中央4マスのビット（5, 6, 9, 10）。
pub const CENTER_MASK: u16 = 0x0660;

/// 四隅のビット（0, 3, 12, 15）。
pub const CORNER_MASK: u16 = 0x9009;

/// `piece` を置けば即勝ちになる最小インデックスのマス。
#[must_use]
pub fn winning_square(board: Board, piece: Piece) -> Option<Square> {
    board
        .empty_squares()
        .find(|&square| board.completes_line(square, piece))
}

/// `piece` を置けば即勝ちになるマスの数。
#[must_use]
pub fn winning_placements(board: Board, piece: Piece) -> usize {
    board
        .empty_squares()
        .filter(|&square| board.completes_line(square, piece))
        .count()
}

/// 渡すと相手が即勝ちできる駒の集合。
#[must_use]
pub fn losing_pieces(board: Board, available: PieceSet) -> PieceSet {
    available
        .iter()
        .filter(|&piece| winning_square(board, piece).is_some())
        .collect()
}

/// 渡しても相手が即勝ちできない駒の集合（空のこともある）。
#[must_use]
pub fn safe_pieces(board: Board, available: PieceSet) -> PieceSet {
    let losing = losing_pieces(board, available);
    available
        .iter()
        .filter(|&piece| !losing.contains(piece))
        .collect()
}

/// 相手に渡す駒を選ぶ。安全な駒があればその中から、なければ全体から一様に選ぶ。
///
/// `board` は自分の駒を置いた後の盤面。
pub fn choose_handoff(
    board: Board,
    available: PieceSet,
    tiebreak: &mut TieBreaker,
) -> Option<Piece> {
    let safe = safe_pieces(board, available);
    let candidates = if safe.is_empty() { available } else { safe };
    tiebreak.pick_piece(candidates)
}

/// 渡せる駒のどれかでラインが完成してしまうマス（相手の勝ち筋を塞ぐ候補）。
#[must_use]
pub fn block_square(board: Board, available: PieceSet) -> Option<Square> {
    board.empty_squares().find(|&square| {
        available
            .iter()
            .any(|piece| board.completes_line(square, piece))
    })
}

/// `pending` を置いた後、残りのどの駒を渡しても次に置く側が即勝ちできるマス。
///
/// 残りの駒が無いマスは対象外。次に置くのは相手なので、このマスは自分の得とは限らない。
#[must_use]
pub fn forced_outcome_square(board: Board, pending: Piece, available: PieceSet) -> Option<Square> {
    let rest = available.without(pending);
    if rest.is_empty() {
        return None;
    }
    board.empty_squares().find(|&square| {
        let next = board.with_piece(square, pending);
        rest.iter().all(|piece| winning_square(next, piece).is_some())
    })
}

/// 位置だけで選ぶマス。中央、四隅、その他の順に、空いている中から一様に選ぶ。
pub fn strategic_square(board: Board, tiebreak: &mut TieBreaker) -> Option<Square> {
    let empty = board.empty_mask();
    [empty & CENTER_MASK, empty & CORNER_MASK, empty]
        .into_iter()
        .find(|&mask| mask != 0)
        .and_then(|mask| tiebreak.pick_square(mask))
}
