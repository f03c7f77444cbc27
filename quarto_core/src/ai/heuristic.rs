use crate::ai::tactics::{
    CENTER_MASK, CORNER_MASK, block_square, safe_pieces, winning_placements, winning_square,
};
use crate::ai::tiebreak::TieBreaker;
use crate::ai::types::{Ai, MoveError, playable_pieces};
use crate::engine::board::{Board, common_attributes};
use crate::engine::pieces::PieceSet;
use crate::engine::state::{GameState, Move};
use crate::engine::types::{Piece, Square, squares_in};

/// 探索を行わず、即勝ち・妨害・位置の順に判断するAI。
#[derive(Debug)]
#[non_exhaustive]
pub struct Agent {
    /// 初手で渡す駒を選ぶ乱数。
    rng: TieBreaker,
}

impl Agent {
    /// `seed` を用いて初期化する。
    #[inline]
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: TieBreaker::new(seed),
        }
    }
}

impl Ai for Agent {
    fn select_move(&mut self, state: GameState) -> Result<Move, MoveError> {
        let available = match playable_pieces(state) {
            Ok(value) => value,
            Err(err) => return Err(err),
        };
        let board = state.board();

        let Some(pending) = state.pending() else {
            let safe = safe_pieces(board, available);
            let candidates = if safe.is_empty() { available } else { safe };
            return self
                .rng
                .pick_piece(candidates)
                .map(Move::opening)
                .ok_or(MoveError::NoPieceAvailable);
        };

        let square = winning_square(board, pending)
            .or_else(|| block_square(board, available))
            .or_else(|| strategic_square(board, pending))
            .ok_or(MoveError::BoardFull)?;

        let after = board.with_piece(square, pending);
        Ok(Move::place(square, least_risky_piece(after, available)))
    }
}

/// 中央、四隅の順に最小インデックスの空きマス。どちらも埋まっていれば潜在力が最大のマス。
fn strategic_square(board: Board, pending: Piece) -> Option<Square> {
    let empty = board.empty_mask();
    if let Some(square) = squares_in(empty & CENTER_MASK).next() {
        return Some(square);
    }
    if let Some(square) = squares_in(empty & CORNER_MASK).next() {
        return Some(square);
    }

    let mut best: Option<(u32, Square)> = None;
    for square in board.empty_squares() {
        let score = line_potential(board, square, pending);
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, square));
        }
    }
    best.map(|(_, square)| square)
}

/// `square` に `piece` を置いたとき、そのマスを通る残り1マスのラインが持つ共通属性の総数。
#[must_use]
pub fn line_potential(board: Board, square: Square, piece: Piece) -> u32 {
    let next = board.with_piece(square, piece);
    next
        .live_lines()
        .filter(|(indices, _)| indices.contains(&square.index()))
        .filter(|(_, cells)| cells.iter().filter(|cell| cell.is_none()).count() == 1)
        .map(|(_, cells)| common_attributes(cells).count())
        .sum()
}

/// 置いた後の盤面で、相手の勝ちマスが最も少ない駒（同数ならインデックス最小）。
fn least_risky_piece(after: Board, available: PieceSet) -> Option<Piece> {
    let safe = safe_pieces(after, available);
    let candidates = if safe.is_empty() { available } else { safe };
    candidates
        .iter()
        .min_by_key(|&piece| winning_placements(after, piece))
}

#[cfg(test)]
mod tests {
    use super::{Agent, line_potential};
    use crate::ai::types::{Ai as _, MoveError};
    use crate::engine::board::Board;
    use crate::engine::state::GameState;
    use crate::engine::types::{Piece, Square};

    fn piece(code: &str) -> Piece {
        code.parse().unwrap_or_else(|err| panic!("{err}"))
    }

    fn square(index: u8) -> Square {
        Square::from_index(index).unwrap_or_else(|| panic!("bad square {index}"))
    }

    fn board_with(cells: &[(u8, &str)]) -> Board {
        cells.iter().fold(Board::new(), |board, &(index, code)| {
            board
                .place(square(index), piece(code))
                .unwrap_or_else(|err| panic!("{err}"))
        })
    }

    fn state(board: Board, pending: &str) -> GameState {
        GameState::new(board, Some(piece(pending))).unwrap_or_else(|err| panic!("{err}"))
    }

    #[test]
    fn takes_the_win_when_offered() {
        let board = board_with(&[(0, "BDEC"), (1, "BLFP"), (2, "BDFP")]);
        let mv = Agent::new(0).select_move(state(board, "BLEC"));
        assert_eq!(mv.map(|m| m.position()), Ok(Some(square(3))));
    }

    #[test]
    fn blocks_a_cell_the_opponent_could_complete() {
        // 手持ちは S なので行0は完成できないが、残りの B を渡されれば相手が完成させる。
        let board = board_with(&[(0, "BDEC"), (1, "BLFP"), (2, "BDFP")]);
        let mv = Agent::new(0).select_move(state(board, "SLEC"));
        assert_eq!(mv.map(|m| m.position()), Ok(Some(square(3))));
    }

    #[test]
    fn quiet_position_prefers_center_and_hands_a_safe_piece() {
        let board = board_with(&[(0, "BDEC")]);
        let mv = Agent::new(0).select_move(state(board, "SLFP"));
        let mv = mv.unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(mv.position(), Some(square(5)));
        // 危険な駒はないので最小インデックスの駒。
        assert_eq!(mv.piece(), Some(piece("BDEP")));
    }

    #[test]
    fn opening_and_full_board() {
        let mv = Agent::new(5).select_move(GameState::opening());
        assert!(mv.is_ok_and(|m| m.position().is_none() && m.piece().is_some()));

        let mut full = Board::new();
        for (index, p) in (0_u8..16).zip(Piece::all()) {
            full = full.place(square(index), p).unwrap_or(full);
        }
        let result = Agent::new(0).select_move(GameState::new(full, None).unwrap_or_default());
        assert_eq!(result, Err(MoveError::NoPieceAvailable));
    }

    #[test]
    fn potential_counts_shared_attributes_of_nearly_full_lines() {
        let board = board_with(&[(0, "BDEC"), (1, "BDEP")]);
        // 行0 は BDEC, BDEP, BDFC で B と D を共有し、空きは1マス。
        assert_eq!(line_potential(board, square(2), piece("BDFC")), 2);
        assert_eq!(line_potential(board, square(8), piece("BDFC")), 0);
    }
}
