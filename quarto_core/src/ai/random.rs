use crate::ai::tiebreak::TieBreaker;
use crate::ai::types::{Ai, MoveError, playable_pieces};
use crate::engine::state::{GameState, Move};

/// 空きマスと渡す駒を一様ランダムに選ぶAI。
#[derive(Debug)]
#[non_exhaustive]
pub struct Agent {
    /// 乱数生成器。
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
    #[inline]
    fn select_move(&mut self, state: GameState) -> Result<Move, MoveError> {
        let available = match playable_pieces(state) {
            Ok(value) => value,
            Err(err) => return Err(err),
        };

        let handed = self.rng.pick_piece(available);
        if state.pending().is_none() {
            return handed.map(Move::opening).ok_or(MoveError::NoPieceAvailable);
        }

        self.rng
            .pick_square(state.board().empty_mask())
            .map(|square| Move::place(square, handed))
            .ok_or(MoveError::BoardFull)
    }
}
