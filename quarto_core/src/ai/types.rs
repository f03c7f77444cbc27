use thiserror::Error;

use crate::engine::pieces::PieceSet;
use crate::engine::state::{GameState, Move};

/// 手を選べない局面だった理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum MoveError {
    /// 置く駒があるのに空きマスがない。
    #[error("No empty squares left")]
    BoardFull,
    /// 初手なのに渡せる駒がない。
    #[error("No pieces to give on first move")]
    NoPieceAvailable,
}

/// 手を選択するAI。
pub trait Ai {
    /// 局面から次の手を選択する。
    ///
    /// # Errors
    ///
    /// 局面が手を指せない状態なら `MoveError` を返す。
    fn select_move(&mut self, state: GameState) -> Result<Move, MoveError>;
}

/// 手を指せる局面かを検査し、渡せる駒を返す。
///
/// # Errors
///
/// - `MoveError::BoardFull`: 置く駒があるのに空きマスがない場合
/// - `MoveError::NoPieceAvailable`: 初手で渡せる駒がない場合
pub fn playable_pieces(state: GameState) -> Result<PieceSet, MoveError> {
    if state.pending().is_some() && state.board().is_full() {
        return Err(MoveError::BoardFull);
    }
    let available = state.available();
    if state.pending().is_none() && available.is_empty() {
        return Err(MoveError::NoPieceAvailable);
    }
    Ok(available)
}
