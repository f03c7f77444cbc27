use thiserror::Error;

use crate::engine::board::{Board, PlaceError};
use crate::engine::pieces::{self, PieceSet};
use crate::engine::types::{ParsePieceError, Piece, Square};

/// 外部から受け取った局面が不正だった理由。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum StateError {
    /// 盤面の要素数が16ではない。
    #[error("board must have 16 cells, got {0}")]
    BoardLength(usize),
    /// 駒コードが文法に合わない。
    #[error(transparent)]
    InvalidPiece(#[from] ParsePieceError),
    /// 同じ駒が盤上に2つある。
    #[error("piece {0} appears more than once on the board")]
    DuplicatePiece(Piece),
    /// 手持ちの駒がすでに盤上にある。
    #[error("pending piece {0} is already on the board")]
    PendingOnBoard(Piece),
}

/// 1手を決めるための局面（盤面と、これから置く駒）。
///
/// `pending` が `None` なのは、空盤面で最初の駒を渡すだけの初手のみ。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct GameState {
    /// 盤面。
    board: Board,
    /// これから置く駒。
    pending: Option<Piece>,
}

impl GameState {
    /// 相手に渡せる駒を返す。
    #[inline]
    #[must_use]
    pub fn available(self) -> PieceSet {
        pieces::available(self.board, self.pending)
    }

    /// 盤面を返す。
    #[inline]
    #[must_use]
    pub const fn board(self) -> Board {
        self.board
    }

    /// 局面を生成する。
    ///
    /// # Errors
    ///
    /// 空きマスがあるのに `pending` がすでに盤上にある場合、`StateError::PendingOnBoard` を返す。
    /// 埋まった盤面では重複を検査しない（エージェントが `MoveError::BoardFull` を返す）。
    pub fn new(board: Board, pending: Option<Piece>) -> Result<Self, StateError> {
        if let Some(piece) = pending {
            if !board.is_full() && board.used_pieces().contains(piece) {
                return Err(StateError::PendingOnBoard(piece));
            }
        }
        Ok(Self { board, pending })
    }

    /// 駒コードの列から局面を生成する。
    ///
    /// 盤上の文法に合わないコードは駒として数えず、そのマスを塞ぐ。
    ///
    /// # Errors
    ///
    /// - `StateError::BoardLength`: 要素数が16でない場合
    /// - `StateError::InvalidPiece`: 手持ちの駒のコードが文法に合わない場合
    /// - `StateError::DuplicatePiece` / `StateError::PendingOnBoard`: 駒が重複する場合
    pub fn from_codes<S: AsRef<str>>(
        cells: &[Option<S>],
        pending: Option<&str>,
    ) -> Result<Self, StateError> {
        if cells.len() != usize::from(Square::COUNT) {
            return Err(StateError::BoardLength(cells.len()));
        }

        let mut board = Board::new();
        for (square, cell) in Square::all().zip(cells) {
            let Some(code) = cell else { continue };
            let Ok(piece) = code.as_ref().parse::<Piece>() else {
                board = board.block(square).unwrap_or(board);
                continue;
            };
            board = board.place(square, piece).map_err(|err| match err {
                PlaceError::AlreadyPlaced(dup) => StateError::DuplicatePiece(dup),
                PlaceError::Occupied(_) => StateError::DuplicatePiece(piece),
            })?;
        }

        let pending = match pending {
            Some(code) => Some(code.parse::<Piece>()?),
            None => None,
        };
        Self::new(board, pending)
    }

    /// 初手の局面（空盤面、置く駒なし）。
    #[inline]
    #[must_use]
    pub const fn opening() -> Self {
        Self {
            board: Board::new(),
            pending: None,
        }
    }

    /// これから置く駒を返す。
    #[inline]
    #[must_use]
    pub const fn pending(self) -> Option<Piece> {
        self.pending
    }
}

/// エージェントが返す1手。
///
/// `position` は初手（置く駒がない）でのみ `None`。
/// `piece` は渡せる駒が残っていないときのみ `None`。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// 相手に渡す駒。
    piece: Option<Piece>,
    /// 手持ちの駒を置くマス。
    position: Option<Square>,
}

impl Move {
    /// 初手（駒を渡すだけ）。
    #[inline]
    #[must_use]
    pub const fn opening(piece: Piece) -> Self {
        Self {
            piece: Some(piece),
            position: None,
        }
    }

    /// 相手に渡す駒を返す。
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Option<Piece> {
        self.piece
    }

    /// `square` に置き、`piece` を渡す。
    #[inline]
    #[must_use]
    pub const fn place(square: Square, piece: Option<Piece>) -> Self {
        Self {
            piece,
            position: Some(square),
        }
    }

    /// 置くマスを返す。
    #[inline]
    #[must_use]
    pub const fn position(self) -> Option<Square> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::{GameState, StateError};
    use crate::engine::types::{ParsePieceError, Piece};

    fn piece(code: &str) -> Piece {
        code.parse().unwrap_or_else(|err| panic!("{err}"))
    }

    #[test]
    fn from_codes_builds_typed_state() {
        let mut cells: Vec<Option<&str>> = vec![None; 16];
        cells[5] = Some("BDEC");
        cells[15] = Some("SLFP");
        let state = GameState::from_codes(&cells, Some("BLEP"));
        let state = state.unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(state.pending(), Some(piece("BLEP")));
        assert_eq!(state.board().empty_count(), 14);
        assert_eq!(state.available().len(), 13);
    }

    #[test]
    fn from_codes_rejects_bad_input() {
        let short: Vec<Option<&str>> = vec![None; 15];
        assert_eq!(
            GameState::from_codes(&short, None),
            Err(StateError::BoardLength(15))
        );

        let mut cells: Vec<Option<&str>> = vec![None; 16];
        assert_eq!(
            GameState::from_codes(&cells, Some("nope")),
            Err(StateError::InvalidPiece(ParsePieceError("nope".to_owned())))
        );

        cells[0] = Some("BDEC");
        cells[1] = Some("BDEC");
        assert_eq!(
            GameState::from_codes(&cells, None),
            Err(StateError::DuplicatePiece(piece("BDEC")))
        );

        cells[1] = None;
        assert_eq!(
            GameState::from_codes(&cells, Some("BDEC")),
            Err(StateError::PendingOnBoard(piece("BDEC")))
        );
    }

    #[test]
    fn malformed_board_codes_block_their_square() {
        let mut cells: Vec<Option<&str>> = vec![None; 16];
        cells[0] = Some("BDEC");
        cells[1] = Some("XXXX");
        cells[2] = Some("bdec");
        let state = GameState::from_codes(&cells, Some("SLFP"));
        let state = state.unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(state.available().len(), 14);
        assert!(!state.available().contains(piece("BDEC")));
        assert!(!state.available().contains(piece("SLFP")));
        assert_eq!(state.board().blocked(), 0b110);
        assert_eq!(state.board().empty_count(), 13);
    }

    #[test]
    fn full_board_keeps_pending_for_the_agent_to_reject() {
        let cells: Vec<Option<String>> = Piece::all().map(|p| Some(p.to_string())).collect();
        let state = GameState::from_codes(&cells, Some("BDEC"));
        let state = state.unwrap_or_else(|err| panic!("{err}"));
        assert!(state.board().is_full());
        assert!(state.available().is_empty());
    }
}
