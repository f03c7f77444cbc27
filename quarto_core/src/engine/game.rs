use thiserror::Error;

use crate::engine::board::{Board, PlaceError};
use crate::engine::state::{GameState, Move};
use crate::engine::types::{Piece, Square};

/// 対局者。初手（駒を渡すだけ）は `First` が行う。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Player {
    /// 先に駒を渡す側。
    First,
    /// 先に駒を置く側。
    Second,
}

impl Player {
    /// 相手を返す。
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// ゲームの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Status {
    /// 盤が埋まり、ラインは完成しなかった。
    Draw,
    /// 進行中。
    InProgress,
    /// ラインを完成させた側の勝ち。
    Won {
        /// 勝者。
        winner: Player,
    },
}

/// 手の適用に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum PlayError {
    /// すでに終局している。
    #[error("the game is already over")]
    GameOver,
    /// 指定マスが埋まっている。
    #[error("square {} is occupied", .0.index())]
    Occupied(Square),
    /// 渡す駒が必要なのに指定されていない。
    #[error("a piece must be handed over")]
    PieceRequired,
    /// 渡そうとした駒は使用済み。
    #[error("piece {0} is not available")]
    PieceUnavailable(Piece),
    /// 初手でマスが指定された。
    #[error("the opening move must not place a piece")]
    PositionNotAllowed,
    /// 置くマスが指定されていない。
    #[error("a position is required")]
    PositionRequired,
}

/// 1ゲームの進行を管理する構造体。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Game {
    /// 次に手を指す側。
    side_to_move: Player,
    /// 現在の局面。
    state: GameState,
    /// 直近の状態。
    status: Status,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// 空盤面からゲームを開始する。
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            side_to_move: Player::First,
            state: GameState::opening(),
            status: Status::InProgress,
        }
    }

    /// 終局しているかどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        !matches!(self.status, Status::InProgress)
    }

    /// 1手を適用する。
    ///
    /// # Errors
    ///
    /// 終局後の手、初手のマス指定、埋まったマス、使用済みの駒などを `PlayError` で返す。
    pub fn play(&mut self, mv: Move) -> Result<Status, PlayError> {
        if self.is_game_over() {
            return Err(PlayError::GameOver);
        }

        let available = self.state.available();
        let board = match (self.state.pending(), mv.position()) {
            (None, Some(_)) => return Err(PlayError::PositionNotAllowed),
            (Some(_), None) => return Err(PlayError::PositionRequired),
            (None, None) => self.state.board(),
            (Some(pending), Some(square)) => {
                match self.state.board().place(square, pending) {
                    Ok(next) => next,
                    Err(PlaceError::Occupied(sq)) => return Err(PlayError::Occupied(sq)),
                    Err(PlaceError::AlreadyPlaced(piece)) => {
                        return Err(PlayError::PieceUnavailable(piece));
                    }
                }
            }
        };

        if board.is_winning() {
            self.commit(board, None);
            self.status = Status::Won {
                winner: self.side_to_move,
            };
            return Ok(self.status);
        }

        match mv.piece() {
            Some(piece) if !available.contains(piece) => {
                return Err(PlayError::PieceUnavailable(piece));
            }
            None if !available.is_empty() => return Err(PlayError::PieceRequired),
            _ => {}
        }

        self.commit(board, mv.piece());
        if board.is_full() {
            self.status = Status::Draw;
        }
        Ok(self.status)
    }

    /// 次の手番側が受け取る局面を返す。
    #[inline]
    #[must_use]
    pub const fn state(self) -> GameState {
        self.state
    }

    /// 次に手を指す側を返す。
    #[inline]
    #[must_use]
    pub const fn side_to_move(self) -> Player {
        self.side_to_move
    }

    /// 現在のゲーム状態を返す。
    #[inline]
    #[must_use]
    pub const fn status(self) -> Status {
        self.status
    }

    /// 盤面と渡された駒を確定し、手番を交代する。
    fn commit(&mut self, board: Board, handed: Option<Piece>) {
        // 駒は盤上に無いことを確認済み。
        self.state = GameState::new(board, handed).unwrap_or(self.state);
        self.side_to_move = self.side_to_move.opponent();
    }
}
