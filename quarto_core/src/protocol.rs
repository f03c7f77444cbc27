//! 対戦サーバーとやり取りする JSON メッセージ。
//!
//! 1回の接続で要求を1つ受け取り、応答を1つ返す。
//!
//! ```json
//! {"request": "play", "state": {"board": [null, "BDEC", ...], "piece": "SLFP"}}
//! {"response": "move", "move": {"pos": 5, "piece": "BLEP"}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::ai::types::Ai;
use crate::engine::state::{GameState, Move, StateError};
use crate::engine::types::Square;

/// 受け付ける `request` の値。
const KNOWN_REQUESTS: [&str; 3] = ["ping", "play", "subscribe"];

/// 要求を解釈できなかった理由。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// JSON として読めない。
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// 既知の要求だが中身が足りないか型が違う。
    #[error("malformed '{kind}' request: {source}")]
    Malformed {
        /// 要求の種類。
        kind: String,
        /// 元のエラー。
        source: serde_json::Error,
    },
    /// `request` フィールドがない。
    #[error("missing 'request' field")]
    MissingRequest,
    /// 未知の要求。
    #[error("Unknown request '{0}'")]
    UnknownRequest(String),
}

/// サーバーとの間で流れる要求。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "lowercase")]
#[non_exhaustive]
pub enum Request {
    /// 生存確認。
    Ping,
    /// 局面を渡して手を求める。
    Play {
        /// 手番の局面。
        state: WireState,
    },
    /// サーバーへの参加登録（クライアントが送る）。
    Subscribe {
        /// 表示名。
        name: String,
        /// 要求を待ち受けるポート。
        port: u16,
        /// 参加者の識別番号。
        matricules: Vec<String>,
    },
}

/// 要求に対する応答。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "lowercase")]
#[non_exhaustive]
pub enum Response {
    /// 参加登録の受理。
    Ok,
    /// `ping` への応答。
    Pong,
    /// 選んだ手。
    Move {
        /// 手の中身。
        #[serde(rename = "move")]
        mv: WireMove,
    },
    /// 失敗の説明。
    Error {
        /// メッセージ。
        error: String,
    },
}

impl Response {
    /// エラー応答を作る。
    #[inline]
    #[must_use]
    pub fn error(message: impl ToString) -> Self {
        Self::Error {
            error: message.to_string(),
        }
    }
}

/// JSON 上の局面表現。
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct WireState {
    /// 行優先の16マス。空きは `null`。
    pub board: Vec<Option<String>>,
    /// これから置く駒。初手は `null`。
    #[serde(default)]
    pub piece: Option<String>,
}

impl WireState {
    /// 検証して局面に変換する。盤上の文法に合わないコードはそのマスを塞ぐだけで、エラーにしない。
    ///
    /// # Errors
    ///
    /// マス数、手持ちの駒のコード、駒の重複のいずれかが不正なら `StateError` を返す。
    pub fn to_game_state(&self) -> Result<GameState, StateError> {
        GameState::from_codes(&self.board, self.piece.as_deref())
    }
}

impl From<GameState> for WireState {
    fn from(state: GameState) -> Self {
        let board = state.board();
        Self {
            board: Square::all()
                .map(|square| board.piece_at(square).map(|piece| piece.to_string()))
                .collect(),
            piece: state.pending().map(|piece| piece.to_string()),
        }
    }
}

/// JSON 上の手の表現。
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct WireMove {
    /// 置くマス（0..=15）。初手は `null`。
    pub pos: Option<u8>,
    /// 渡す駒。渡せる駒がなければ `null`。
    pub piece: Option<String>,
}

impl From<Move> for WireMove {
    fn from(mv: Move) -> Self {
        Self {
            pos: mv.position().map(Square::index),
            piece: mv.piece().map(|piece| piece.to_string()),
        }
    }
}

/// 受け取った JSON 値を要求として解釈する。
///
/// # Errors
///
/// - `ProtocolError::MissingRequest`: `request` フィールドがない場合
/// - `ProtocolError::UnknownRequest`: 未知の要求の場合
/// - `ProtocolError::Malformed`: 既知の要求だが形式が合わない場合
pub fn parse_request(value: Value) -> Result<Request, ProtocolError> {
    let kind = match value.get("request") {
        Some(Value::String(kind)) => kind.clone(),
        Some(other) => other.to_string(),
        None => return Err(ProtocolError::MissingRequest),
    };
    if !KNOWN_REQUESTS.contains(&kind.as_str()) {
        return Err(ProtocolError::UnknownRequest(kind));
    }
    serde_json::from_value(value).map_err(|source| ProtocolError::Malformed { kind, source })
}

/// 要求1つに対する応答を作る。
///
/// 局面の検証や手の選択に失敗した場合もエラー応答を返し、パニックしない。
pub fn respond(request: Request, agent: &mut dyn Ai) -> Response {
    match request {
        Request::Ping => Response::Pong,
        Request::Play { state } => {
            let state = match state.to_game_state() {
                Ok(value) => value,
                Err(err) => return Response::error(err),
            };
            match agent.select_move(state) {
                Ok(mv) => Response::Move { mv: mv.into() },
                Err(err) => Response::error(err),
            }
        }
        Request::Subscribe { .. } => Response::error(ProtocolError::UnknownRequest(
            "subscribe".to_owned(),
        )),
    }
}

/// JSON 値を解釈して応答を作る。
#[must_use]
pub fn handle(value: Value, agent: &mut dyn Ai) -> Response {
    match parse_request(value) {
        Ok(request) => {
            trace!(?request, "request parsed");
            respond(request, agent)
        }
        Err(err) => Response::error(err),
    }
}
