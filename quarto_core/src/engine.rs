/// 盤面（マス、ライン、勝利判定）の実装。
pub mod board;
/// ゲーム進行（手の適用、終局判定）の実装。
pub mod game;
/// 渡せる駒の集合の計算。
pub mod pieces;
/// 外部から受け取る局面と、エージェントが返す手。
pub mod state;
pub mod types;

pub type Board = board::Board;
pub type Game = game::Game;
pub type GameState = state::GameState;
pub type GameStatus = game::Status;
pub type Move = state::Move;
pub type Piece = types::Piece;
pub type PieceSet = pieces::PieceSet;
pub type PlayError = game::PlayError;
pub type Player = game::Player;
pub type Square = types::Square;
pub type StateError = state::StateError;
