/// 即断ヒューリスティックと反復深化アルファベータ探索を組み合わせたAI。
pub mod alphabeta;
/// 即勝ち・妨害・位置の順に判断するルールベースのAI。
pub mod heuristic;
/// 初手で渡す駒を選ぶための危険な並びの検出。
pub mod patterns;
/// 空きマスと渡す駒を一様ランダムに選ぶAI。
pub mod random;
/// 即勝ち・安全な駒・強制局面などの判定。
pub mod tactics;
/// シード付きの同点候補選択。
pub mod tiebreak;
/// AI 共通の型。
pub mod types;

pub type MoveError = types::MoveError;
