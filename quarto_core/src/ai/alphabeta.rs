use core::time::Duration;
use std::time::Instant;

use tracing::{debug, trace};

use crate::ai::patterns::{dangerous_patterns, dangerous_pieces};
use crate::ai::tiebreak::{DEFAULT_SEED, TieBreaker};
use crate::ai::types::{Ai, MoveError, playable_pieces};
use crate::engine::board::Board;
use crate::engine::pieces::PieceSet;
use crate::engine::state::{GameState, Move};

use self::limits::SearchLimits;
use self::search::search_root;
use self::tt::PositionCache;

pub use self::tt::ReplacePolicy;

/// 静的評価関数。
mod eval;
/// 探索制限・統計・コンテキスト。
mod limits;
/// マスと渡す駒の並び順。
mod move_ordering;
/// 反復深化とアルファベータ探索。
mod search;
/// 局面キャッシュ（置換表）。
pub mod tt;


/// 勝敗が確定した局面の評価値。
pub const WIN_SCORE: i32 = 1000;

/// 探索窓の初期値（どの評価値よりも大きい）。
const INF: i32 = 1_000_000;

/// 後半に最大深さへ足す深さ。反復深化の刻みとは独立。
const LATE_GAME_EXTRA_DEPTH: u8 = 2;

/// 「必ず誰かが即勝ちできる」マスの検出をどう扱うか。
///
/// 検出したマスは次に置く側（相手）に勝ち筋を与える配置でもある。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum ForcedProbe {
    /// 検出したマスをそのまま着手として返す。
    #[default]
    AsObserved,
    /// 検出を行わず探索に任せる。
    Disabled,
}

/// 着手がどの段階で決まったか。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum MoveSource {
    /// 置くマスで即勝ち。
    ImmediateWin,
    /// 強制局面の検出。
    ForcedOutcome,
    /// 初手（駒を渡すだけ）。
    Opening,
    /// 探索結果。`depth` は採用した結果の深さ。
    Search {
        /// 探索深さ（ply）。
        depth: u8,
    },
    /// 探索が間に合わず位置だけで決めた。
    Fallback,
}

/// アルファベータ探索の設定。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Config {
    /// 置換表の上書き規則。
    pub cache_policy: ReplacePolicy,
    /// 反復深化の刻み。
    pub depth_step: u8,
    /// 序盤とみなす埋まりマス数（未満）。
    pub early_game_filled: u8,
    /// 序盤の最大深さ。
    pub early_game_depth_cap: u8,
    /// 終盤とみなす空きマス数（以下）。
    pub endgame_empty_threshold: u8,
    /// 終盤の持ち時間。
    pub endgame_time_budget: Duration,
    /// 強制局面の検出。
    pub forced_probe: ForcedProbe,
    /// 後半の最大深さの上限。
    pub late_game_depth_cap: u8,
    /// 後半とみなす埋まりマス数（以上）。
    pub late_game_filled: u8,
    /// 最大深さ。
    pub max_depth: u8,
    /// ノード数の上限（`None` で無制限）。
    pub node_budget: Option<u64>,
    /// 同点候補を選ぶ乱数のシード。
    pub seed: u64,
    /// 反復深化の開始深さ。
    pub start_depth: u8,
    /// 通常の持ち時間。
    pub time_budget: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_policy: ReplacePolicy::KeepDeeper,
            depth_step: 2,
            early_game_filled: 4,
            early_game_depth_cap: 4,
            endgame_empty_threshold: 6,
            endgame_time_budget: Duration::from_millis(1000),
            forced_probe: ForcedProbe::AsObserved,
            late_game_depth_cap: 10,
            late_game_filled: 8,
            max_depth: 8,
            node_budget: None,
            seed: DEFAULT_SEED,
            start_depth: 2,
            time_budget: Duration::from_millis(500),
        }
    }
}

impl Config {
    /// 空きマス数に応じた持ち時間を返す。
    #[inline]
    #[must_use]
    pub const fn budget_for(&self, empty_count: u8) -> Duration {
        if empty_count <= self.endgame_empty_threshold {
            self.endgame_time_budget
        } else {
            self.time_budget
        }
    }

    /// 埋まりマス数に応じた最大深さを返す。
    ///
    /// 後半は `max_depth + 2` を `late_game_depth_cap` で抑えた値。
    #[inline]
    #[must_use]
    pub fn depth_limit_for(&self, filled: u8) -> u8 {
        if filled >= self.late_game_filled {
            self.late_game_depth_cap
                .min(self.max_depth.saturating_add(LATE_GAME_EXTRA_DEPTH))
        } else if filled < self.early_game_filled {
            self.max_depth.min(self.early_game_depth_cap)
        } else {
            self.max_depth
        }
    }

    /// 置換表の上書き規則を設定する。
    #[must_use]
    pub const fn with_cache_policy(mut self, policy: ReplacePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// 終盤の持ち時間を設定する。
    #[must_use]
    pub const fn with_endgame_time_budget(mut self, budget: Duration) -> Self {
        self.endgame_time_budget = budget;
        self
    }

    /// 強制局面の検出方法を設定する。
    #[must_use]
    pub const fn with_forced_probe(mut self, probe: ForcedProbe) -> Self {
        self.forced_probe = probe;
        self
    }

    /// 最大深さを設定する。
    #[must_use]
    pub const fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    /// ノード数の上限を設定する。
    #[must_use]
    pub const fn with_node_budget(mut self, budget: Option<u64>) -> Self {
        self.node_budget = budget;
        self
    }

    /// シードを設定する。
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 通常の持ち時間を設定する。
    #[must_use]
    pub const fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }
}

/// 1回の着手決定の結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchReport {
    /// 選んだ手。
    best_move: Move,
    /// 置換表のヒット数。
    cache_hits: u64,
    /// 探索したノード数。
    nodes: u64,
    /// 採用した結果の評価値（探索していなければ `None`）。
    score: Option<i32>,
    /// 手を決めた段階。
    source: MoveSource,
}

impl SearchReport {
    /// 選んだ手を返す。
    #[inline]
    #[must_use]
    pub const fn best_move(self) -> Move {
        self.best_move
    }

    /// 置換表のヒット数を返す。
    #[inline]
    #[must_use]
    pub const fn cache_hits(self) -> u64 {
        self.cache_hits
    }

    /// 探索したノード数を返す。
    #[inline]
    #[must_use]
    pub const fn nodes(self) -> u64 {
        self.nodes
    }

    /// 評価値を返す。
    #[inline]
    #[must_use]
    pub const fn score(self) -> Option<i32> {
        self.score
    }

    /// 手を決めた段階を返す。
    #[inline]
    #[must_use]
    pub const fn source(self) -> MoveSource {
        self.source
    }
}

/// 即断ヒューリスティックと反復深化アルファベータ探索を組み合わせたAI。
///
/// 呼び出しごとに新しい置換表と乱数を用意するので、呼び出し間で状態は残らない。
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Agent {
    /// 探索設定。
    config: Config,
}

impl Agent {
    /// 探索設定を返す。
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// `config` を指定して初期化する。
    #[inline]
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// 局面を解析し、手とその根拠を返す。
    ///
    /// # Errors
    ///
    /// - `MoveError::BoardFull`: 置く駒があるのに空きマスがない場合
    /// - `MoveError::NoPieceAvailable`: 初手で渡せる駒がない場合
    pub fn analyse(&self, state: GameState) -> Result<SearchReport, MoveError> {
        let available = match playable_pieces(state) {
            Ok(value) => value,
            Err(err) => return Err(err),
        };
        let board = state.board();
        let mut tiebreak = TieBreaker::new(self.config.seed);

        let Some(pending) = state.pending() else {
            return opening_move(board, available, &mut tiebreak);
        };

        let budget = self.config.budget_for(board.empty_count());
        let limits = SearchLimits::new(
            self.config.node_budget.unwrap_or(u64::MAX),
            Instant::now().checked_add(budget),
        );
        let mut cache = PositionCache::new(self.config.cache_policy);
        let report = match search_root(
            board,
            pending,
            available,
            &self.config,
            limits,
            &mut cache,
            &mut tiebreak,
        ) {
            Some(value) => value,
            None => return Err(MoveError::BoardFull),
        };
        debug!(
            source = ?report.source(),
            score = ?report.score(),
            nodes = report.nodes(),
            cache_hits = report.cache_hits(),
            cache_entries = cache.len(),
            "move selected"
        );
        Ok(report)
    }
}

impl Ai for Agent {
    #[inline]
    fn select_move(&mut self, state: GameState) -> Result<Move, MoveError> {
        self.analyse(state).map(SearchReport::best_move)
    }
}

/// 初手。危険な並びに合う駒を避けて渡す。
fn opening_move(
    board: Board,
    available: PieceSet,
    tiebreak: &mut TieBreaker,
) -> Result<SearchReport, MoveError> {
    let patterns = dangerous_patterns(board);
    let dangerous = dangerous_pieces(available, &patterns);
    let calm: PieceSet = available
        .iter()
        .filter(|&piece| !dangerous.contains(piece))
        .collect();
    trace!(
        patterns = patterns.len(),
        dangerous = dangerous.len(),
        "opening piece choice"
    );

    let candidates = if calm.is_empty() { available } else { calm };
    let piece = match tiebreak.pick_piece(candidates) {
        Some(value) => value,
        None => return Err(MoveError::NoPieceAvailable),
    };
    Ok(SearchReport {
        best_move: Move::opening(piece),
        cache_hits: 0,
        nodes: 0,
        score: None,
        source: MoveSource::Opening,
    })
}
