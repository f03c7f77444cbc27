use tracing::{debug, trace};

use crate::ai::tactics::{choose_handoff, forced_outcome_square, strategic_square, winning_square};
use crate::ai::tiebreak::TieBreaker;
use crate::engine::board::Board;
use crate::engine::pieces::PieceSet;
use crate::engine::state::Move;
use crate::engine::types::{Piece, Square};

use super::eval::evaluate;
use super::limits::{SearchAbort, SearchContext, SearchLimits};
use super::move_ordering::{order_handoffs, order_squares};
use super::tt::{Bound, PositionCache};
use super::{Config, ForcedProbe, INF, MoveSource, SearchReport, WIN_SCORE};

/// ルートで選んだ（マス, 渡す駒）とその評価値。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct RootMove {
    /// 渡す駒（残りがなければ `None`）。
    piece: Option<Piece>,
    /// 評価値。
    score: i32,
    /// 置くマス。
    square: Square,
}

impl RootMove {
    #[cfg(test)]
    /// 評価値を返す（テスト用）。
    pub(super) const fn score(self) -> i32 {
        self.score
    }

    /// 着手に変換する。
    pub(super) const fn to_move(self) -> Move {
        Move::place(self.square, self.piece)
    }
}

/// 1つの深さでのルート探索の結果。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum SearchOutcome {
    /// 全候補を調べ終えた。
    Completed(RootMove),
    /// 制限で打ち切った。それまでの最善（1つも評価していなければ `None`）。
    Partial(Option<RootMove>),
}

/// 着手を決める。即勝ち、強制局面、反復深化探索、位置による代替の順に試す。
///
/// `available` は `pending` を除いた渡せる駒。空きマスがなければ `None`。
pub(super) fn search_root(
    board: Board,
    pending: Piece,
    available: PieceSet,
    config: &Config,
    limits: SearchLimits,
    cache: &mut PositionCache,
    tiebreak: &mut TieBreaker,
) -> Option<SearchReport> {
    if let Some(square) = winning_square(board, pending) {
        let piece = choose_handoff(board.with_piece(square, pending), available, tiebreak);
        return Some(quick_report(
            Move::place(square, piece),
            MoveSource::ImmediateWin,
            Some(WIN_SCORE),
        ));
    }

    if config.forced_probe == ForcedProbe::AsObserved {
        if let Some(square) = forced_outcome_square(board, pending, available) {
            let piece = choose_handoff(board.with_piece(square, pending), available, tiebreak);
            return Some(quick_report(
                Move::place(square, piece),
                MoveSource::ForcedOutcome,
                None,
            ));
        }
    }

    let mut ctx = SearchContext::new(limits, cache);
    if let Some((root, depth)) = iterative_deepening(board, pending, available, config, &mut ctx)
    {
        return Some(SearchReport {
            best_move: root.to_move(),
            cache_hits: ctx.stats().cache_hits(),
            nodes: ctx.stats().nodes(),
            score: Some(root.score),
            source: MoveSource::Search { depth },
        });
    }

    let square = strategic_square(board, tiebreak)?;
    let piece = choose_handoff(board.with_piece(square, pending), available, tiebreak);
    trace!(square = square.index(), "no search result, positional fallback");
    Some(SearchReport {
        best_move: Move::place(square, piece),
        cache_hits: ctx.stats().cache_hits(),
        nodes: ctx.stats().nodes(),
        score: None,
        source: MoveSource::Fallback,
    })
}

/// 探索を伴わない結果。
const fn quick_report(best_move: Move, source: MoveSource, score: Option<i32>) -> SearchReport {
    SearchReport {
        best_move,
        cache_hits: 0,
        nodes: 0,
        score,
        source,
    }
}

/// 反復深化。完了した最も深い結果（なければ最初の打ち切り結果）とその深さを返す。
pub(super) fn iterative_deepening(
    board: Board,
    pending: Piece,
    available: PieceSet,
    config: &Config,
    ctx: &mut SearchContext<'_>,
) -> Option<(RootMove, u8)> {
    let empties = board.empty_count();
    let filled = Square::COUNT.saturating_sub(empties);
    let max_depth = config.depth_limit_for(filled);
    let step = config.depth_step.max(1);

    let mut best: Option<(RootMove, u8)> = None;
    let mut completed = false;
    let mut depth = config.start_depth.max(1);

    while depth <= max_depth {
        match root_search(board, pending, available, depth, ctx) {
            SearchOutcome::Completed(root) => {
                let stats = ctx.stats();
                debug!(
                    depth,
                    score = root.score,
                    square = root.square.index(),
                    nodes = stats.nodes(),
                    cache_hits = stats.cache_hits(),
                    cache_stores = stats.cache_stores(),
                    cutoffs = stats.cutoffs(),
                    "depth completed"
                );
                best = Some((root, depth));
                completed = true;
                // 勝敗が確定したか、盤が埋まるまで読み切った。
                if root.score.abs() >= WIN_SCORE || depth >= empties {
                    break;
                }
            }
            SearchOutcome::Partial(root) => {
                trace!(depth, found = root.is_some(), "search interrupted");
                if !completed {
                    best = root.map(|value| (value, depth));
                }
                break;
            }
        }

        if ctx.should_stop() {
            break;
        }
        depth = match depth.checked_add(step) {
            Some(value) => value,
            None => break,
        };
    }

    best
}

/// 指定深さのルート探索（手番側＝最大化側）。
pub(super) fn root_search(
    board: Board,
    pending: Piece,
    available: PieceSet,
    depth: u8,
    ctx: &mut SearchContext<'_>,
) -> SearchOutcome {
    let mut best: Option<RootMove> = None;
    let mut alpha = -INF;
    let beta = INF;
    let next_depth = depth.saturating_sub(1);

    for square in order_squares(board) {
        let after = board.with_piece(square, pending);
        for handed in handoff_candidates(after, available) {
            let score = match child_score(after, handed, available, next_depth, alpha, beta, false, ctx)
            {
                Ok(value) => value,
                Err(SearchAbort) => return SearchOutcome::Partial(best),
            };
            if best.is_none_or(|current| score > current.score) {
                best = Some(RootMove {
                    piece: handed,
                    score,
                    square,
                });
            }
            if score > alpha {
                alpha = score;
            }
            if ctx.should_stop() {
                return SearchOutcome::Partial(best);
            }
        }
    }

    best.map_or(SearchOutcome::Partial(None), SearchOutcome::Completed)
}

/// 置いた後の盤面で渡す駒の候補。残りがなければ「渡さない」だけ。
fn handoff_candidates(after: Board, available: PieceSet) -> Vec<Option<Piece>> {
    if available.is_empty() {
        return vec![None];
    }
    order_handoffs(after, available)
        .into_iter()
        .map(Some)
        .collect()
}

/// 駒を渡した先の局面を評価する。
#[expect(clippy::too_many_arguments, reason = "探索状態をそのまま受け渡す")]
fn child_score(
    after: Board,
    handed: Option<Piece>,
    available: PieceSet,
    depth: u8,
    alpha: i32,
    beta: i32,
    maximizing: bool,
    ctx: &mut SearchContext<'_>,
) -> Result<i32, SearchAbort> {
    match handed {
        Some(piece) => minimax(
            after,
            piece,
            available.without(piece),
            depth,
            alpha,
            beta,
            maximizing,
            ctx,
        ),
        None => Ok(evaluate(after, maximizing)),
    }
}

/// 置換表を参照し、探索窓（`alpha`/`beta`）を狭める。
///
/// - `Exact` の場合はその値を即座に返す。
/// - `Lower`/`Upper` の場合は `alpha`/`beta` を更新し、カットできるなら値を返す。
fn cache_probe_adjust_window(
    board: Board,
    pending: Piece,
    depth: u8,
    alpha: &mut i32,
    beta: &mut i32,
    ctx: &mut SearchContext<'_>,
) -> Option<i32> {
    let entry = ctx.cache().probe(board, pending, depth)?;
    ctx.stats_mut().inc_cache_hits();

    let value = entry.value();
    match entry.bound() {
        Bound::Exact => return Some(value),
        Bound::Lower => {
            if value >= *beta {
                return Some(value);
            }
            if value > *alpha {
                *alpha = value;
            }
        }
        Bound::Upper => {
            if value <= *alpha {
                return Some(value);
            }
            if value < *beta {
                *beta = value;
            }
        }
    }
    (*alpha >= *beta).then_some(value)
}

/// アルファベータ法つきミニマックス。
///
/// 1 ply は「`pending` を置き、残りの駒から1つを渡す」。値は最大化側から見た評価値。
#[expect(clippy::too_many_arguments, reason = "探索状態をそのまま受け渡す")]
pub(super) fn minimax(
    board: Board,
    pending: Piece,
    available: PieceSet,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    ctx: &mut SearchContext<'_>,
) -> Result<i32, SearchAbort> {
    ctx.stats_mut().inc_nodes();
    if ctx.should_stop() {
        return Err(SearchAbort);
    }

    if let Some(value) = cache_probe_adjust_window(board, pending, depth, &mut alpha, &mut beta, ctx)
    {
        return Ok(value);
    }

    if board.is_full() || depth == 0 {
        return Ok(evaluate(board, maximizing));
    }

    if winning_square(board, pending).is_some() {
        let score = if maximizing { WIN_SCORE } else { -WIN_SCORE };
        ctx.cache_mut().store(board, pending, depth, score);
        ctx.stats_mut().inc_cache_stores();
        return Ok(score);
    }

    let alpha_orig = alpha;
    let beta_orig = beta;
    let next_depth = depth.saturating_sub(1);
    let mut best = if maximizing { -INF } else { INF };

    'cells: for square in order_squares(board) {
        let after = board.with_piece(square, pending);
        for handed in handoff_candidates(after, available) {
            let score = match child_score(
                after,
                handed,
                available,
                next_depth,
                alpha,
                beta,
                !maximizing,
                ctx,
            ) {
                Ok(value) => value,
                Err(err) => return Err(err),
            };

            if maximizing {
                if score > best {
                    best = score;
                }
                if best > alpha {
                    alpha = best;
                }
            } else {
                if score < best {
                    best = score;
                }
                if best < beta {
                    beta = best;
                }
            }

            if ctx.should_stop() {
                return Err(SearchAbort);
            }
            if alpha >= beta {
                ctx.stats_mut().inc_cutoffs();
                break 'cells;
            }
        }
    }

    let bound = if best <= alpha_orig {
        Bound::Upper
    } else if best >= beta_orig {
        Bound::Lower
    } else {
        Bound::Exact
    };
    ctx.cache_mut()
        .store_bounded(board, pending, depth, best, bound);
    ctx.stats_mut().inc_cache_stores();

    Ok(best)
}
