use std::time::Instant;

use super::tt::PositionCache;

/// ノード数と時刻による打ち切り条件。
#[derive(Clone, Copy, Debug)]
pub(super) struct SearchLimits {
    /// この時刻を過ぎたら打ち切る（`None` は時刻で打ち切らない）。
    deadline: Option<Instant>,
    /// 数えたノードがこの値に達したら打ち切る。
    node_budget: u64,
}

impl SearchLimits {
    /// `node_budget` に `u64::MAX` を渡すとノード数では打ち切らない。
    pub(super) const fn new(node_budget: u64, deadline: Option<Instant>) -> Self {
        Self {
            deadline,
            node_budget,
        }
    }

    /// どちらかの条件を満たしたか。
    fn exceeded(self, nodes: u64) -> bool {
        nodes >= self.node_budget
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// 1回の探索で数えた値。
#[derive(Default, Clone, Copy, Debug)]
pub(super) struct SearchStats {
    /// 局面キャッシュの参照が使えた回数。
    cache_hits: u64,
    /// 局面キャッシュへの書き込み回数。
    cache_stores: u64,
    /// 窓が閉じて残りの子を読まなかった回数。
    cutoffs: u64,
    /// 訪れたノード数。
    nodes: u64,
}

impl SearchStats {
    pub(super) const fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub(super) const fn cache_stores(&self) -> u64 {
        self.cache_stores
    }

    pub(super) const fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    pub(super) const fn inc_cache_hits(&mut self) {
        self.cache_hits = self.cache_hits.wrapping_add(1);
    }

    pub(super) const fn inc_cache_stores(&mut self) {
        self.cache_stores = self.cache_stores.wrapping_add(1);
    }

    pub(super) const fn inc_cutoffs(&mut self) {
        self.cutoffs = self.cutoffs.wrapping_add(1);
    }

    pub(super) const fn inc_nodes(&mut self) {
        self.nodes = self.nodes.wrapping_add(1);
    }

    pub(super) const fn nodes(&self) -> u64 {
        self.nodes
    }
}

/// 打ち切り条件に達したことを表す。探索の外には出さない。
#[derive(Debug, Clone, Copy)]
pub(super) struct SearchAbort;

/// 探索中に持ち回る状態（キャッシュ、打ち切り条件、統計）。
pub(super) struct SearchContext<'ctx> {
    /// 呼び出し側が所有する局面キャッシュ。
    cache: &'ctx mut PositionCache,
    /// 打ち切り条件。
    limits: SearchLimits,
    /// 統計。
    stats: SearchStats,
}

impl<'ctx> SearchContext<'ctx> {
    pub(super) fn new(limits: SearchLimits, cache: &'ctx mut PositionCache) -> Self {
        Self {
            cache,
            limits,
            stats: SearchStats::default(),
        }
    }

    pub(super) const fn cache(&self) -> &PositionCache {
        &*self.cache
    }

    pub(super) const fn cache_mut(&mut self) -> &mut PositionCache {
        &mut *self.cache
    }

    /// 打ち切り条件に達したか。
    pub(super) fn should_stop(&self) -> bool {
        self.limits.exceeded(self.stats.nodes())
    }

    pub(super) const fn stats(&self) -> SearchStats {
        self.stats
    }

    pub(super) const fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }
}
