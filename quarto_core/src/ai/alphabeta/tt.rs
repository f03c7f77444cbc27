//! 局面キャッシュ。
//!
//! キーは（盤面, 置く駒）。値は探索深さと評価値、およびその値が正確値か上限・下限か。

use std::collections::HashMap;

use crate::engine::board::Board;
use crate::engine::types::Piece;

/// 盤面キーの後ろに置く駒を詰めるビット位置（盤面は 16 マス x 5 ビット）。
const PENDING_SHIFT: u32 = 80;

/// 既存エントリがあるときの上書き規則。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum ReplacePolicy {
    /// 常に上書きする。
    Always,
    /// 新しい深さが既存以上のときだけ上書きする。
    #[default]
    KeepDeeper,
}

/// 評価値の種別。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Bound {
    /// 正確な値。
    Exact,
    /// 下限（この値以上）。
    Lower,
    /// 上限（この値以下）。
    Upper,
}

/// キャッシュのエントリ。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CacheEntry {
    /// `value` の意味。
    bound: Bound,
    /// この値が保証される探索深さ。
    depth: u8,
    /// 評価値。
    value: i32,
}

impl CacheEntry {
    /// 評価値の種別を返す。
    #[inline]
    #[must_use]
    pub const fn bound(self) -> Bound {
        self.bound
    }

    /// 探索深さを返す。
    #[inline]
    #[must_use]
    pub const fn depth(self) -> u8 {
        self.depth
    }

    /// 評価値を返す。
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.value
    }
}

/// 1回の探索セッションが所有する局面キャッシュ。
#[derive(Clone, Debug, Default)]
pub struct PositionCache {
    /// エントリ本体。
    entries: HashMap<u128, CacheEntry>,
    /// 上書き規則。
    policy: ReplacePolicy,
}

impl PositionCache {
    /// 空か。
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 登録済みのキー数。
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `min_depth` 以上の深さで保存された評価値を返す。
    #[must_use]
    pub fn lookup(&self, board: Board, pending: Piece, min_depth: u8) -> Option<i32> {
        self.probe(board, pending, min_depth).map(CacheEntry::value)
    }

    /// 空のキャッシュを作る。
    #[inline]
    #[must_use]
    pub fn new(policy: ReplacePolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
        }
    }

    /// 上書き規則を返す。
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> ReplacePolicy {
        self.policy
    }

    /// `min_depth` 以上の深さで保存されたエントリを返す。
    #[must_use]
    pub fn probe(&self, board: Board, pending: Piece, min_depth: u8) -> Option<CacheEntry> {
        self.entries
            .get(&key(board, pending))
            .copied()
            .filter(|entry| entry.depth >= min_depth)
    }

    /// 正確な評価値を保存する。
    pub fn store(&mut self, board: Board, pending: Piece, depth: u8, value: i32) {
        self.store_bounded(board, pending, depth, value, Bound::Exact);
    }

    /// 評価値を種別つきで保存する。
    pub fn store_bounded(
        &mut self,
        board: Board,
        pending: Piece,
        depth: u8,
        value: i32,
        bound: Bound,
    ) {
        let entry = CacheEntry {
            bound,
            depth,
            value,
        };
        let policy = self.policy;
        self.entries
            .entry(key(board, pending))
            .and_modify(|old| {
                if policy == ReplacePolicy::Always || depth >= old.depth {
                    *old = entry;
                }
            })
            .or_insert(entry);
    }
}

/// （盤面, 置く駒）のキー。
fn key(board: Board, pending: Piece) -> u128 {
    board.key() | ((u128::from(pending.index()) + 1) << PENDING_SHIFT)
}
