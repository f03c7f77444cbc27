use rand::{Rng as _, SeedableRng as _};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::engine::pieces::PieceSet;
use crate::engine::types::{Piece, Square, squares_in};

/// 既定のシード。
pub const DEFAULT_SEED: u64 = 0x5155_4152_544F_0001;

/// 同点候補から1つを選ぶ乱数源。
///
/// 候補は常にインデックス昇順に並べてから一様に選ぶ。
/// 同じシードなら同じ候補列に対して同じ選択を返す。
#[derive(Clone, Debug)]
pub struct TieBreaker {
    /// 乱数生成器（プラットフォーム非依存）。
    rng: Xoshiro256PlusPlus,
}

impl TieBreaker {
    /// `seed` で初期化する。
    #[inline]
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// 候補列から一様に1つ選ぶ。空なら `None`。
    pub fn pick<T: Copy>(&mut self, candidates: &[T]) -> Option<T> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..candidates.len());
        candidates.get(index).copied()
    }

    /// 駒集合から一様に1つ選ぶ。
    pub fn pick_piece(&mut self, pieces: PieceSet) -> Option<Piece> {
        let candidates: Vec<Piece> = pieces.iter().collect();
        self.pick(&candidates)
    }

    /// マス集合（ビット）から一様に1つ選ぶ。
    pub fn pick_square(&mut self, mask: u16) -> Option<Square> {
        let candidates: Vec<Square> = squares_in(mask).collect();
        self.pick(&candidates)
    }
}

impl Default for TieBreaker {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
