use crate::engine::board::Board;
use crate::engine::types::Piece;

/// 駒の集合（16ビット、ビット n が駒 n）。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PieceSet(u16);

impl PieceSet {
    /// 全16種類。
    pub const ALL: Self = Self(u16::MAX);

    /// 空集合。
    pub const EMPTY: Self = Self(0);

    /// 生のビットを返す。
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// 駒を含むか。
    #[inline]
    #[must_use]
    pub const fn contains(self, piece: Piece) -> bool {
        self.0 & piece.bit() != 0
    }

    /// インデックス最小の駒を返す。
    #[inline]
    #[must_use]
    pub fn first(self) -> Option<Piece> {
        self.iter().next()
    }

    /// 空集合か。
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 駒をインデックス昇順で返す。
    pub fn iter(self) -> impl Iterator<Item = Piece> {
        let mut bb = self.0;
        core::iter::from_fn(move || {
            if bb == 0 {
                return None;
            }
            let index = bb.trailing_zeros();
            bb &= bb.wrapping_sub(1);
            u8::try_from(index).ok().and_then(Piece::from_index)
        })
    }

    /// 要素数。
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// 駒を加えた集合。
    #[inline]
    #[must_use]
    pub const fn with(self, piece: Piece) -> Self {
        Self(self.0 | piece.bit())
    }

    /// 駒を除いた集合。
    #[inline]
    #[must_use]
    pub const fn without(self, piece: Piece) -> Self {
        Self(self.0 & !piece.bit())
    }
}

impl FromIterator<Piece> for PieceSet {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// 相手に渡せる駒（全16種から盤上の駒と手持ちの駒を除いたもの）。
#[must_use]
pub fn available(board: Board, pending: Option<Piece>) -> PieceSet {
    let used = board.used_pieces();
    let used = pending.map_or(used, |piece| used.with(piece));
    PieceSet(!used.bits())
}

#[cfg(test)]
mod tests {
    use super::{PieceSet, available};
    use crate::engine::board::Board;
    use crate::engine::types::{Piece, Square};

    fn piece(code: &str) -> Piece {
        code.parse().unwrap_or_else(|err| panic!("{err}"))
    }

    #[test]
    fn empty_board_without_pending_offers_everything() {
        assert_eq!(available(Board::new(), None), PieceSet::ALL);
        assert_eq!(available(Board::new(), None).len(), 16);
    }

    #[test]
    fn pool_size_accounts_for_board_and_pending() {
        let mut board = Board::new();
        let mut placed = 0_u32;
        for (square, code) in Square::all().zip(["BDEC", "SLFP", "BLEP", "SDFC", "BDFC"]) {
            board = board.place(square, piece(code)).unwrap_or(board);
            placed += 1;
            let with_pending = available(board, Some(piece("SLEC")));
            assert_eq!(with_pending.len(), 16 - placed - 1);
            assert!(!with_pending.contains(piece("SLEC")));
            assert!(!with_pending.contains(piece(code)));
            assert_eq!(available(board, None).len(), 16 - placed);
        }
    }

    #[test]
    fn iteration_is_ascending() {
        let set: PieceSet = [piece("SLFP"), piece("BDEC"), piece("BLEC")].into_iter().collect();
        let codes: Vec<String> = set.iter().map(|p| p.to_string()).collect();
        assert_eq!(codes, vec!["BDEC", "BLEC", "SLFP"]);
        assert_eq!(set.first(), Some(piece("BDEC")));
        assert_eq!(set.without(piece("BDEC")).len(), 2);
    }
}
