use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// 駒の属性の次元数（大きさ・色・重さ・形）。
pub const DIMENSIONS: u8 = 4;

/// 次元ごとの2種類の記号（次元順）。
const SYMBOLS: [[char; 2]; 4] = [['B', 'S'], ['D', 'L'], ['E', 'F'], ['C', 'P']];

/// 駒コードの解析に失敗した。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid piece code {0:?}")]
pub struct ParsePieceError(pub String);

/// 属性の集合。
///
/// 次元 `d` の値 `v` をビット `2 * d + v` で表す。駒1つはちょうど4ビット立つ。
/// 複数の駒の共通属性は `intersection` で求める。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Attributes(u8);

impl Attributes {
    /// 全属性。共通属性を畳み込む初期値。
    pub const ALL: Self = Self(u8::MAX);

    /// 空集合。
    pub const NONE: Self = Self(0);

    /// `other` の属性をすべて含むか。
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        other.0 & !self.0 == 0
    }

    /// 属性の数。
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// 共通部分。
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// 空集合か。
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 含まれる属性の記号を次元順に返す。
    #[must_use]
    pub fn symbols(self) -> Vec<char> {
        let mut out = Vec::new();
        for (dim, pair) in SYMBOLS.iter().enumerate() {
            for (value, symbol) in pair.iter().enumerate() {
                let bit = 1_u8 << (dim * 2 + value);
                if self.0 & bit != 0 {
                    out.push(*symbol);
                }
            }
        }
        out
    }
}

/// 駒（16種類のいずれか）。
///
/// インデックス 0..=15 の各ビットが1次元の値に対応する（最上位ビットが大きさ）。
/// インデックス順がそのままコードの辞書順と一致する（`BDEC` が 0、`SLFP` が 15）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Piece(
    /// 0..=15 のインデックス。
    u8,
);

impl Piece {
    /// 駒の種類数。
    pub const COUNT: u8 = 16;

    /// 全16種類をインデックス順に返す。
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }

    /// 駒が持つ属性の集合を返す。
    #[inline]
    #[must_use]
    pub const fn attributes(self) -> Attributes {
        let mut mask = 0_u8;
        let mut dim = 0_u8;
        while dim < DIMENSIONS {
            mask |= 1 << (dim * 2 + self.value(dim));
            dim += 1;
        }
        Attributes(mask)
    }

    /// 駒集合（`u16`）上のビットを返す。
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u16 {
        1 << self.0
    }

    /// インデックスから生成する。範囲外なら `None`。
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// インデックスを返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// 次元 `dim` の値（0 または 1）を返す。
    #[inline]
    #[must_use]
    pub const fn value(self, dim: u8) -> u8 {
        (self.0 >> (DIMENSIONS - 1 - dim)) & 1
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (dim, pair) in (0_u8..).zip(SYMBOLS.iter()) {
            let symbol = if self.value(dim) == 0 { pair[0] } else { pair[1] };
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    /// `[BS][DL][EF][CP]` の4文字だけを受け付ける。
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let mut chars = code.chars();
        let mut index = 0_u8;
        for pair in &SYMBOLS {
            let value = match chars.next() {
                Some(c) if c == pair[0] => 0,
                Some(c) if c == pair[1] => 1,
                _ => return Err(ParsePieceError(code.to_owned())),
            };
            index = (index << 1) | value;
        }
        if chars.next().is_some() {
            return Err(ParsePieceError(code.to_owned()));
        }
        Ok(Self(index))
    }
}

/// 盤面上のマス（0..=15 のインデックス、行優先）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Square(
    /// `y * 4 + x` に対応する 0..=15 の値。
    u8,
);

impl Square {
    /// 盤の一辺の長さ。
    pub const BOARD_LEN: u8 = 4;

    /// マスの数。
    pub const COUNT: u8 = 16;

    /// 全マスをインデックス順に返す。
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }

    /// そのマスを表すビット（`u16`）を返す。
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u16 {
        1 << self.0
    }

    /// インデックスから生成する。範囲外なら `None`。
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// インデックスから生成する（範囲チェックなし）。
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Self {
        Self(index)
    }

    /// 盤面座標（x, y）から生成する。
    #[inline]
    #[must_use]
    pub const fn from_xy(x: u8, y: u8) -> Option<Self> {
        if x >= Self::BOARD_LEN || y >= Self::BOARD_LEN {
            return None;
        }
        Some(Self(y * Self::BOARD_LEN + x))
    }

    /// 0..=15 のインデックスを返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// x 座標（列）を返す。
    #[inline]
    #[must_use]
    pub const fn x(self) -> u8 {
        self.0 % Self::BOARD_LEN
    }

    /// y 座標（行）を返す。
    #[inline]
    #[must_use]
    pub const fn y(self) -> u8 {
        self.0 / Self::BOARD_LEN
    }
}

/// マス集合のビットを、インデックス昇順の `Square` 列に展開する。
pub fn squares_in(mask: u16) -> impl Iterator<Item = Square> {
    let mut bb = mask;
    core::iter::from_fn(move || {
        if bb == 0 {
            return None;
        }
        let index = bb.trailing_zeros();
        bb &= bb.wrapping_sub(1);
        u8::try_from(index).ok().map(Square::from_index_unchecked)
    })
}
