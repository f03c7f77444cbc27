use thiserror::Error;

use crate::engine::pieces::PieceSet;
use crate::engine::types::{Attributes, Piece, Square, squares_in};

/// 勝利判定の対象となる10本のライン（4行、4列、2対角線）。
pub const LINES: [[u8; 4]; 10] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [8, 9, 10, 11],
    [12, 13, 14, 15],
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [3, 6, 9, 12],
];

/// 全マスのビット。
const FULL_MASK: u16 = u16::MAX;

/// 駒を置けなかった理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum PlaceError {
    /// 指定マスにはすでに駒がある。
    #[error("square {} is already occupied", .0.index())]
    Occupied(Square),
    /// その駒はすでに盤上にある。
    #[error("piece {0} is already on the board")]
    AlreadyPlaced(Piece),
}

/// 4x4 の盤面。
///
/// 同じ駒は盤上に高々1つしか存在しない（`place` が保証する）。
/// 文法に合わないコードが置かれていたマスは「塞がったマス」として扱う。
/// 塞がったマスには置けず、そこを通るラインは完成しない。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Board {
    /// 塞がったマスのビット集合。
    blocked: u16,
    /// 行優先のマス。
    cells: [Option<Piece>; 16],
}

impl Board {
    /// `square` を塞いだ盤面を返す。
    ///
    /// # Errors
    ///
    /// 指定マスが埋まっている場合、`PlaceError::Occupied` を返す。
    pub const fn block(self, square: Square) -> Result<Self, PlaceError> {
        if self.occupied() & square.bit() != 0 {
            return Err(PlaceError::Occupied(square));
        }
        let mut next = self;
        next.blocked |= square.bit();
        Ok(next)
    }

    /// 塞がったマスのビット集合を返す。
    #[inline]
    #[must_use]
    pub const fn blocked(self) -> u16 {
        self.blocked
    }

    /// 空マスの数を返す。
    #[inline]
    #[must_use]
    pub const fn empty_count(self) -> u8 {
        let free = self.empty_mask().count_ones();
        // 高々16。
        free as u8
    }

    /// 空マスのビット集合を返す。
    #[inline]
    #[must_use]
    pub const fn empty_mask(self) -> u16 {
        !self.occupied()
    }

    /// 空マスをインデックス昇順で返す。
    pub fn empty_squares(self) -> impl Iterator<Item = Square> {
        squares_in(self.empty_mask())
    }

    /// 盤上の駒がラインを完成させているか。
    #[must_use]
    pub fn is_winning(self) -> bool {
        self.live_lines().any(|(_, cells)| shared_attribute(cells))
    }

    /// 満杯か。
    #[inline]
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.occupied() == FULL_MASK
    }

    /// 塞がったマスを通らないラインを、マスの添字と中身の組で返す。
    pub fn live_lines(self) -> impl Iterator<Item = ([u8; 4], [Option<Piece>; 4])> {
        LINES
            .into_iter()
            .filter(move |line| line.iter().all(|&index| self.blocked & (1 << index) == 0))
            .map(move |line| {
                let cells = line.map(|index| self.cells.get(usize::from(index)).copied().flatten());
                (line, cells)
            })
    }

    /// 空盤面を返す。
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocked: 0,
            cells: [None; 16],
        }
    }

    /// 駒のあるマスと塞がったマスのビット集合を返す。
    #[inline]
    #[must_use]
    pub const fn occupied(self) -> u16 {
        let mut mask = self.blocked;
        let mut index = 0;
        while index < self.cells.len() {
            if self.cells[index].is_some() {
                mask |= 1_u16 << index;
            }
            index += 1;
        }
        mask
    }

    /// 指定マスの駒を返す。
    #[inline]
    #[must_use]
    pub fn piece_at(self, square: Square) -> Option<Piece> {
        self.cells.get(usize::from(square.index())).copied().flatten()
    }

    /// 駒を置いた盤面を返す。
    ///
    /// # Errors
    ///
    /// - `PlaceError::Occupied`: 指定マスが埋まっている場合
    /// - `PlaceError::AlreadyPlaced`: 同じ駒がすでに盤上にある場合
    pub fn place(self, square: Square, piece: Piece) -> Result<Self, PlaceError> {
        if self.occupied() & square.bit() != 0 {
            return Err(PlaceError::Occupied(square));
        }
        if self.used_pieces().contains(piece) {
            return Err(PlaceError::AlreadyPlaced(piece));
        }
        Ok(self.with_piece(square, piece))
    }

    /// 駒を置いた盤面を返す（検査なし、探索用）。
    #[inline]
    #[must_use]
    pub(crate) fn with_piece(self, square: Square, piece: Piece) -> Self {
        let mut next = self;
        if let Some(cell) = next.cells.get_mut(usize::from(square.index())) {
            *cell = Some(piece);
        }
        next
    }

    /// 盤上の駒の集合を返す。
    #[must_use]
    pub fn used_pieces(self) -> PieceSet {
        self.cells.iter().flatten().copied().collect()
    }

    /// `square` に `piece` を置くとラインが完成するか。
    ///
    /// `square` を通るラインだけを調べる。`square` が埋まっていれば `false`。
    #[must_use]
    pub fn completes_line(self, square: Square, piece: Piece) -> bool {
        if self.occupied() & square.bit() != 0 {
            return false;
        }
        let index = square.index();
        LINES
            .iter()
            .filter(|line| line.contains(&index))
            .any(|line| {
                let shared = line.iter().try_fold(piece.attributes(), |acc, &other| {
                    if other == index {
                        return Some(acc);
                    }
                    let occupant = self.cells.get(usize::from(other)).copied().flatten()?;
                    Some(acc.intersection(occupant.attributes()))
                });
                shared.is_some_and(|attrs| !attrs.is_empty())
            })
    }

    /// 置換表のキー。マスごとに5ビット（0 は空、n は駒 n-1）。塞がったマスは 96 ビット目から。
    #[must_use]
    pub(crate) fn key(self) -> u128 {
        let cells = self.cells.iter().rev().fold(0_u128, |acc, cell| {
            let code = cell.map_or(0_u128, |piece| u128::from(piece.index()) + 1);
            (acc << 5) | code
        });
        cells | (u128::from(self.blocked) << 96)
    }

    /// 行優先のマス列から盤面を作る。
    ///
    /// # Errors
    ///
    /// 同じ駒が2回現れた場合、`PlaceError::AlreadyPlaced` を返す。
    pub fn from_cells(cells: [Option<Piece>; 16]) -> Result<Self, PlaceError> {
        let mut board = Self::new();
        for (square, cell) in Square::all().zip(cells) {
            if let Some(piece) = cell {
                board = match board.place(square, piece) {
                    Ok(next) => next,
                    Err(err) => return Err(err),
                };
            }
        }
        Ok(board)
    }
}

/// ラインが勝利条件を満たすか。
///
/// 4マスすべてが埋まり、共通の属性を1つ以上持つときだけ `true`。
#[must_use]
pub fn shared_attribute(line: [Option<Piece>; 4]) -> bool {
    line.iter()
        .try_fold(Attributes::ALL, |acc, cell| {
            cell.map(|piece| acc.intersection(piece.attributes()))
        })
        .is_some_and(|attrs| !attrs.is_empty())
}

/// 埋まっているマスの駒だけについて共通属性を求める。
///
/// 駒が1つもなければ `Attributes::ALL` を返す。
#[must_use]
pub fn common_attributes(line: [Option<Piece>; 4]) -> Attributes {
    line.iter()
        .flatten()
        .fold(Attributes::ALL, |acc, piece| acc.intersection(piece.attributes()))
}
