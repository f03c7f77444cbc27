//! 初手で渡す駒を選ぶための「危険な並び」の検出。

use crate::engine::board::{Board, common_attributes};
use crate::engine::pieces::PieceSet;
use crate::engine::types::Attributes;

/// 空きがちょうど2マスで、埋まった2駒が属性を共有しているライン。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DangerousPattern {
    /// 埋まった2駒の共通属性（空ではない）。
    shared: Attributes,
}

impl DangerousPattern {
    /// 共通属性をすべて持つ駒がこの並びに合うか。
    #[inline]
    #[must_use]
    pub const fn matches(self, attributes: Attributes) -> bool {
        attributes.contains(self.shared)
    }

    /// 共通属性を返す。
    #[inline]
    #[must_use]
    pub const fn shared(self) -> Attributes {
        self.shared
    }
}

/// 盤面上の危険な並びをライン順に列挙する。
#[must_use]
pub fn dangerous_patterns(board: Board) -> Vec<DangerousPattern> {
    board
        .live_lines()
        .filter(|(_, cells)| cells.iter().filter(|cell| cell.is_none()).count() == 2)
        .filter_map(|(_, cells)| {
            let shared = common_attributes(cells);
            (!shared.is_empty()).then_some(DangerousPattern { shared })
        })
        .collect()
}

/// いずれかの並びの共通属性をすべて持つ駒の集合。
#[must_use]
pub fn dangerous_pieces(available: PieceSet, patterns: &[DangerousPattern]) -> PieceSet {
    available
        .iter()
        .filter(|piece| {
            patterns
                .iter()
                .any(|pattern| pattern.matches(piece.attributes()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{dangerous_patterns, dangerous_pieces};
    use crate::engine::board::Board;
    use crate::engine::pieces;
    use crate::engine::types::{Piece, Square};

    fn piece(code: &str) -> Piece {
        code.parse().unwrap_or_else(|err| panic!("{err}"))
    }

    fn square(index: u8) -> Square {
        Square::from_index(index).unwrap_or_else(|| panic!("bad square {index}"))
    }

    fn board_with(cells: &[(u8, &str)]) -> Board {
        cells.iter().fold(Board::new(), |board, &(index, code)| {
            board
                .place(square(index), piece(code))
                .unwrap_or_else(|err| panic!("{err}"))
        })
    }

    #[test]
    fn empty_board_has_no_patterns() {
        assert!(dangerous_patterns(Board::new()).is_empty());
    }

    #[test]
    fn two_sharing_pieces_with_two_gaps_form_a_pattern() {
        // 列1: マス1 と 13 が D と P を共有、5 と 9 が空き。
        let board = board_with(&[(1, "BDEP"), (13, "SDFP")]);
        let patterns = dangerous_patterns(board);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].shared().symbols(), vec!['D', 'P']);

        let available = pieces::available(board, None);
        let dangerous = dangerous_pieces(available, &patterns);
        // D かつ P を持つ残りの駒は BDFP と SDEP。
        assert_eq!(dangerous.len(), 2);
        assert!(dangerous.contains(piece("BDFP")));
        assert!(dangerous.contains(piece("SDEP")));
        assert!(!dangerous.contains(piece("BDEC")));
    }

    #[test]
    fn lines_with_one_or_three_gaps_are_not_patterns() {
        // 列1 は空き1、行0 は空き3。
        let board = board_with(&[(1, "BDEP"), (5, "SDFP"), (13, "BLFP")]);
        assert!(dangerous_patterns(board).is_empty());
    }

    #[test]
    fn blocked_square_takes_its_line_out_of_the_patterns() {
        let board = board_with(&[(1, "BDEP"), (13, "SDFP")])
            .block(square(5))
            .unwrap_or_else(|err| panic!("{err}"));
        assert!(dangerous_patterns(board).is_empty());
    }

    #[test]
    fn pieces_without_common_attribute_are_ignored() {
        let board = board_with(&[(0, "BDEC"), (1, "SLFP")]);
        assert!(dangerous_patterns(board).is_empty());
    }
}
