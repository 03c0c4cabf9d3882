use crate::color::Color;
use crate::coord::{all_coords, Coord, NUM_SQUARES};
use crate::piece::{Piece, PieceKind};
use arrayvec::ArrayVec;
use std::fmt;
use std::ops::Index;

/// The most squares that can lie strictly between two squares on one line.
pub const MAX_BETWEEN: usize = 6;

/// A representation of a chess board.  That's why you're here, right?
///
/// 64 cells in row-major order (rank 0 first), each holding at most one piece.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; NUM_SQUARES],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Construct a new `Board` that is completely empty.
    /// Note: This does NOT give you the initial position.  Just a blank slate.
    pub fn new() -> Board {
        Board {
            cells: [None; NUM_SQUARES],
        }
    }

    /// The canonical starting layout: 16 pieces per side on ranks 0-1 and 6-7.
    pub fn standard() -> Board {
        let mut board = Board::new();
        for color in [Color::White, Color::Black].iter() {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                board.put(
                    Coord::make_square(color.to_my_backrank(), file as u8),
                    Piece::new(*kind, *color),
                );
                board.put(
                    Coord::make_square(color.to_second_rank(), file as u8),
                    Piece::new(PieceKind::Pawn, *color),
                );
            }
        }
        board
    }

    /// What piece is on a particular `Coord`?  Is there even one?
    #[inline]
    pub fn piece_on(&self, square: Coord) -> Option<Piece> {
        self.cells[square.to_index()]
    }

    #[inline]
    pub fn is_empty(&self, square: Coord) -> bool {
        self.cells[square.to_index()].is_none()
    }

    /// What color piece is on a particular square?
    #[inline]
    pub fn color_on(&self, square: Coord) -> Option<Color> {
        self.piece_on(square).map(|p| p.color())
    }

    /// Every occupied cell, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        all_coords().filter_map(move |c| self.piece_on(c).map(|p| (c, p)))
    }

    /// How many pieces of this color are on the board?
    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|(_, p)| p.color() == color).count()
    }

    /// Where is this color's king?  Scans the whole board; the last king found wins.
    pub fn king_square(&self, color: Color) -> Option<Coord> {
        self.pieces()
            .filter(|(_, p)| p.kind() == PieceKind::King && p.color() == color)
            .map(|(c, _)| c)
            .last()
    }

    /// How many kings of this color are on the board?
    pub fn king_count(&self, color: Color) -> usize {
        self.pieces()
            .filter(|(_, p)| p.kind() == PieceKind::King && p.color() == color)
            .count()
    }

    /// The squares strictly between `src` and `dst` when they share a rank, a file or a
    /// diagonal.  Empty when they share none of these, or are adjacent.
    pub fn between(src: Coord, dst: Coord) -> ArrayVec<Coord, MAX_BETWEEN> {
        let mut result = ArrayVec::new();
        let (df, dr) = src.delta(dst);
        if !(df == 0 || dr == 0 || df.abs() == dr.abs()) {
            return result;
        }

        let (step_f, step_r) = (df.signum(), dr.signum());
        let mut cur = src.offset(step_f, step_r);
        while let Some(sq) = cur {
            if sq == dst {
                break;
            }
            result.push(sq);
            cur = sq.offset(step_f, step_r);
        }
        result
    }

    /// Are all squares strictly between `src` and `dst` empty?
    pub fn is_line_clear(&self, src: Coord, dst: Coord) -> bool {
        Board::between(src, dst).iter().all(|sq| self.is_empty(*sq))
    }

    /// Is the straight (rank or file) path from `src` to `dst` clear?
    ///
    /// Moves that are not along a rank or file have nothing to check here and are reported as
    /// clear; diagonal clearance belongs to the bishop rule.
    pub fn is_path_clear(&self, src: Coord, dst: Coord) -> bool {
        if src.rank() != dst.rank() && src.file() != dst.file() {
            return true;
        }
        self.is_line_clear(src, dst)
    }

    /// Put a piece on a square, returning whatever was there.
    pub(crate) fn put(&mut self, square: Coord, piece: Piece) -> Option<Piece> {
        self.cells[square.to_index()].replace(piece)
    }

    /// Empty a square, returning whatever was there.
    pub(crate) fn take(&mut self, square: Coord) -> Option<Piece> {
        self.cells[square.to_index()].take()
    }

    /// Move whatever is on `src` to `dst`, returning what `dst` held.
    pub(crate) fn relocate(&mut self, src: Coord, dst: Coord) -> Option<Piece> {
        match self.take(src) {
            Some(piece) => self.put(dst, piece),
            None => self.take(dst),
        }
    }

    pub(crate) fn piece_on_mut(&mut self, square: Coord) -> Option<&mut Piece> {
        self.cells[square.to_index()].as_mut()
    }
}

impl Default for Board {
    /// A board set up for a new game.
    #[inline]
    fn default() -> Board {
        Board::standard()
    }
}

impl Index<Coord> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[index.to_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                match self.piece_on(Coord::make_square(rank, file)) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\n{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sq(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    #[test]
    fn empty_board() {
        let board = Board::new();
        assert_eq!(board.pieces().count(), 0);
        assert_eq!(board.king_square(Color::White), None);
    }

    #[test]
    fn standard_layout() {
        let board = Board::standard();
        assert_eq!(board.count(Color::White), 16);
        assert_eq!(board.count(Color::Black), 16);
        for c in all_coords() {
            if (2..=5).contains(&c.rank()) {
                assert!(board.is_empty(c), "{} should be empty", c);
            }
        }
        assert_eq!(
            board.piece_on(sq("d1")),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(
            board.piece_on(sq("e8")),
            Some(Piece::new(PieceKind::King, Color::Black))
        );
        assert_eq!(board.king_square(Color::White), Some(sq("e1")));
        assert_eq!(board.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(board, Board::default());
    }

    #[test]
    fn between_lines() {
        assert_eq!(
            Board::between(sq("a1"), sq("a4")).as_slice(),
            &[sq("a2"), sq("a3")]
        );
        assert_eq!(
            Board::between(sq("h1"), sq("e1")).as_slice(),
            &[sq("g1"), sq("f1")]
        );
        assert_eq!(
            Board::between(sq("a1"), sq("h8")).len(),
            MAX_BETWEEN
        );
        assert!(Board::between(sq("g1"), sq("f3")).is_empty());
        assert!(Board::between(sq("e2"), sq("e3")).is_empty());
    }

    #[test]
    fn path_clear_only_checks_straight_lines() {
        let board = Board::standard();
        assert!(!board.is_path_clear(sq("a1"), sq("a3")));
        assert!(board.is_path_clear(sq("a2"), sq("a4")));
        // diagonal through e2 is not a straight path
        assert!(board.is_path_clear(sq("f1"), sq("c4")));
        assert!(!board.is_line_clear(sq("f1"), sq("c4")));
    }

    #[test]
    fn relocate_returns_captured() {
        let mut board = Board::standard();
        let taken = board.relocate(sq("a1"), sq("a7"));
        assert_eq!(taken, Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert!(board.is_empty(sq("a1")));
        assert_eq!(board.color_on(sq("a7")), Some(Color::White));
    }
}
