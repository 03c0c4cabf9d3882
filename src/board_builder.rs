use crate::board::Board;
use crate::color::{Color, ALL_COLORS};
use crate::coord::{Coord, NUM_SQUARES};
use crate::error::Error;
use crate::piece::{Piece, PieceKind};

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

/// Represents a board that has *not* been checked yet.
///
/// This structure is useful in the following cases:
/// * You are setting up a position by hand, e.g. for a test or a puzzle.
/// * You want to place pieces that already count as moved, so pawns lose their double step
///   and kings or rooks lose castling.
///
/// Converting into a `Board` fails when a side has more than one king.
///
/// ```
/// use chess_rules::{Board, BoardBuilder, Color, Coord, PieceKind};
/// use std::convert::TryFrom;
/// use std::str::FromStr;
///
/// let e1 = Coord::from_str("e1").unwrap();
/// let mut position = BoardBuilder::new();
/// position.piece(e1, PieceKind::King, Color::White);
/// position.piece(Coord::from_str("e8").unwrap(), PieceKind::King, Color::Black);
///
/// assert_eq!(position[e1].map(|p| p.kind()), Some(PieceKind::King));
/// assert!(Board::try_from(&position).is_ok());
///
/// position.piece(Coord::from_str("a1").unwrap(), PieceKind::King, Color::White);
/// assert!(Board::try_from(position).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardBuilder {
    cells: [Option<Piece>; NUM_SQUARES],
}

impl BoardBuilder {
    /// Construct a new, empty, BoardBuilder.
    pub fn new() -> BoardBuilder {
        BoardBuilder {
            cells: [None; NUM_SQUARES],
        }
    }

    /// Set a fresh piece on a square.
    ///
    /// Note that this can and will overwrite another piece on the square if need.
    ///
    /// This function can be used on self directly or in a builder pattern.
    pub fn piece(&mut self, square: Coord, kind: PieceKind, color: Color) -> &mut Self {
        self[square] = Some(Piece::new(kind, color));
        self
    }

    /// Set a piece on a square along with whether it has already moved.
    pub fn piece_with_state(
        &mut self,
        square: Coord,
        kind: PieceKind,
        color: Color,
        moved: bool,
    ) -> &mut Self {
        self[square] = Some(Piece::with_state(kind, color, false, moved));
        self
    }

    /// Clear a square on the board.
    pub fn clear_square(&mut self, square: Coord) -> &mut Self {
        self[square] = None;
        self
    }
}

impl Default for BoardBuilder {
    fn default() -> BoardBuilder {
        BoardBuilder::from(&Board::standard())
    }
}

impl Index<Coord> for BoardBuilder {
    type Output = Option<Piece>;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[index.to_index()]
    }
}

impl IndexMut<Coord> for BoardBuilder {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        &mut self.cells[index.to_index()]
    }
}

impl TryFrom<&BoardBuilder> for Board {
    type Error = Error;

    fn try_from(builder: &BoardBuilder) -> Result<Self, Self::Error> {
        let mut board = Board::new();
        for (index, cell) in builder.cells.iter().enumerate() {
            if let (Some(piece), Some(square)) = (cell, Coord::from_index(index)) {
                board.put(square, *piece);
            }
        }

        for color in ALL_COLORS.iter() {
            if board.king_count(*color) > 1 {
                return Err(Error::InvalidBoard { color: *color });
            }
        }
        Ok(board)
    }
}

impl TryFrom<&mut BoardBuilder> for Board {
    type Error = Error;

    fn try_from(builder: &mut BoardBuilder) -> Result<Self, Self::Error> {
        Board::try_from(&*builder)
    }
}

impl TryFrom<BoardBuilder> for Board {
    type Error = Error;

    fn try_from(builder: BoardBuilder) -> Result<Self, Self::Error> {
        Board::try_from(&builder)
    }
}

impl From<&Board> for BoardBuilder {
    fn from(board: &Board) -> Self {
        let mut result = BoardBuilder::new();
        for (square, piece) in board.pieces() {
            result[square] = Some(piece);
        }
        result
    }
}

impl From<Board> for BoardBuilder {
    fn from(board: Board) -> Self {
        (&board).into()
    }
}

#[cfg(test)]
use std::convert::TryInto;
#[cfg(test)]
use std::str::FromStr;

#[test]
fn standard_passes_through() {
    let bb = BoardBuilder::default();
    let board: Board = bb.try_into().unwrap();
    assert_eq!(board, Board::standard());
}

#[test]
fn duplicate_kings_are_rejected() {
    let res: Result<Board, _> = BoardBuilder::new()
        .piece(Coord::from_str("a1").unwrap(), PieceKind::King, Color::Black)
        .piece(Coord::from_str("h8").unwrap(), PieceKind::King, Color::Black)
        .try_into();
    assert_eq!(res, Err(Error::InvalidBoard { color: Color::Black }));
}

#[test]
fn kingless_boards_are_fine() {
    let res: Result<Board, _> = BoardBuilder::new()
        .piece(Coord::from_str("d4").unwrap(), PieceKind::Rook, Color::White)
        .try_into();
    assert!(res.is_ok());
}

#[test]
fn clear_and_moved_state() {
    let a2 = Coord::from_str("a2").unwrap();
    let mut bb = BoardBuilder::default();
    bb.clear_square(Coord::from_str("a1").unwrap())
        .piece_with_state(a2, PieceKind::Pawn, Color::White, true);
    let board: Board = (&mut bb).try_into().unwrap();
    assert!(board.is_empty(Coord::from_str("a1").unwrap()));
    assert!(board.piece_on(a2).unwrap().has_moved());
    assert_eq!(board.count(Color::White), 15);
}
