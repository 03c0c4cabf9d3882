use crate::board::Board;
use crate::color::Color;
use crate::coord::Coord;
use crate::error::LoadError;
use crate::movement::{BishopType, KingType, KnightType, PawnType, PieceType, QueenType, RookType};
use std::fmt;

/// Represent a kind of chess piece as a very simple enum.  The discriminant is the tag written
/// into saved games.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    King = 0,
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
    Pawn = 5,
}

/// How many piece kinds are there?
pub const NUM_PIECES: usize = 6;

/// An array representing each piece kind, in tag order.
pub const ALL_PIECES: [PieceKind; NUM_PIECES] = [
    PieceKind::King,
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Pawn,
];

impl PieceKind {
    /// Convert the `PieceKind` to a `usize` for table lookups.
    #[inline]
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    /// The byte a kind is saved as, from 0 for a king up to 5 for a pawn.
    #[inline]
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// The inverse of `tag`.
    pub fn from_tag(tag: u8) -> Result<PieceKind, LoadError> {
        match tag {
            0 => Ok(PieceKind::King),
            1 => Ok(PieceKind::Queen),
            2 => Ok(PieceKind::Rook),
            3 => Ok(PieceKind::Bishop),
            4 => Ok(PieceKind::Knight),
            5 => Ok(PieceKind::Pawn),
            _ => Err(LoadError::UnknownPieceTag(tag)),
        }
    }

    /// Does this kind remember whether it has moved?  Only kings, rooks and pawns do.
    #[inline]
    pub fn tracks_moved(&self) -> bool {
        match *self {
            PieceKind::King | PieceKind::Rook | PieceKind::Pawn => true,
            _ => false,
        }
    }

    /// Convert a piece with a color to a letter.  White is upper case.
    pub fn to_string(&self, color: Color) -> String {
        let piece = format!("{}", self);
        if color == Color::White {
            piece.to_uppercase()
        } else {
            piece
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                PieceKind::Pawn => "p",
                PieceKind::Knight => "n",
                PieceKind::Bishop => "b",
                PieceKind::Rook => "r",
                PieceKind::Queen => "q",
                PieceKind::King => "k",
            }
        )
    }
}

/// A piece in play (on a cell) or out of play (in a player's captured list).
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    captured: bool,
    moved: bool,
}

impl Piece {
    /// A fresh, never-moved, uncaptured piece.
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece {
            kind,
            color,
            captured: false,
            moved: false,
        }
    }

    /// Rebuild a piece with all of its state, e.g. while loading a saved game.
    ///
    /// `moved` is dropped for kinds that do not track it.
    pub fn with_state(kind: PieceKind, color: Color, captured: bool, moved: bool) -> Piece {
        Piece {
            kind,
            color,
            captured,
            moved: moved && kind.tracks_moved(),
        }
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Has this piece ever been relocated?  Always false for kinds that do not track it.
    #[inline]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Record that the piece was relocated.  Calling this more than once changes nothing.
    pub fn notify_moved(&mut self) {
        if self.kind.tracks_moved() {
            self.moved = true;
        }
    }

    /// Can this piece go from `src` to `dst` on `board`?
    ///
    /// This is the pure movement rule for the piece's kind, evaluated against the current
    /// occupancy.  It does not know whose turn it is and does not look at what sits on `dst`
    /// beyond what the kind's own rule needs (pawn captures).
    pub fn is_legal(&self, board: &Board, src: Coord, dst: Coord) -> bool {
        if src == dst {
            return false;
        }
        match self.kind {
            PieceKind::King => KingType::is_legal(board, self, src, dst),
            PieceKind::Queen => QueenType::is_legal(board, self, src, dst),
            PieceKind::Rook => RookType::is_legal(board, self, src, dst),
            PieceKind::Bishop => BishopType::is_legal(board, self, src, dst),
            PieceKind::Knight => KnightType::is_legal(board, self, src, dst),
            PieceKind::Pawn => PawnType::is_legal(board, self, src, dst),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind.to_string(self.color))
    }
}
