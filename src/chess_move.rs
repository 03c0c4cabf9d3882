use crate::coord::Coord;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Represent a ChessMove in memory: just the source and destination squares.
#[derive(Clone, Copy, Eq, PartialOrd, Ord, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ChessMove {
    source: Coord,
    dest: Coord,
}

impl ChessMove {
    /// Create a new chess move, given a source `Coord` and a destination `Coord`.
    #[inline]
    pub fn new(source: Coord, dest: Coord) -> ChessMove {
        ChessMove { source, dest }
    }

    /// Get the source square (square the piece is currently on).
    #[inline]
    pub fn get_source(&self) -> Coord {
        self.source
    }

    /// Get the destination square (square the piece is going to).
    #[inline]
    pub fn get_dest(&self) -> Coord {
        self.dest
    }

    /// Convert a four character coordinate string like `"e2e4"` to a move.
    ///
    /// ```
    /// use chess_rules::{ChessMove, Coord};
    ///
    /// let mv = ChessMove::new(Coord::new(4, 1).unwrap(), Coord::new(4, 3).unwrap());
    ///
    /// assert_eq!(ChessMove::from_string("e2e4").expect("Valid Move"), mv);
    /// assert!(ChessMove::from_string("e2e9").is_err());
    /// ```
    pub fn from_string(s: &str) -> Result<ChessMove, Error> {
        let invalid = || Error::InvalidMoveString { mv: s.to_string() };
        let ch: Vec<char> = s.trim().chars().collect();
        if ch.len() != 4 {
            return Err(invalid());
        }
        let source = Coord::from_chars(ch[0], ch[1]).map_err(|_| invalid())?;
        let dest = Coord::from_chars(ch[2], ch[3]).map_err(|_| invalid())?;
        Ok(ChessMove::new(source, dest))
    }
}

impl FromStr for ChessMove {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChessMove::from_string(s)
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source, self.dest)
    }
}

/// What happened to a requested move?
///
/// Only `Ok` changes the game.  Every other value is reported before anything is touched.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveOutcome {
    Ok,
    /// There is no piece on the source square.
    SourceEmpty,
    /// The piece on the source square belongs to the side that is not moving.
    WrongOwner,
    /// The piece cannot move that way.
    IllegalForPiece,
    /// The destination holds a piece of the moving side.
    OwnPieceBlocking,
    /// A two-file king move away from the home castling squares.
    IllegalCastle,
    /// A rank or file move with something in the way.
    PathBlocked,
}

impl MoveOutcome {
    #[inline]
    pub fn is_ok(&self) -> bool {
        *self == MoveOutcome::Ok
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                MoveOutcome::Ok => "Ok",
                MoveOutcome::SourceEmpty => "No piece at source",
                MoveOutcome::WrongOwner => "Not your piece",
                MoveOutcome::IllegalForPiece => "Invalid move for this piece",
                MoveOutcome::OwnPieceBlocking => "Can't capture your own piece",
                MoveOutcome::IllegalCastle => "Invalid castling movement",
                MoveOutcome::PathBlocked => "Path is not clear",
            }
        )
    }
}
