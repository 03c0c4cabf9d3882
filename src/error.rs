use crate::color::Color;
use failure::Fail;

/// Sometimes, bad stuff happens.
#[derive(Clone, Debug, Fail, PartialEq, Eq)]
pub enum Error {
    /// A coordinate was built with a file or rank outside 0..7
    #[fail(
        display = "Coordinate not valid: file {} rank {}.  Both must be in range 0-7.",
        file, rank
    )]
    InvalidCoord { file: i32, rank: i32 },

    /// A square name like "e2" could not be parsed
    #[fail(display = "Invalid square name: {}", name)]
    InvalidSquareName { name: String },

    /// A move string like "e2e4" could not be parsed
    #[fail(display = "Invalid move string: {}", mv)]
    InvalidMoveString { mv: String },

    /// The board created from `BoardBuilder` was found to be invalid
    #[fail(
        display = "The board specified did not pass sanity checks.  There is more than one {:?} king.",
        color
    )]
    InvalidBoard { color: Color },

    /// There are only two players
    #[fail(display = "Invalid player id: {}", id)]
    InvalidPlayerId { id: u32 },
}

/// Why a saved game was rejected.
///
/// None of these happen while saving and loading a game through this crate; they mean the
/// bytes were corrupted or did not come from `Game::save` at all.
#[derive(Clone, Debug, Fail, PartialEq, Eq)]
pub enum LoadError {
    /// Fewer than the four bytes a checksum needs.
    #[fail(display = "Save data is too short to hold a checksum")]
    TooShort,

    /// The stored checksum does not match the bytes it covers.
    #[fail(
        display = "Checksum mismatch: stored {:#010x}, computed {:#010x}",
        expected, found
    )]
    ChecksumMismatch { expected: u32, found: u32 },

    /// A piece record names a kind that does not exist.
    #[fail(display = "Unknown piece tag: {}", _0)]
    UnknownPieceTag(u8),

    /// A record claims more bytes than are left.
    #[fail(display = "Save data ends in the middle of a record")]
    Truncated,

    /// A piece record carries a color byte other than 0 (White) or 1 (Black).
    #[fail(display = "Unknown color tag: {}", _0)]
    InvalidColorTag(u8),

    /// A boolean byte that is neither 0 nor 1.
    #[fail(display = "Invalid flag byte: {}", _0)]
    InvalidFlag(u8),

    /// Player records must appear as player 0 then player 1.
    #[fail(display = "Player record {} carries id {}", expected, found)]
    InvalidPlayerId { expected: u32, found: u32 },

    /// The side to move is not a player id, 0 or 1.
    #[fail(display = "Invalid side to move: {}", _0)]
    InvalidSideToMove(u32),

    /// Bytes are left over once a frame, or the whole payload, has been decoded.
    #[fail(display = "{} unexpected bytes after the end of the record", _0)]
    TrailingBytes(usize),

    /// The board holds more than one king for a side.
    #[fail(display = "More than one {:?} king on the board", _0)]
    DuplicateKing(Color),
}
