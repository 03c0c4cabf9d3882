use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Represent a square on the chess board as a (file, rank) pair.
///
/// Both axes run 0..7.  File 0 is the a-file, rank 0 is White's back rank.  A `Coord` can only
/// be built through checked constructors, so every `Coord` in circulation is on the board.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    file: u8,
    rank: u8,
}

/// How many squares are there?
pub const NUM_SQUARES: usize = 64;

/// How many files (and ranks) are there?
pub const BOARD_WIDTH: u8 = 8;

impl Coord {
    /// Make a coordinate given a file and a rank.  Fails when either is outside 0..7.
    ///
    /// ```
    /// use chess_rules::Coord;
    ///
    /// assert!(Coord::new(4, 1).is_ok());
    /// assert!(Coord::new(8, 0).is_err());
    /// assert!(Coord::new(0, -1).is_err());
    /// ```
    pub fn new(file: i32, rank: i32) -> Result<Coord, Error> {
        if file < 0 || rank < 0 || file >= BOARD_WIDTH as i32 || rank >= BOARD_WIDTH as i32 {
            return Err(Error::InvalidCoord { file, rank });
        }
        Ok(Coord {
            file: file as u8,
            rank: rank as u8,
        })
    }

    /// Make a square given a rank and a file.  Values wrap around at 8, so callers must only
    /// pass in indices they already know are on the board.
    #[inline]
    pub(crate) fn make_square(rank: u8, file: u8) -> Coord {
        Coord {
            file: file & 7,
            rank: rank & 7,
        }
    }

    /// Make a coordinate from its row-major index (`rank * 8 + file`).
    pub fn from_index(index: usize) -> Option<Coord> {
        if index < NUM_SQUARES {
            Some(Coord {
                file: (index % 8) as u8,
                rank: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    /// Make a coordinate from board notation characters, e.g. `('e', '2')`.  The file letter
    /// may be upper or lower case.
    pub fn from_chars(file: char, rank: char) -> Result<Coord, Error> {
        let f = match file {
            'a'..='h' => file as i32 - 'a' as i32,
            'A'..='H' => file as i32 - 'A' as i32,
            _ => {
                return Err(Error::InvalidSquareName {
                    name: format!("{}{}", file, rank),
                })
            }
        };
        let r = match rank {
            '1'..='8' => rank as i32 - '1' as i32,
            _ => {
                return Err(Error::InvalidSquareName {
                    name: format!("{}{}", file, rank),
                })
            }
        };
        Coord::new(f, r)
    }

    /// Return the file (column) of this square.
    #[inline]
    pub fn file(&self) -> u8 {
        self.file
    }

    /// Return the rank (row) of this square.
    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Convert this `Coord` to a row-major `usize` for table lookups.
    #[inline]
    pub fn to_index(&self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// Step by a (file, rank) delta.  None if that leaves the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Coord> {
        Coord::new(self.file as i32 + df as i32, self.rank as i32 + dr as i32).ok()
    }

    /// The same square with a different file.
    pub fn with_file(&self, file: u8) -> Option<Coord> {
        Coord::new(file as i32, self.rank as i32).ok()
    }

    /// Signed (file, rank) distance from `self` to `other`.
    #[inline]
    pub fn delta(&self, other: Coord) -> (i8, i8) {
        (
            other.file as i8 - self.file as i8,
            other.rank as i8 - self.rank as i8,
        )
    }
}

/// Every square on the board, in row-major order.
pub fn all_coords() -> impl Iterator<Item = Coord> {
    (0..NUM_SQUARES).filter_map(Coord::from_index)
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file) as char,
            (b'1' + self.rank) as char
        )
    }
}

impl FromStr for Coord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ch: Vec<char> = s.chars().collect();
        if ch.len() != 2 {
            return Err(Error::InvalidSquareName {
                name: s.to_string(),
            });
        }
        Coord::from_chars(ch[0], ch[1])
    }
}
