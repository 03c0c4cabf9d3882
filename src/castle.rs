use crate::color::Color;
use crate::coord::Coord;

/// Which way is a king castling?
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Debug, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// The file every king starts on.
pub const KING_HOME_FILE: u8 = 4;

impl CastleSide {
    /// Pick the side from the sign of a king's file delta.  A two-file move toward the h-file
    /// is kingside.
    #[inline]
    pub fn from_file_delta(df: i8) -> CastleSide {
        if df > 0 {
            CastleSide::KingSide
        } else {
            CastleSide::QueenSide
        }
    }

    /// The edge file the castling rook starts on.
    #[inline]
    pub fn rook_file(&self) -> u8 {
        match *self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }

    /// Where the rook ends up.
    #[inline]
    pub fn rook_dest_file(&self) -> u8 {
        match *self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        }
    }

    /// Where the king ends up.
    #[inline]
    pub fn king_dest_file(&self) -> u8 {
        match *self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        }
    }

    /// The square the king must start on to castle (e1 or e8).
    pub fn king_home(color: Color) -> Coord {
        home_square(KING_HOME_FILE, color)
    }

    pub fn king_dest(&self, color: Color) -> Coord {
        home_square(self.king_dest_file(), color)
    }

    pub fn rook_source(&self, color: Color) -> Coord {
        home_square(self.rook_file(), color)
    }

    pub fn rook_dest(&self, color: Color) -> Coord {
        home_square(self.rook_dest_file(), color)
    }

    /// Does a king move from `src` to `dst` match the fixed castling squares for `color`?
    pub fn is_home_castle(&self, color: Color, src: Coord, dst: Coord) -> bool {
        src == CastleSide::king_home(color) && dst == self.king_dest(color)
    }
}

fn home_square(file: u8, color: Color) -> Coord {
    Coord::make_square(color.to_my_backrank(), file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn white_squares() {
        let ks = CastleSide::KingSide;
        assert_eq!(CastleSide::king_home(Color::White), Coord::from_str("e1").unwrap());
        assert_eq!(ks.king_dest(Color::White), Coord::from_str("g1").unwrap());
        assert_eq!(ks.rook_source(Color::White), Coord::from_str("h1").unwrap());
        assert_eq!(ks.rook_dest(Color::White), Coord::from_str("f1").unwrap());
    }

    #[test]
    fn black_queenside_squares() {
        let qs = CastleSide::QueenSide;
        assert_eq!(CastleSide::king_home(Color::Black), Coord::from_str("e8").unwrap());
        assert_eq!(qs.king_dest(Color::Black), Coord::from_str("c8").unwrap());
        assert_eq!(qs.rook_source(Color::Black), Coord::from_str("a8").unwrap());
        assert_eq!(qs.rook_dest(Color::Black), Coord::from_str("d8").unwrap());
    }

    #[test]
    fn side_from_delta() {
        assert_eq!(CastleSide::from_file_delta(2), CastleSide::KingSide);
        assert_eq!(CastleSide::from_file_delta(-2), CastleSide::QueenSide);
    }
}
