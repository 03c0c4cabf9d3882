use crate::board::Board;
use crate::castle::CastleSide;
use crate::coord::Coord;
use crate::piece::{Piece, PieceKind};

/// The movement rule for one kind of piece.
///
/// Every rule is a pure predicate over the board: it reads occupancy and never changes it.
/// `src != dst` is already guaranteed by `Piece::is_legal` before a rule is consulted.
pub trait PieceType {
    fn is(kind: PieceKind) -> bool;
    fn is_legal(board: &Board, piece: &Piece, src: Coord, dst: Coord) -> bool;
}

pub struct PawnType;
pub struct BishopType;
pub struct KnightType;
pub struct RookType;
pub struct QueenType;
pub struct KingType;

impl PieceType for PawnType {
    fn is(kind: PieceKind) -> bool {
        kind == PieceKind::Pawn
    }

    fn is_legal(board: &Board, piece: &Piece, src: Coord, dst: Coord) -> bool {
        let dir = piece.color().pawn_direction();
        let (df, dr) = src.delta(dst);

        if df == 0 {
            if !board.is_empty(dst) {
                return false;
            }
            if dr == dir {
                return true;
            }
            // double step, only from the un-moved state and only over an empty square
            if dr == 2 * dir && !piece.has_moved() {
                return src
                    .offset(0, dir)
                    .map(|mid| board.is_empty(mid))
                    .unwrap_or(false);
            }
            return false;
        }

        // diagonal steps only ever capture
        if df.abs() == 1 && dr == dir {
            return match board.piece_on(dst) {
                Some(target) => target.color() != piece.color(),
                None => false,
            };
        }

        false
    }
}

impl PieceType for BishopType {
    fn is(kind: PieceKind) -> bool {
        kind == PieceKind::Bishop
    }

    fn is_legal(board: &Board, _piece: &Piece, src: Coord, dst: Coord) -> bool {
        let (df, dr) = src.delta(dst);
        df.abs() == dr.abs() && board.is_line_clear(src, dst)
    }
}

impl PieceType for KnightType {
    fn is(kind: PieceKind) -> bool {
        kind == PieceKind::Knight
    }

    fn is_legal(_board: &Board, _piece: &Piece, src: Coord, dst: Coord) -> bool {
        let (df, dr) = src.delta(dst);
        let (df, dr) = (df.abs(), dr.abs());
        (df == 2 && dr == 1) || (df == 1 && dr == 2)
    }
}

impl PieceType for RookType {
    fn is(kind: PieceKind) -> bool {
        kind == PieceKind::Rook
    }

    fn is_legal(board: &Board, _piece: &Piece, src: Coord, dst: Coord) -> bool {
        (src.rank() == dst.rank() || src.file() == dst.file()) && board.is_line_clear(src, dst)
    }
}

impl PieceType for QueenType {
    fn is(kind: PieceKind) -> bool {
        kind == PieceKind::Queen
    }

    fn is_legal(board: &Board, piece: &Piece, src: Coord, dst: Coord) -> bool {
        RookType::is_legal(board, piece, src, dst) || BishopType::is_legal(board, piece, src, dst)
    }
}

impl KingType {
    /// Is a two-file king move a castle the board allows?
    ///
    /// * the king has never moved
    /// * the edge-file cell in the direction of travel holds a never-moved rook
    /// * every cell strictly between the king and that rook is empty
    ///
    /// Whether the king stands on its home square is checked by `Game`, not here.
    pub fn can_castle(board: &Board, king: &Piece, src: Coord, dst: Coord) -> bool {
        let (df, dr) = src.delta(dst);
        if king.has_moved() || dr != 0 || df.abs() != 2 {
            return false;
        }

        let side = CastleSide::from_file_delta(df);
        let rook_sq = match src.with_file(side.rook_file()) {
            Some(sq) => sq,
            None => return false,
        };

        match board.piece_on(rook_sq) {
            Some(rook) if RookType::is(rook.kind()) && !rook.has_moved() => {
                board.is_line_clear(src, rook_sq)
            }
            _ => false,
        }
    }
}

impl PieceType for KingType {
    fn is(kind: PieceKind) -> bool {
        kind == PieceKind::King
    }

    fn is_legal(board: &Board, piece: &Piece, src: Coord, dst: Coord) -> bool {
        let (df, dr) = src.delta(dst);
        if df.abs() <= 1 && dr.abs() <= 1 {
            return true;
        }
        KingType::can_castle(board, piece, src, dst)
    }
}
