//! The binary save format.
//!
//! Every integer is little-endian, checksums included.  A save is an envelope
//! `[crc32: u32][payload]`, where the checksum covers the payload.  Inside the payload, nested
//! records are sub-frames `[len: u32][crc32: u32][body]`, with `len` counting the checksum and
//! the body.
//!
//! The payload is:
//!
//! * 64 cells in row-major order (rank 0 first), each `[present: u8]` followed by a piece
//!   sub-frame when present
//! * a player sub-frame for player 0, then one for player 1
//! * the side to move as a `u32`
//!
//! A piece body is `[kind: u8][color: u8][captured: u8]`, plus `[moved: u8]` for the kinds that
//! remember moving.  A player body is `id: u32`, `turns: u32`, `max_turns: u32`,
//! `elapsed_secs: u64`, `has_limit: u8`, `[limit_secs: u64]`, `captured_count: u32`, then that
//! many piece sub-frames.

use crate::board::Board;
use crate::clock::Clock;
use crate::color::{Color, ALL_COLORS};
use crate::coord::all_coords;
use crate::error::LoadError;
use crate::piece::{Piece, PieceKind};
use crate::player::Player;
use std::convert::TryFrom;
use std::time::Duration;

const CHECKSUM_LEN: usize = 4;

/// CRC-32 (IEEE) of `bytes`.
#[inline]
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// Prefix `payload` with its checksum.
pub fn seal(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHECKSUM_LEN + payload.len());
    out.extend_from_slice(&checksum(payload).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Check the leading checksum and return the payload it covers.
pub fn open(data: &[u8]) -> Result<&[u8], LoadError> {
    if data.len() < CHECKSUM_LEN {
        return Err(LoadError::TooShort);
    }
    let (head, payload) = data.split_at(CHECKSUM_LEN);
    let expected = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
    let found = checksum(payload);
    if expected != found {
        return Err(LoadError::ChecksumMismatch { expected, found });
    }
    Ok(payload)
}

/// Appends little-endian values to a growing buffer.
#[derive(Debug, Default, Clone)]
pub struct SaveWriter {
    buf: Vec<u8>,
}

impl SaveWriter {
    pub fn new() -> SaveWriter {
        SaveWriter::default()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write `body` as a length-prefixed, checksummed sub-frame.
    pub fn write_frame(&mut self, body: &[u8]) {
        self.write_u32((CHECKSUM_LEN + body.len()) as u32);
        self.write_u32(checksum(body));
        self.buf.extend_from_slice(body);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads little-endian values from a byte slice, front to back.
#[derive(Debug, Clone)]
pub struct SaveReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SaveReader<'a> {
    pub fn new(data: &'a [u8]) -> SaveReader<'a> {
        SaveReader { data, pos: 0 }
    }

    /// Bytes not yet read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], LoadError> {
        if n > self.remaining() {
            return Err(LoadError::Truncated);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, LoadError> {
        Ok(self.take(1)?[0])
    }

    /// A byte that must be 0 or 1.
    pub fn read_bool(&mut self) -> Result<bool, LoadError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(LoadError::InvalidFlag(other)),
        }
    }

    pub fn read_u32(&mut self) -> Result<u32, LoadError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, LoadError> {
        let b = self.take(8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(b);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Read a sub-frame and return its body once the checksum matches.
    pub fn read_frame(&mut self) -> Result<&'a [u8], LoadError> {
        let len = self.read_u32()? as usize;
        if len < CHECKSUM_LEN {
            return Err(LoadError::TooShort);
        }
        let frame = self.take(len)?;
        open(frame)
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(&self) -> Result<(), LoadError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(LoadError::TrailingBytes(n)),
        }
    }
}

fn read_color(reader: &mut SaveReader) -> Result<Color, LoadError> {
    let tag = reader.read_u8()?;
    Color::from_index(tag as usize).ok_or(LoadError::InvalidColorTag(tag))
}

/// The body of a piece sub-frame.
pub fn encode_piece(piece: &Piece) -> Vec<u8> {
    let mut w = SaveWriter::new();
    w.write_u8(piece.kind().tag());
    w.write_u8(piece.color().to_tag());
    w.write_bool(piece.is_captured());
    if piece.kind().tracks_moved() {
        w.write_bool(piece.has_moved());
    }
    w.into_inner()
}

pub fn decode_piece(body: &[u8]) -> Result<Piece, LoadError> {
    let mut r = SaveReader::new(body);
    let kind = PieceKind::from_tag(r.read_u8()?)?;
    let color = read_color(&mut r)?;
    let captured = r.read_bool()?;
    let moved = if kind.tracks_moved() {
        r.read_bool()?
    } else {
        false
    };
    r.finish()?;
    Ok(Piece::with_state(kind, color, captured, moved))
}

/// The body of a player sub-frame.
pub fn encode_player(player: &Player) -> Vec<u8> {
    let mut w = SaveWriter::new();
    w.write_u32(player.id().to_index() as u32);
    w.write_u32(player.turns());
    w.write_u32(player.max_turns());
    w.write_u64(player.clock().elapsed_secs());
    match player.clock().limit_secs() {
        Some(limit) => {
            w.write_bool(true);
            w.write_u64(limit);
        }
        None => w.write_bool(false),
    }
    w.write_u32(player.captured().len() as u32);
    for piece in player.captured() {
        w.write_frame(&encode_piece(piece));
    }
    w.into_inner()
}

/// Rebuild a player, which must carry the id `expected`.  Its clock is stopped.
pub fn decode_player(
    body: &[u8],
    expected: Color,
    tick_interval: Duration,
) -> Result<Player, LoadError> {
    let mut r = SaveReader::new(body);
    let id = r.read_u32()?;
    if id as usize != expected.to_index() {
        return Err(LoadError::InvalidPlayerId {
            expected: expected.to_index() as u32,
            found: id,
        });
    }
    let turns = r.read_u32()?;
    let max_turns = r.read_u32()?;
    let elapsed_secs = r.read_u64()?;
    let limit_secs = if r.read_bool()? {
        Some(r.read_u64()?)
    } else {
        None
    };

    let count = r.read_u32()?;
    let mut captured = Vec::new();
    for _ in 0..count {
        captured.push(decode_piece(r.read_frame()?)?);
    }
    r.finish()?;

    Ok(Player::restore(
        expected,
        turns,
        max_turns,
        captured,
        Clock::restore(elapsed_secs, limit_secs, tick_interval),
    ))
}

/// A full save: board, both players and the side to move, sealed with a checksum.
pub fn encode_game(board: &Board, players: &[Player; 2], side_to_move: Color) -> Vec<u8> {
    let mut w = SaveWriter::new();
    for square in all_coords() {
        match board.piece_on(square) {
            Some(piece) => {
                w.write_bool(true);
                w.write_frame(&encode_piece(&piece));
            }
            None => w.write_bool(false),
        }
    }
    for player in players.iter() {
        w.write_frame(&encode_player(player));
    }
    w.write_u32(side_to_move.to_index() as u32);
    seal(w.as_bytes())
}

/// Everything a save holds, decoded and checked but not yet installed anywhere.
#[derive(Debug)]
pub struct SavedGame {
    pub board: Board,
    pub players: [Player; 2],
    pub side_to_move: Color,
}

pub fn decode_game(data: &[u8], tick_interval: Duration) -> Result<SavedGame, LoadError> {
    let mut r = SaveReader::new(open(data)?);

    let mut board = Board::new();
    for square in all_coords() {
        if r.read_bool()? {
            board.put(square, decode_piece(r.read_frame()?)?);
        }
    }
    for color in ALL_COLORS.iter() {
        if board.king_count(*color) > 1 {
            return Err(LoadError::DuplicateKing(*color));
        }
    }

    let white = decode_player(r.read_frame()?, Color::White, tick_interval)?;
    let black = decode_player(r.read_frame()?, Color::Black, tick_interval)?;

    let side = r.read_u32()?;
    let side_to_move = Color::try_from(side).map_err(|_| LoadError::InvalidSideToMove(side))?;
    r.finish()?;

    Ok(SavedGame {
        board,
        players: [white, black],
        side_to_move,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn envelope() {
        let sealed = seal(b"payload");
        assert_eq!(sealed.len(), 4 + 7);
        assert_eq!(&sealed[..4], &checksum(b"payload").to_le_bytes());
        assert_eq!(open(&sealed), Ok(&b"payload"[..]));

        assert_eq!(open(&[1, 2, 3]), Err(LoadError::TooShort));
        // an empty payload is still a valid envelope
        assert_eq!(open(&seal(&[])), Ok(&[][..]));

        let mut bad = sealed.clone();
        bad[6] ^= 0x40;
        match open(&bad) {
            Err(LoadError::ChecksumMismatch { .. }) => (),
            other => panic!("expected a checksum mismatch, got {:?}", other),
        }
    }

    #[test]
    fn little_endian_values() {
        let mut w = SaveWriter::new();
        w.write_u32(0x0102_0304);
        w.write_u64(1);
        assert_eq!(w.as_bytes(), &[4, 3, 2, 1, 1, 0, 0, 0, 0, 0, 0, 0]);

        let bytes = w.into_inner();
        let mut r = SaveReader::new(&bytes);
        assert_eq!(r.read_u32(), Ok(0x0102_0304));
        assert_eq!(r.read_u64(), Ok(1));
        assert_eq!(r.read_u8(), Err(LoadError::Truncated));
        assert_eq!(r.finish(), Ok(()));
    }

    #[test]
    fn frames_are_length_prefixed() {
        let mut w = SaveWriter::new();
        w.write_frame(&[9, 8, 7]);
        let bytes = w.into_inner();
        assert_eq!(&bytes[..4], &7u32.to_le_bytes());

        let mut r = SaveReader::new(&bytes);
        assert_eq!(r.read_frame(), Ok(&[9u8, 8, 7][..]));

        let mut r = SaveReader::new(&bytes[..bytes.len() - 1]);
        assert_eq!(r.read_frame(), Err(LoadError::Truncated));

        let short = 3u32.to_le_bytes();
        assert_eq!(SaveReader::new(&short).read_frame(), Err(LoadError::TooShort));
    }

    #[test]
    fn piece_bodies() {
        let knight = Piece::with_state(PieceKind::Knight, Color::Black, true, false);
        assert_eq!(encode_piece(&knight), vec![4, 1, 1]);

        let mut rook = Piece::new(PieceKind::Rook, Color::White);
        rook.notify_moved();
        assert_eq!(encode_piece(&rook), vec![2, 0, 0, 1]);
        assert_eq!(decode_piece(&[2, 0, 0, 1]), Ok(rook));

        assert_eq!(decode_piece(&[7, 0, 0]), Err(LoadError::UnknownPieceTag(7)));
        assert_eq!(decode_piece(&[4, 2, 0]), Err(LoadError::InvalidColorTag(2)));
        assert_eq!(decode_piece(&[4, 0, 2]), Err(LoadError::InvalidFlag(2)));
        assert_eq!(decode_piece(&[2, 0, 0]), Err(LoadError::Truncated));
        assert_eq!(decode_piece(&[4, 0, 0, 0]), Err(LoadError::TrailingBytes(1)));
    }

    #[test]
    fn player_ids_must_match_slot() {
        let player = Player::new(Color::Black, &GameConfig::default());
        let body = encode_player(&player);
        assert!(decode_player(&body, Color::Black, Duration::from_secs(1)).is_ok());
        match decode_player(&body, Color::White, Duration::from_secs(1)) {
            Err(LoadError::InvalidPlayerId {
                expected: 0,
                found: 1,
            }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_kings_are_rejected() {
        let config = GameConfig::default();
        let players = [
            Player::new(Color::White, &config),
            Player::new(Color::Black, &config),
        ];
        let mut board = Board::standard();
        board.put(
            crate::coord::Coord::make_square(3, 3),
            Piece::new(PieceKind::King, Color::Black),
        );
        let bytes = encode_game(&board, &players, Color::White);
        match decode_game(&bytes, config.tick_interval) {
            Err(LoadError::DuplicateKing(Color::Black)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
