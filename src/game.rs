use crate::board::Board;
use crate::castle::CastleSide;
use crate::chess_move::{ChessMove, MoveOutcome};
use crate::color::{Color, ALL_COLORS};
use crate::config::GameConfig;
use crate::coord::Coord;
use crate::error::{Error, LoadError};
use crate::movement::{KingType, PieceType};
use crate::piece::Piece;
use crate::player::Player;
use crate::save;
use std::convert::TryFrom;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How an accepted move will be carried out.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Plan {
    Step,
    Castle(CastleSide),
}

/// A two-player game: the board, both players and whose turn it is.
///
/// Moves are checked completely before anything changes, so a rejected move leaves the game
/// exactly as it was.  The side to move only changes when the caller says so, through
/// `switch_side` or `finish_turn`.
#[derive(Debug)]
pub struct Game {
    board: Board,
    players: [Player; 2],
    side_to_move: Color,
    config: GameConfig,
}

impl Game {
    /// Create a new `Game` with an empty board and White to move.
    ///
    /// ```
    /// use chess_rules::{Board, Color, Game};
    ///
    /// let mut game = Game::new(None);
    /// assert_eq!(*game.board(), Board::new());
    /// assert_eq!(game.side_to_move(), Color::White);
    ///
    /// game.initialize_standard_positions();
    /// assert_eq!(*game.board(), Board::standard());
    /// ```
    pub fn new(time_limit: Option<Duration>) -> Game {
        Game::with_config(GameConfig::with_time_limit(time_limit))
    }

    /// Create a new `Game` with an empty board.
    pub fn with_config(config: GameConfig) -> Game {
        Game::from_board(Board::new(), config)
    }

    /// Create a new `Game` starting from a caller-populated board.
    pub fn from_board(board: Board, config: GameConfig) -> Game {
        Game {
            board,
            players: [
                Player::new(Color::White, &config),
                Player::new(Color::Black, &config),
            ],
            side_to_move: Color::White,
            config,
        }
    }

    /// Put every piece on its starting square.
    pub fn initialize_standard_positions(&mut self) {
        self.board = Board::standard();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn piece_at(&self, square: Coord) -> Option<Piece> {
        self.board.piece_on(square)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.side_to_move)
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.to_index()]
    }

    /// Look a player up by numeric id (0 or 1).
    pub fn player_by_id(&self, id: u32) -> Result<&Player, Error> {
        Ok(self.player(Color::try_from(id)?))
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.to_index()]
    }

    /// Hand the turn to the other side.
    pub fn switch_side(&mut self) {
        self.side_to_move = !self.side_to_move;
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Set the turn cap for both players.
    pub fn set_max_turns(&mut self, max_turns: u32) {
        for player in self.players.iter_mut() {
            player.set_max_turns(max_turns);
        }
    }

    /// Count `n` more turns for one player.
    pub fn add_turns(&mut self, color: Color, n: u32) {
        self.player_mut(color).add_turns(n);
    }

    /// Close the mover's turn: pause their clock, count the turn, hand over to the other side
    /// and start the other side's clock.
    pub fn finish_turn(&mut self) {
        let mover = self.side_to_move;
        self.player(mover).pause_clock();
        self.add_turns(mover, 1);
        self.switch_side();
        self.current_player().resume_clock();
        trace!(mover = ?mover, turns = self.player(mover).turns(), "turn finished");
    }

    /// Start both clocks with only the side to move's one counting.
    pub fn start_clocks(&mut self) {
        let side = self.side_to_move;
        for color in ALL_COLORS.iter() {
            let player = self.player_mut(*color);
            player.pause_clock();
            player.start_clock();
        }
        self.player(side).resume_clock();
    }

    /// Stop both clocks.  Stopped clocks never tick again until restarted.
    pub fn end(&mut self) {
        for player in self.players.iter_mut() {
            player.stop_clock();
        }
        debug!("game ended");
    }

    /// Try to move the piece on `src` to `dst`.
    ///
    /// ```
    /// use chess_rules::{Coord, Game, MoveOutcome};
    /// use std::str::FromStr;
    ///
    /// let mut game = Game::new(None);
    /// game.initialize_standard_positions();
    ///
    /// let e2 = Coord::from_str("e2").unwrap();
    /// let e4 = Coord::from_str("e4").unwrap();
    /// assert_eq!(game.move_piece(e2, e4), MoveOutcome::Ok);
    /// assert!(game.piece_at(e2).is_none());
    ///
    /// // Still White's turn: the caller decides when to switch.
    /// let e7 = Coord::from_str("e7").unwrap();
    /// let e5 = Coord::from_str("e5").unwrap();
    /// assert_eq!(game.move_piece(e7, e5), MoveOutcome::WrongOwner);
    /// ```
    pub fn move_piece(&mut self, src: Coord, dst: Coord) -> MoveOutcome {
        match self.plan_move(src, dst) {
            Ok(plan) => {
                self.apply(plan, src, dst);
                MoveOutcome::Ok
            }
            Err(outcome) => {
                trace!(src = %src, dst = %dst, reason = %outcome, "move rejected");
                outcome
            }
        }
    }

    pub fn make_move(&mut self, m: ChessMove) -> MoveOutcome {
        self.move_piece(m.get_source(), m.get_dest())
    }

    /// Run every check for a move without changing anything.
    fn plan_move(&self, src: Coord, dst: Coord) -> Result<Plan, MoveOutcome> {
        let piece = self.board.piece_on(src).ok_or(MoveOutcome::SourceEmpty)?;

        if piece.color() != self.side_to_move {
            return Err(MoveOutcome::WrongOwner);
        }

        if !piece.is_legal(&self.board, src, dst) {
            return Err(MoveOutcome::IllegalForPiece);
        }

        if self.board.color_on(dst) == Some(piece.color()) {
            return Err(MoveOutcome::OwnPieceBlocking);
        }

        let (df, _) = src.delta(dst);
        if KingType::is(piece.kind()) && df.abs() == 2 {
            let side = CastleSide::from_file_delta(df);
            if !side.is_home_castle(piece.color(), src, dst) {
                return Err(MoveOutcome::IllegalCastle);
            }
            return Ok(Plan::Castle(side));
        }

        if !self.board.is_path_clear(src, dst) {
            return Err(MoveOutcome::PathBlocked);
        }

        Ok(Plan::Step)
    }

    fn apply(&mut self, plan: Plan, src: Coord, dst: Coord) {
        let mover = self.side_to_move;
        match plan {
            Plan::Step => {
                if let Some(taken) = self.board.relocate(src, dst) {
                    debug!(src = %src, dst = %dst, captured = %taken, "capture");
                    self.player_mut(mover).capture(taken);
                }
                self.notify_moved(dst);
                debug!(src = %src, dst = %dst, "move applied");
            }
            Plan::Castle(side) => {
                let rook_src = side.rook_source(mover);
                let rook_dst = side.rook_dest(mover);
                self.board.relocate(src, dst);
                self.board.relocate(rook_src, rook_dst);
                self.notify_moved(dst);
                self.notify_moved(rook_dst);
                debug!(color = ?mover, side = ?side, "castled");
            }
        }
    }

    fn notify_moved(&mut self, square: Coord) {
        if let Some(piece) = self.board.piece_on_mut(square) {
            piece.notify_moved();
        }
    }

    /// Is the side to move in check?
    ///
    /// Every opposing piece is asked whether it could move onto the king's square.  A side with
    /// no king is never in check.  Pins, mates and self-check are not considered.
    pub fn is_check(&self) -> bool {
        let king = match self.board.king_square(self.side_to_move) {
            Some(sq) => sq,
            None => return false,
        };

        self.board
            .pieces()
            .filter(|(_, piece)| piece.color() != self.side_to_move)
            .any(|(sq, piece)| piece.is_legal(&self.board, sq, king))
    }

    /// Does the side to move still have a king on the board?
    pub fn is_king_alive(&self) -> bool {
        self.board.king_square(self.side_to_move).is_some()
    }

    /// Have both players used up their turns?
    pub fn is_draw(&self) -> bool {
        self.players.iter().all(|p| p.is_out_of_turns())
    }

    /// Has the side to move run out of time?
    pub fn is_time_finished(&self) -> bool {
        self.current_player().is_time_finished()
    }

    /// Serialize the whole game.
    pub fn save(&self) -> Vec<u8> {
        let bytes = save::encode_game(&self.board, &self.players, self.side_to_move);
        debug!(bytes = bytes.len() as u64, "game saved");
        bytes
    }

    /// Replace the whole game with a saved one.
    ///
    /// Nothing changes unless all of `data` checks out.  The loaded clocks are stopped, and the
    /// clocks being replaced are stopped as they are dropped.  Timing does not carry on through
    /// a load: call `start_clocks` again to resume it from the loaded readings.
    pub fn load(&mut self, data: &[u8]) -> Result<(), LoadError> {
        let saved = save::decode_game(data, self.config.tick_interval).map_err(|e| {
            warn!(error = %e, bytes = data.len() as u64, "rejected saved game");
            e
        })?;

        self.board = saved.board;
        self.players = saved.players;
        self.side_to_move = saved.side_to_move;
        debug!(bytes = data.len() as u64, side_to_move = ?self.side_to_move, "game loaded");
        Ok(())
    }
}

impl Default for Game {
    /// A game set up in the starting position with no time limit.
    fn default() -> Game {
        Game::from_board(Board::standard(), GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_builder::BoardBuilder;
    use crate::piece::PieceKind;
    use std::convert::TryInto;
    use std::str::FromStr;

    fn sq(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn play(game: &mut Game, mv: &str) -> MoveOutcome {
        game.make_move(ChessMove::from_str(mv).unwrap())
    }

    fn captured_total(game: &Game) -> usize {
        game.players().iter().map(|p| p.captured().len()).sum()
    }

    fn game_from(builder: &mut BoardBuilder) -> Game {
        Game::from_board(builder.try_into().unwrap(), GameConfig::default())
    }

    #[test]
    fn pawn_push() {
        let mut game = Game::default();
        assert_eq!(play(&mut game, "e2e4"), MoveOutcome::Ok);
        assert!(game.piece_at(sq("e2")).is_none());
        let pawn = game.piece_at(sq("e4")).unwrap();
        assert_eq!(pawn.kind(), PieceKind::Pawn);
        assert_eq!(pawn.color(), Color::White);
        assert!(pawn.has_moved());
    }

    #[test]
    fn pawn_capture() {
        let mut game = Game::default();
        assert_eq!(play(&mut game, "e2e4"), MoveOutcome::Ok);
        game.switch_side();
        assert_eq!(play(&mut game, "d7d5"), MoveOutcome::Ok);
        game.switch_side();
        assert_eq!(play(&mut game, "e4d5"), MoveOutcome::Ok);

        assert_eq!(game.piece_at(sq("d5")).unwrap().color(), Color::White);
        assert_eq!(captured_total(&game), 1);
        let taken = game.player(Color::White).captured()[0];
        assert_eq!(taken.kind(), PieceKind::Pawn);
        assert_eq!(taken.color(), Color::Black);
        assert!(taken.is_captured());
        assert_eq!(game.board().count(Color::Black), 15);
    }

    #[test]
    fn kingside_castle() {
        let mut game = Game::default();
        let mut bb = BoardBuilder::from(game.board());
        bb.clear_square(sq("f1")).clear_square(sq("g1"));
        game.board = bb.try_into().unwrap();

        assert_eq!(play(&mut game, "e1g1"), MoveOutcome::Ok);
        let king = game.piece_at(sq("g1")).unwrap();
        let rook = game.piece_at(sq("f1")).unwrap();
        assert_eq!(king.kind(), PieceKind::King);
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert!(king.has_moved() && rook.has_moved());
        assert!(game.piece_at(sq("e1")).is_none());
        assert!(game.piece_at(sq("h1")).is_none());
        assert_eq!(captured_total(&game), 0);
    }

    #[test]
    fn queenside_castle_for_black() {
        let mut game = game_from(
            BoardBuilder::new()
                .piece(sq("e8"), PieceKind::King, Color::Black)
                .piece(sq("a8"), PieceKind::Rook, Color::Black)
                .piece(sq("e1"), PieceKind::King, Color::White),
        );
        game.set_side_to_move(Color::Black);
        assert_eq!(play(&mut game, "e8c8"), MoveOutcome::Ok);
        assert_eq!(game.piece_at(sq("c8")).unwrap().kind(), PieceKind::King);
        assert_eq!(game.piece_at(sq("d8")).unwrap().kind(), PieceKind::Rook);
    }

    #[test]
    fn castle_takes_along_an_unmoved_rook_of_either_color() {
        let mut game = game_from(
            BoardBuilder::new()
                .piece(sq("e1"), PieceKind::King, Color::White)
                .piece(sq("h1"), PieceKind::Rook, Color::Black)
                .piece(sq("e8"), PieceKind::King, Color::Black),
        );
        assert_eq!(play(&mut game, "e1g1"), MoveOutcome::Ok);
        let rook = game.piece_at(sq("f1")).unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert_eq!(rook.color(), Color::Black);
        assert!(game.piece_at(sq("h1")).is_none());
        assert_eq!(captured_total(&game), 0);
    }

    #[test]
    fn castle_away_from_home_squares() {
        let mut game = game_from(
            BoardBuilder::new()
                .piece(sq("e4"), PieceKind::King, Color::White)
                .piece(sq("h4"), PieceKind::Rook, Color::White),
        );
        let before = game.save();
        assert_eq!(play(&mut game, "e4g4"), MoveOutcome::IllegalCastle);
        assert_eq!(game.save(), before);

        // a White king standing on Black's home square
        let mut game = game_from(
            BoardBuilder::new()
                .piece(sq("e8"), PieceKind::King, Color::White)
                .piece(sq("h8"), PieceKind::Rook, Color::White),
        );
        assert_eq!(play(&mut game, "e8g8"), MoveOutcome::IllegalCastle);
    }

    #[test]
    fn own_piece_blocking() {
        let mut game = Game::default();
        let before = game.save();
        assert_eq!(play(&mut game, "d1d2"), MoveOutcome::OwnPieceBlocking);
        assert_eq!(play(&mut game, "g1e2"), MoveOutcome::OwnPieceBlocking);
        assert_eq!(play(&mut game, "a1a2"), MoveOutcome::OwnPieceBlocking);
        assert_eq!(game.save(), before);
        assert_eq!(*game.board(), Board::standard());
    }

    #[test]
    fn rejection_order() {
        let mut game = Game::default();
        assert_eq!(play(&mut game, "e4e5"), MoveOutcome::SourceEmpty);
        assert_eq!(play(&mut game, "e7e5"), MoveOutcome::WrongOwner);
        assert_eq!(play(&mut game, "e2e5"), MoveOutcome::IllegalForPiece);
        assert_eq!(play(&mut game, "a1a3"), MoveOutcome::IllegalForPiece);
        assert_eq!(play(&mut game, "e1e2"), MoveOutcome::OwnPieceBlocking);
        assert_eq!(*game.board(), Board::standard());
    }

    #[test]
    fn empty_board_round_trip() {
        let game = Game::new(None);
        let bytes = game.save();
        let mut fresh = Game::new(None);
        fresh.initialize_standard_positions();
        fresh.load(&bytes).unwrap();
        assert_eq!(fresh.board().pieces().count(), 0);
        assert_eq!(fresh.side_to_move(), Color::White);
    }

    #[test]
    fn round_trip_keeps_everything() {
        let mut game = Game::new(Some(Duration::from_secs(300)));
        game.initialize_standard_positions();
        for mv in &["e2e4", "d7d5", "e4d5", "d8d5"] {
            assert_eq!(play(&mut game, mv), MoveOutcome::Ok, "{}", mv);
            game.finish_turn();
        }
        game.set_max_turns(40);

        let bytes = game.save();
        let mut copy = Game::new(None);
        copy.load(&bytes).unwrap();

        assert_eq!(copy.board(), game.board());
        assert_eq!(copy.side_to_move(), game.side_to_move());
        for color in ALL_COLORS.iter() {
            let (a, b) = (copy.player(*color), game.player(*color));
            assert_eq!(a.turns(), b.turns());
            assert_eq!(a.max_turns(), 40);
            assert_eq!(a.captured(), b.captured());
            assert_eq!(a.time_limit(), Some(Duration::from_secs(300)));
        }
        assert_eq!(copy.save(), bytes);
    }

    #[test]
    fn failed_load_changes_nothing() {
        let mut game = Game::default();
        play(&mut game, "g1f3");
        let before = game.save();

        let mut bad = before.clone();
        let last = bad.len() - 1;
        bad[last] ^= 1;
        assert!(game.load(&bad).is_err());
        assert_eq!(game.load(&[0, 1]), Err(LoadError::TooShort));
        assert_eq!(game.save(), before);
    }

    #[test]
    fn check_detection() {
        let mut game = game_from(
            BoardBuilder::new()
                .piece(sq("e1"), PieceKind::King, Color::White)
                .piece(sq("e8"), PieceKind::Rook, Color::Black)
                .piece(sq("a8"), PieceKind::King, Color::Black),
        );
        assert!(game.is_check());

        // a blocker on the file removes the check
        let mut blocked = BoardBuilder::from(game.board());
        blocked.piece(sq("e4"), PieceKind::Knight, Color::White);
        game.board = blocked.try_into().unwrap();
        assert!(!game.is_check());

        // Black's king is not attacked
        game.switch_side();
        assert!(!game.is_check());
    }

    #[test]
    fn pawn_gives_check_diagonally() {
        let game = game_from(
            BoardBuilder::new()
                .piece(sq("e1"), PieceKind::King, Color::White)
                .piece(sq("d2"), PieceKind::Pawn, Color::Black),
        );
        assert!(game.is_check());
        assert!(!Game::default().is_check());
    }

    #[test]
    fn kingless_side() {
        let game = game_from(BoardBuilder::new().piece(sq("e8"), PieceKind::Rook, Color::Black));
        assert!(!game.is_king_alive());
        assert!(!game.is_check());
        assert!(Game::default().is_king_alive());
    }

    #[test]
    fn king_capture_ends_life() {
        let mut game = game_from(
            BoardBuilder::new()
                .piece(sq("e1"), PieceKind::King, Color::White)
                .piece(sq("e8"), PieceKind::King, Color::Black)
                .piece(sq("e2"), PieceKind::Rook, Color::White),
        );
        assert_eq!(play(&mut game, "e2e8"), MoveOutcome::Ok);
        game.switch_side();
        assert!(!game.is_king_alive());
    }

    #[test]
    fn draws_need_both_players() {
        let mut game = Game::default();
        game.set_max_turns(2);
        game.add_turns(Color::White, 2);
        assert!(!game.is_draw());
        game.add_turns(Color::Black, 1);
        assert!(!game.is_draw());
        game.add_turns(Color::Black, 1);
        assert!(game.is_draw());
    }

    #[test]
    fn finish_turn_switches_and_counts() {
        let mut game = Game::default();
        game.finish_turn();
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.player(Color::White).turns(), 1);
        assert!(game.player(Color::White).clock().is_paused());
        assert!(!game.player(Color::Black).clock().is_paused());
    }

    #[test]
    fn no_time_limit_never_finishes() {
        let game = Game::default();
        assert!(!game.is_time_finished());
        assert!(game.player_by_id(1).is_ok());
        assert_eq!(
            game.player_by_id(2).map(|p| p.id()),
            Err(Error::InvalidPlayerId { id: 2 })
        );
    }

    #[test]
    fn sub_second_limit_is_not_finished_at_the_start() {
        let game = Game::new(Some(Duration::from_millis(500)));
        assert!(!game.is_time_finished());
        assert_eq!(game.current_player().time_limit(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn load_stops_clocks_until_restarted() {
        let mut game = Game::default();
        let bytes = game.save();
        game.start_clocks();
        assert!(game.current_player().clock().is_running());

        game.load(&bytes).unwrap();
        assert!(!game.player(Color::White).clock().is_running());
        assert!(!game.player(Color::Black).clock().is_running());

        game.start_clocks();
        assert!(game.current_player().clock().is_running());
        game.end();
    }
}
