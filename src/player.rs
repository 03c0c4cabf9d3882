use crate::clock::Clock;
use crate::color::Color;
use crate::config::GameConfig;
use crate::piece::Piece;
use std::time::Duration;

/// One side of the game: its turn count, the pieces it has taken and its clock.
#[derive(Debug)]
pub struct Player {
    id: Color,
    turns: u32,
    max_turns: u32,
    captured: Vec<Piece>,
    clock: Clock,
}

impl Player {
    /// A player that has taken no turns and captured nothing, with a stopped clock.
    pub fn new(id: Color, config: &GameConfig) -> Player {
        Player {
            id,
            turns: 0,
            max_turns: config.max_turns,
            captured: vec![],
            clock: Clock::new(config.time_limit, config.tick_interval),
        }
    }

    /// Rebuild a player from saved state.
    pub(crate) fn restore(
        id: Color,
        turns: u32,
        max_turns: u32,
        captured: Vec<Piece>,
        clock: Clock,
    ) -> Player {
        Player {
            id,
            turns,
            max_turns,
            captured,
            clock,
        }
    }

    /// Which side is this?  Player 0 is White.
    #[inline]
    pub fn id(&self) -> Color {
        self.id
    }

    #[inline]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    #[inline]
    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn set_max_turns(&mut self, max_turns: u32) {
        self.max_turns = max_turns;
    }

    /// Count `n` more turns.  Turn counts only ever go up.
    pub fn add_turns(&mut self, n: u32) {
        self.turns = self.turns.saturating_add(n);
    }

    /// Has this player used up its turns?
    pub fn is_out_of_turns(&self) -> bool {
        self.turns >= self.max_turns
    }

    /// Pieces this player has taken, oldest first.
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    pub(crate) fn capture(&mut self, mut piece: Piece) {
        piece.set_captured(true);
        self.captured.push(piece);
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.clock.time_limit()
    }

    pub fn is_time_finished(&self) -> bool {
        self.clock.is_time_finished()
    }

    pub fn start_clock(&mut self) {
        self.clock.start();
    }

    pub fn pause_clock(&self) {
        self.clock.pause();
    }

    pub fn resume_clock(&self) {
        self.clock.resume();
    }

    pub fn stop_clock(&mut self) {
        self.clock.stop();
    }
}
