//! Rule enforcement and save-state core for a two-player chess game.
//!
//! A `Game` owns the `Board`, both `Player`s and the side to move.  Callers ask it to move
//! pieces, poll it for check, draw and timeout, and save or load its whole state.
//!
//! ```
//! use chess_rules::{ChessMove, Color, Game, MoveOutcome};
//! use std::str::FromStr;
//!
//! let mut game = Game::default();
//! let mv = ChessMove::from_str("e2e4").expect("valid move");
//! assert_eq!(game.make_move(mv), MoveOutcome::Ok);
//! game.finish_turn();
//! assert_eq!(game.side_to_move(), Color::Black);
//!
//! let saved = game.save();
//! let mut copy = Game::new(None);
//! copy.load(&saved).expect("valid save");
//! assert_eq!(copy.board(), game.board());
//! ```

mod board;
pub use crate::board::*;

mod board_builder;
pub use crate::board_builder::*;

mod castle;
pub use crate::castle::*;

mod chess_move;
pub use crate::chess_move::*;

mod clock;
pub use crate::clock::*;

mod color;
pub use crate::color::*;

mod config;
pub use crate::config::*;

mod coord;
pub use crate::coord::*;

mod error;
pub use crate::error::*;

mod game;
pub use crate::game::*;

mod movement;
pub use crate::movement::*;

mod piece;
pub use crate::piece::*;

mod player;
pub use crate::player::*;

pub mod save;
