//! A move-legality and game-state engine for grid-based strategy games.
//!
//! Two rule sets share the engine: orthodox chess and xiangqi. The crate
//! covers piece movement capabilities, composite move instructions,
//! speculative check detection, turn order, and end-of-game evaluation;
//! rendering, audio, and process entry points live with the consumers of
//! the `display` boundary.

pub mod board;
pub mod chess;
pub mod check;
pub mod constants;
pub mod display;
pub mod fen;
pub mod movement;
pub mod moveset;
pub mod piece;
pub mod position;
pub mod rules;
pub mod xiangqi;
pub mod zobrist;
