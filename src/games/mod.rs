//! Reference game circuits for testing the engine.
//!
//! - `TicTacToeBuilder`: alternating moves, `noop` for the waiting role
//! - `ButtonsBuilder`: single role, step counter, puzzle goal
//! - `PenniesBuilder`: simultaneous moves, one round

pub mod tictactoe;
pub mod buttons;
pub mod pennies;

pub use tictactoe::TicTacToeBuilder;
pub use buttons::ButtonsBuilder;
pub use pennies::PenniesBuilder;
