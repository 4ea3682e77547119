//! Screen implementations for the shell state machine.

mod confirm;
mod game;
mod start;

pub use confirm::ConfirmScreen;
pub use game::GameScreen;
pub use start::StartScreen;
