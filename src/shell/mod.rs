//! Terminal shell: registration, confirmation and game screens.

mod controller;
mod live_game;
mod screen;
mod screens;

pub use controller::ShellController;
pub use live_game::LiveGame;
pub use screen::{Screen, ScreenTransition};
pub use screens::{ConfirmScreen, GameScreen, StartScreen};
