//! Screen trait and transition type for the shell state machine.

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::registration::{Player, Registration};

/// The result of handling an input event on a screen.
///
/// Screens return this from [`Screen::handle_key`] to drive the
/// [`ShellController`](crate::ShellController) state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Show the confirmation card for a validated registration.
    GoToConfirm(Player),
    /// Back to the registration form, pre-filled or blank.
    GoToStart(Option<Registration>),
    /// Enter the game with the confirmed player.
    GoToGame(Player),
    /// Exit the application cleanly.
    Quit,
}

/// Trait implemented by each screen in the shell state machine.
///
/// Each screen owns its own state, renders its UI, and handles key events.
/// The controller calls these methods in the event loop.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition;
}
