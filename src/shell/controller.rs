//! Shell controller: the state machine driving the terminal screens.

use crossterm::event::{self, Event, KeyEventKind};
use derive_getters::Getters;
use ratatui::{Terminal, backend::Backend};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument};

use crate::config::AppConfig;
use crate::shell::screen::{Screen, ScreenTransition};
use crate::shell::screens::{ConfirmScreen, GameScreen, StartScreen};

/// Active screen in the shell state machine.
#[derive(Debug)]
enum ActiveScreen {
    Start(StartScreen),
    Confirm(ConfirmScreen),
    Game(GameScreen),
}

impl ActiveScreen {
    fn as_screen(&self) -> &dyn Screen {
        match self {
            Self::Start(s) => s,
            Self::Confirm(s) => s,
            Self::Game(s) => s,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::Start(s) => s,
            Self::Confirm(s) => s,
            Self::Game(s) => s,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Confirm(_) => "confirm",
            Self::Game(_) => "game",
        }
    }
}

/// Controller that drives the shell state machine.
///
/// Call [`ShellController::run`] to start the event loop.
#[derive(Debug, Getters)]
pub struct ShellController {
    config: AppConfig,
}

impl ShellController {
    /// Creates a new shell controller.
    #[instrument(skip(config))]
    pub fn new(config: AppConfig) -> Self {
        info!("Creating ShellController");
        Self { config }
    }

    /// Runs the event loop until the user quits.
    ///
    /// Each pass applies pending countdown ticks, redraws, and handles at
    /// most one key press.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting shell event loop");

        let mut screen = ActiveScreen::Start(StartScreen::new());

        loop {
            if let ActiveScreen::Game(game) = &mut screen {
                game.pump_ticks();
            }

            terminal.draw(|f| screen.as_screen().render(f))?;

            // Poll for input with short timeout to keep the loop responsive.
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                let transition = screen.as_screen_mut().handle_key(key);
                screen = match self.apply_transition(transition, screen) {
                    Some(next) => next,
                    None => {
                        info!("Shell quitting");
                        return Ok(());
                    }
                };
            }

            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Applies a screen transition, returning the next screen or `None` to quit.
    ///
    /// Leaving the game screen drops its live game, which cancels the timer.
    #[instrument(skip(self, current), fields(from = current.name()))]
    fn apply_transition(
        &self,
        transition: ScreenTransition,
        current: ActiveScreen,
    ) -> Option<ActiveScreen> {
        debug!(transition = ?transition, "Applying screen transition");
        match transition {
            ScreenTransition::Stay => Some(current),

            ScreenTransition::GoToConfirm(player) => {
                info!("Navigating to Confirm");
                Some(ActiveScreen::Confirm(ConfirmScreen::new(player)))
            }

            ScreenTransition::GoToStart(Some(form)) => {
                info!("Navigating to Start with the previous form");
                Some(ActiveScreen::Start(StartScreen::with_form(form)))
            }

            ScreenTransition::GoToStart(None) => {
                info!("Navigating to a blank Start");
                Some(ActiveScreen::Start(StartScreen::new()))
            }

            ScreenTransition::GoToGame(player) => {
                info!(seed = %player.seed(), "Navigating to Game");
                Some(ActiveScreen::Game(GameScreen::new(
                    player,
                    *self.config.rules(),
                    self.config.shell().tick_period(),
                )))
            }

            ScreenTransition::Quit => None,
        }
    }
}
