//! Game screen: drives a [`LiveGame`] from key presses and timer ticks.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::games::guess::{GameEvent, GameRules, NumberSource, Phase, RandomSource, Verdict};
use crate::palette::PALETTE;
use crate::registration::Player;
use crate::shell::live_game::LiveGame;
use crate::shell::screen::{Screen, ScreenTransition};

/// Longest guess the input box accepts.
const MAX_INPUT: usize = 6;

/// State for the game screen.
#[derive(Debug)]
pub struct GameScreen<S = RandomSource> {
    player: Player,
    game: LiveGame<S>,
    input: String,
    message: Option<String>,
}

impl GameScreen<RandomSource> {
    /// Creates the screen with an OS-seeded random source.
    pub fn new(player: Player, rules: GameRules, tick_period: Duration) -> Self {
        Self::with_source(player, rules, tick_period, RandomSource::new())
    }
}

impl<S: NumberSource> GameScreen<S> {
    /// Creates the screen with a specific number source.
    #[instrument(skip(player, source), fields(seed = %player.seed()))]
    pub fn with_source(player: Player, rules: GameRules, tick_period: Duration, source: S) -> Self {
        info!("Initializing GameScreen");
        let game = LiveGame::new(player.seed(), rules, tick_period, source);
        Self {
            player,
            game,
            input: String::new(),
            message: None,
        }
    }

    /// The live game.
    pub fn game(&self) -> &LiveGame<S> {
        &self.game
    }

    /// Text in the guess box.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Last status line (rejection or verdict).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Applies pending timer ticks.
    pub fn pump_ticks(&mut self) {
        if let Err(e) = self.game.pump_ticks() {
            warn!(error = %e, "Tick failed");
        }
    }

    /// Applies an event, logging instead of failing if the phase forbids it.
    fn send(&mut self, event: GameEvent) {
        match self.game.apply(event) {
            Ok(Some(verdict)) => {
                debug!(%verdict, "Guess judged");
                self.message = match verdict {
                    Verdict::Rejected(rejection) => Some(rejection.to_string()),
                    _ => None,
                };
            }
            Ok(None) => self.message = None,
            Err(e) => warn!(error = %e, "Key ignored"),
        }
    }

    fn submit_input(&mut self) {
        if self.input.is_empty() {
            return;
        }
        let raw = std::mem::take(&mut self.input);
        self.send(GameEvent::Guess(raw));
    }

    fn help_text(&self) -> &'static str {
        match self.game.session().phase() {
            Phase::NotStarted => "s: Start | r: Restart | q: Quit",
            Phase::InProgress if self.game.session().hint_used() => {
                "0-9: Guess | Enter: Submit | r: Restart | q: Quit"
            }
            Phase::InProgress => "0-9: Guess | Enter: Submit | h: Hint | r: Restart | q: Quit",
            Phase::AwaitingFeedbackAck => "t: Try again | e: End game | r: Restart | q: Quit",
            Phase::Won | Phase::Lost => "n: New game | r: Restart | q: Quit",
        }
    }

    fn body_lines(&self) -> Vec<Line<'_>> {
        let session = self.game.session();
        let instruction = Style::default().fg(PALETTE.instruction);
        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "A number has been chosen. It is a multiple of {}.",
                    session.seed()
                ),
                Style::default().fg(PALETTE.info),
            )),
            Line::from(""),
        ];

        match session.phase() {
            Phase::NotStarted => {
                lines.push(Line::from(Span::styled(
                    format!(
                        "Guess a number between 1 and {}. You have {} seconds and {} attempts.",
                        session.rules().upper_bound(),
                        session.rules().seconds(),
                        session.rules().attempts()
                    ),
                    instruction,
                )));
            }
            Phase::InProgress => {
                lines.push(Line::from(Span::styled(
                    format!(
                        "Time left: {}s    Attempts left: {}",
                        session.seconds_remaining(),
                        session.attempts_remaining()
                    ),
                    instruction,
                )));
                if let Some(hint) = session.hint_text() {
                    lines.push(Line::from(Span::styled(
                        format!("Hint: the number is {}", hint),
                        Style::default().fg(PALETTE.user_info),
                    )));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Your guess: ", instruction),
                    Span::styled(
                        format!("{}_", self.input),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]));
                if let Some(message) = &self.message {
                    lines.push(Line::from(Span::styled(
                        message.as_str(),
                        Style::default().fg(PALETTE.error),
                    )));
                }
            }
            Phase::AwaitingFeedbackAck => {
                if let Some(feedback) = session.last_feedback() {
                    lines.push(Line::from(Span::styled(
                        format!("You did not guess correctly, {}!", feedback),
                        Style::default()
                            .fg(PALETTE.feedback)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    format!("Attempts left: {}", session.attempts_remaining()),
                    instruction,
                )));
            }
            Phase::Won | Phase::Lost => {
                let headline = if session.phase() == Phase::Won {
                    "You won!"
                } else {
                    "The game is over."
                };
                lines.push(Line::from(Span::styled(headline, PALETTE.title())));
                if let Some(outcome) = session.outcome_message() {
                    lines.push(Line::from(Span::styled(
                        outcome,
                        Style::default().fg(PALETTE.feedback),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    format!("The number was {}.", session.target()),
                    Style::default().fg(PALETTE.user_info),
                )));
            }
        }
        lines
    }
}

impl<S: NumberSource> Screen for GameScreen<S> {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(PALETTE.background()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(format!("Guess My Number, {}", self.player.name()))
            .style(PALETTE.title())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let card = Paragraph::new(self.body_lines())
            .style(PALETTE.card())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(PALETTE.divider)),
            );
        frame.render_widget(card, chunks[1]);

        let help = Paragraph::new(self.help_text())
            .style(Style::default().fg(PALETTE.shadow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key), fields(phase = %self.game.session().phase()))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return ScreenTransition::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                info!("Restarting from registration");
                return ScreenTransition::GoToStart(None);
            }
            _ => {}
        }

        match (self.game.session().phase(), key.code) {
            (Phase::NotStarted, KeyCode::Char('s') | KeyCode::Char('S')) => {
                self.send(GameEvent::Start);
            }
            (Phase::InProgress, KeyCode::Char(c)) if c.is_ascii_digit() => {
                if self.input.len() < MAX_INPUT {
                    self.input.push(c);
                }
            }
            (Phase::InProgress, KeyCode::Backspace) => {
                self.input.pop();
            }
            (Phase::InProgress, KeyCode::Enter) => self.submit_input(),
            (Phase::InProgress, KeyCode::Char('h') | KeyCode::Char('H'))
                if !self.game.session().hint_used() =>
            {
                self.send(GameEvent::Hint);
            }
            (Phase::AwaitingFeedbackAck, KeyCode::Char('t') | KeyCode::Char('T')) => {
                self.send(GameEvent::TryAgain);
            }
            (Phase::AwaitingFeedbackAck, KeyCode::Char('e') | KeyCode::Char('E')) => {
                self.send(GameEvent::EndGame);
            }
            (Phase::Won | Phase::Lost, KeyCode::Char('n') | KeyCode::Char('N')) => {
                self.input.clear();
                self.send(GameEvent::NewSession);
            }
            _ => {}
        }
        ScreenTransition::Stay
    }
}
