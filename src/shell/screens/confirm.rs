//! Confirmation card shown after a successful registration.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::palette::PALETTE;
use crate::registration::Player;
use crate::shell::screen::{Screen, ScreenTransition};

/// Shows the player's details and asks them to confirm.
#[derive(Debug, Getters)]
pub struct ConfirmScreen {
    player: Player,
}

impl ConfirmScreen {
    /// Creates the card for a registered player.
    #[instrument(skip(player), fields(name = %player.name()))]
    pub fn new(player: Player) -> Self {
        debug!("Initializing ConfirmScreen");
        Self { player }
    }
}

impl Screen for ConfirmScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(PALETTE.background()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(11), Constraint::Min(0)])
            .split(area);

        let lines = vec![
            Line::from(Span::styled(
                format!("Hello {}", self.player.name()),
                PALETTE.title(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Here is the information you entered:",
                Style::default().fg(PALETTE.instruction),
            )),
            Line::from(Span::styled(
                self.player.email().as_str(),
                Style::default().fg(PALETTE.user_info),
            )),
            Line::from(Span::styled(
                self.player.phone().as_str(),
                Style::default().fg(PALETTE.user_info),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "If it is not correct, please go back and edit them.",
                Style::default().fg(PALETTE.instruction),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[b] Go back", PALETTE.button(PALETTE.danger_button, true)),
                Span::raw("    "),
                Span::styled("[c] Continue", PALETTE.button(PALETTE.neutral_button, true)),
            ]),
        ];

        let card = Paragraph::new(lines)
            .style(PALETTE.card())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(PALETTE.shadow)),
            );
        frame.render_widget(card, chunks[1]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Esc => {
                info!("Going back to edit registration");
                ScreenTransition::GoToStart(Some(self.player.clone().into_registration()))
            }
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Enter => {
                info!("Registration confirmed");
                ScreenTransition::GoToGame(self.player.clone())
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
