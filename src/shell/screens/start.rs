//! Registration screen: name, email, phone and the terms checkbox.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use crate::palette::PALETTE;
use crate::registration::{FieldError, Registration, validate_email, validate_name, validate_phone};
use crate::shell::screen::{Screen, ScreenTransition};

/// Which part of the form has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumIter)]
pub enum Focus {
    /// Name input.
    #[default]
    Name,
    /// Email input.
    Email,
    /// Phone input.
    Phone,
    /// Terms checkbox.
    Terms,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Phone,
            Self::Phone => Self::Terms,
            Self::Terms => Self::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Name => Self::Terms,
            Self::Email => Self::Name,
            Self::Phone => Self::Email,
            Self::Terms => Self::Phone,
        }
    }
}

/// State for the registration screen.
///
/// Each field is re-validated on every edit. Errors only appear for fields
/// that have been edited at least once.
#[derive(Debug, Default, Getters)]
pub struct StartScreen {
    form: Registration,
    focus: Focus,
    name_error: Option<FieldError>,
    email_error: Option<FieldError>,
    phone_error: Option<FieldError>,
    alert: Option<String>,
}

impl StartScreen {
    /// Creates a blank form.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing StartScreen");
        Self::default()
    }

    /// Creates a form pre-filled for editing, with fields re-validated.
    #[instrument(skip(form))]
    pub fn with_form(form: Registration) -> Self {
        let mut screen = Self {
            form,
            ..Self::default()
        };
        for focus in [Focus::Name, Focus::Email, Focus::Phone] {
            screen.revalidate(focus);
        }
        screen
    }

    /// Clears every field, error and the checkbox.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!("Registration form reset");
        *self = Self::default();
    }

    fn field_mut(&mut self, focus: Focus) -> Option<&mut String> {
        match focus {
            Focus::Name => Some(self.form.name_mut()),
            Focus::Email => Some(self.form.email_mut()),
            Focus::Phone => Some(self.form.phone_mut()),
            Focus::Terms => None,
        }
    }

    fn revalidate(&mut self, focus: Focus) {
        match focus {
            Focus::Name => self.name_error = validate_name(self.form.name()).err(),
            Focus::Email => self.email_error = validate_email(self.form.email()).err(),
            Focus::Phone => self.phone_error = validate_phone(self.form.phone()).err(),
            Focus::Terms => {}
        }
    }

    fn edit(&mut self, edit: impl FnOnce(&mut String)) {
        let focus = self.focus;
        if let Some(field) = self.field_mut(focus) {
            edit(field);
            self.revalidate(focus);
            self.alert = None;
        }
    }

    /// Attempts to register. The register button is disabled until the
    /// checkbox is checked.
    #[instrument(skip(self))]
    fn register(&mut self) -> ScreenTransition {
        if !*self.form.terms_accepted() {
            debug!("Register pressed while disabled");
            return ScreenTransition::Stay;
        }
        match self.form.submit() {
            Ok(player) => {
                self.alert = None;
                ScreenTransition::GoToConfirm(player)
            }
            Err(e) => {
                for focus in [Focus::Name, Focus::Email, Focus::Phone] {
                    self.revalidate(focus);
                }
                self.alert = Some(e.to_string());
                ScreenTransition::Stay
            }
        }
    }

    fn error_for(&self, focus: Focus) -> Option<FieldError> {
        match focus {
            Focus::Name => self.name_error,
            Focus::Email => self.email_error,
            Focus::Phone => self.phone_error,
            Focus::Terms => None,
        }
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, focus: Focus) {
        let (label, value, placeholder) = match focus {
            Focus::Name => ("Name", self.form.name(), "Enter your name"),
            Focus::Email => ("Email", self.form.email(), "Enter your email"),
            Focus::Phone => ("Phone", self.form.phone(), "Enter your phone"),
            Focus::Terms => return,
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let border = if self.focus == focus {
            Style::default()
                .fg(PALETTE.input_border)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(PALETTE.divider)
        };
        let text = if value.is_empty() {
            Span::styled(placeholder, Style::default().fg(ratatui::style::Color::DarkGray))
        } else {
            Span::raw(value.as_str())
        };
        let input = Paragraph::new(Line::from(text))
            .style(PALETTE.card())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(label),
            );
        frame.render_widget(input, rows[0]);

        if let Some(error) = self.error_for(focus) {
            let message = Paragraph::new(error.to_string()).style(Style::default().fg(PALETTE.error));
            frame.render_widget(message, rows[1]);
        }
    }
}

impl Screen for StartScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(PALETTE.background()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Welcome")
            .style(PALETTE.title())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        for (focus, chunk) in Focus::iter().zip(&chunks[1..4]) {
            self.render_field(frame, *chunk, focus);
        }

        let mark = if *self.form.terms_accepted() { "[✔]" } else { "[ ]" };
        let checkbox_style = if self.focus == Focus::Terms {
            Style::default()
                .fg(PALETTE.instruction)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(PALETTE.instruction)
        };
        let checkbox = Paragraph::new(format!("{} I agree to the terms and conditions", mark))
            .style(checkbox_style);
        frame.render_widget(checkbox, chunks[4]);

        let buttons = Line::from(vec![
            Span::styled("[Esc] Reset", PALETTE.button(PALETTE.danger_button, true)),
            Span::raw("    "),
            Span::styled(
                "[Enter] Register",
                PALETTE.button(PALETTE.confirm_button, *self.form.terms_accepted()),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            chunks[5],
        );

        if let Some(alert) = &self.alert {
            let alert = Paragraph::new(alert.as_str())
                .style(Style::default().fg(PALETTE.error).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center);
            frame.render_widget(alert, chunks[6]);
        }

        let help = Paragraph::new("Tab/↑↓: Move | Space: Toggle box | Ctrl+C: Quit")
            .style(Style::default().fg(PALETTE.shadow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[8]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ScreenTransition::Quit;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                ScreenTransition::Stay
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.previous();
                ScreenTransition::Stay
            }
            KeyCode::Char(' ') if self.focus == Focus::Terms => {
                self.form.toggle_terms();
                self.alert = None;
                ScreenTransition::Stay
            }
            KeyCode::Char(c) => {
                self.edit(|field| field.push(c));
                ScreenTransition::Stay
            }
            KeyCode::Backspace => {
                self.edit(|field| {
                    field.pop();
                });
                ScreenTransition::Stay
            }
            KeyCode::Esc => {
                self.reset();
                ScreenTransition::Stay
            }
            KeyCode::Enter => self.register(),
            _ => ScreenTransition::Stay,
        }
    }
}
