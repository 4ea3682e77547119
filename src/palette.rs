//! Colours shared by the terminal screens.

use ratatui::style::{Color, Modifier, Style};

/// Named colours for every styled element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Background gradient, top to bottom.
    pub gradient: [Color; 3],
    /// Card backgrounds.
    pub card_background: Color,
    /// Card drop shadow.
    pub shadow: Color,
    /// Headline text.
    pub greeting: Color,
    /// Instructions and prompts.
    pub instruction: Color,
    /// Player details on the confirm card.
    pub user_info: Color,
    /// Plain informational text.
    pub info: Color,
    /// Feedback text on the game card.
    pub feedback: Color,
    /// Rules between sections.
    pub divider: Color,
    /// Input field borders.
    pub input_border: Color,
    /// Destructive buttons (reset, go back, end game).
    pub danger_button: Color,
    /// Neutral buttons (hint, try again).
    pub neutral_button: Color,
    /// Confirming buttons (register, continue, start).
    pub confirm_button: Color,
    /// Validation messages.
    pub error: Color,
}

/// The app palette.
pub static PALETTE: Palette = Palette {
    gradient: [
        Color::Rgb(173, 216, 230),
        Color::Rgb(135, 206, 250),
        Color::Rgb(0, 191, 255),
    ],
    card_background: Color::Rgb(211, 211, 211),
    shadow: Color::Black,
    greeting: Color::Magenta,
    instruction: Color::Magenta,
    user_info: Color::Blue,
    info: Color::Black,
    feedback: Color::Magenta,
    divider: Color::Magenta,
    input_border: Color::Magenta,
    danger_button: Color::Red,
    neutral_button: Color::Blue,
    confirm_button: Color::Green,
    error: Color::Red,
};

impl Palette {
    /// Style for a card body.
    pub fn card(&self) -> Style {
        Style::default().bg(self.card_background).fg(self.info)
    }

    /// Bold headline style.
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.greeting)
            .bg(self.card_background)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a button label, dimmed when the button is disabled.
    pub fn button(&self, colour: Color, enabled: bool) -> Style {
        if enabled {
            Style::default().fg(colour).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    /// Screen background, the middle gradient stop.
    pub fn background(&self) -> Style {
        Style::default().bg(self.gradient[1])
    }
}
