//! Shapes exchanged between the transport and the form engine.

use crate::domain::{Button, ImageInput, MonthGrid};

/// An event delivered by the transport on behalf of one user.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// `/start`: show the main menu.
    Start,
    Text(String),
    Location { latitude: f64, longitude: f64 },
    Image(ImageInput),
    /// A keyboard button was pressed; carries the button's tag.
    Button(String),
    Cancel,
    Reset,
    /// Diagnostic request for the identity of the current chat.
    ChatInfo,
}

/// Identity of the chat an event arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
    pub id: i64,
    pub kind: String,
    pub title: Option<String>,
}

/// Keyboard attached to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    Menu(Vec<Vec<Button>>),
    Calendar(MonthGrid),
}

impl Keyboard {
    pub fn menu(rows: Vec<Vec<Button>>) -> Self {
        Keyboard::Menu(rows)
    }

    pub fn rows(&self) -> Vec<Vec<Button>> {
        match self {
            Keyboard::Menu(rows) => rows.clone(),
            Keyboard::Calendar(grid) => grid.rows(),
        }
    }
}

/// A message the engine wants shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    /// Photo to display alongside the text, by transport reference.
    pub photo: Option<String>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            photo: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_photo(mut self, reference: impl Into<String>) -> Self {
        self.photo = Some(reference.into());
        self
    }
}

/// Buttons with a fixed meaning outside the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartCheckIn,
    StartCheckOut,
    ResetData,
    BotInfo,
    BackToMenu,
    ConfirmSave,
    ConfirmReset,
}

impl MenuAction {
    pub fn tag(self) -> &'static str {
        match self {
            MenuAction::StartCheckIn => "start_checkin",
            MenuAction::StartCheckOut => "start_checkout",
            MenuAction::ResetData => "reset_data",
            MenuAction::BotInfo => "info_bot",
            MenuAction::BackToMenu => "back_to_menu",
            MenuAction::ConfirmSave => "confirm_save",
            MenuAction::ConfirmReset => "confirm_reset",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        [
            MenuAction::StartCheckIn,
            MenuAction::StartCheckOut,
            MenuAction::ResetData,
            MenuAction::BotInfo,
            MenuAction::BackToMenu,
            MenuAction::ConfirmSave,
            MenuAction::ConfirmReset,
        ]
        .into_iter()
        .find(|action| action.tag() == tag)
    }

    pub fn button(self, label: &str) -> Button {
        Button::new(label, self.tag())
    }
}
