//! Conversation state of the terminal console.
//!
//! The console plays the chat transport for a single user: it keeps the
//! transcript, the keyboard attached to the last prompt and the line being
//! typed, and forwards events to the [`FormEngine`] one at a time.

use tracing::debug;

use super::events::{ChatInfo, Inbound, Keyboard, Prompt};
use super::form::FormEngine;
use crate::domain::{Button, FormState, UserId};

/// Represents the current mode of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Chatting with the bot
    Chat,
    /// Help screen is displayed
    Help,
}

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Bot,
    User,
    /// Local notices from the console itself, never sent to the engine.
    Console,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Main console state: the engine plus everything needed to render it.
///
/// # Examples
///
/// ```
/// use dutylog::application::{App, AppMode, ChatInfo, CommitPipeline, FormEngine, Inbound, SystemClock};
/// use dutylog::domain::UserId;
/// use dutylog::infrastructure::{CsvRecordSink, LogNotifier};
///
/// let pipeline = CommitPipeline::new(Box::new(CsvRecordSink::new("reports.csv")), Box::new(LogNotifier));
/// let engine = FormEngine::new(pipeline, Box::new(SystemClock));
/// let chat = ChatInfo { id: 1, kind: "private".to_string(), title: None };
/// let mut app = App::new(engine, UserId(1), chat);
/// assert_eq!(app.mode, AppMode::Chat);
///
/// app.send(Inbound::Start, "/start");
/// assert_eq!(app.transcript.len(), 2);
/// assert!(app.keyboard.is_some());
/// ```
pub struct App {
    /// The form engine handling this user's events
    pub engine: FormEngine,
    /// Identity the console speaks as
    pub user: UserId,
    /// Chat the console pretends to be
    pub chat: ChatInfo,
    /// Current console mode
    pub mode: AppMode,
    /// Whether typing goes to the input line or the keyboard
    pub focus: Focus,
    /// Line being typed
    pub input: String,
    /// Cursor position within the input line, in characters
    pub cursor_position: usize,
    /// Every message exchanged so far
    pub transcript: Vec<TranscriptEntry>,
    /// Keyboard attached to the last bot prompt
    pub keyboard: Option<Keyboard>,
    /// Highlighted button as (row, column)
    pub selected_button: (usize, usize),
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
}

impl App {
    pub fn new(engine: FormEngine, user: UserId, chat: ChatInfo) -> Self {
        Self {
            engine,
            user,
            chat,
            mode: AppMode::Chat,
            focus: Focus::Input,
            input: String::new(),
            cursor_position: 0,
            transcript: Vec::new(),
            keyboard: None,
            selected_button: (0, 0),
            help_scroll: 0,
            status_message: None,
        }
    }

    /// Current step of this user's report, if one is in progress.
    pub fn form_state(&self) -> Option<FormState> {
        self.engine.sessions().get(self.user).map(|s| s.state)
    }

    /// Sends one event to the engine and records both sides of the exchange.
    pub fn send(&mut self, event: Inbound, echo: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::User,
            text: echo.into(),
        });
        debug!(user = %self.user, event = ?event, "console event");
        let prompt = self.engine.handle(self.user, &self.chat, event);
        self.show(prompt);
    }

    fn show(&mut self, prompt: Prompt) {
        let mut text = prompt.text;
        if let Some(photo) = prompt.photo {
            text = format!("[photo {}]\n{}", photo, text);
        }
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::Bot,
            text,
        });
        self.keyboard = prompt.keyboard;
        self.selected_button = self.first_selectable();
        self.focus = if self.keyboard.is_some() { Focus::Keyboard } else { Focus::Input };
    }

    pub fn note(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::Console,
            text: text.into(),
        });
    }

    /// Takes the typed line, leaving the input empty.
    pub fn take_input(&mut self) -> String {
        self.cursor_position = 0;
        std::mem::take(&mut self.input)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            let at = self.byte_offset(self.cursor_position - 1);
            self.input.remove(at);
            self.cursor_position -= 1;
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            let at = self.byte_offset(self.cursor_position);
            self.input.remove(at);
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.input.chars().count();
        self.cursor_position = self.cursor_position.saturating_add_signed(delta).min(len);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if self.keyboard.is_some() => Focus::Keyboard,
            _ => Focus::Input,
        };
    }

    /// Moves the keyboard highlight, clamping to the rows and their lengths.
    pub fn move_selection(&mut self, rows_delta: isize, cols_delta: isize) {
        let rows = self.button_rows();
        if rows.is_empty() {
            return;
        }
        let (row, col) = self.selected_button;
        let row = row.saturating_add_signed(rows_delta).min(rows.len() - 1);
        let width = rows[row].len().max(1);
        let col = col.saturating_add_signed(cols_delta).min(width - 1);
        self.selected_button = (row, col);
    }

    pub fn selected(&self) -> Option<Button> {
        let (row, col) = self.selected_button;
        self.button_rows().get(row).and_then(|r| r.get(col)).cloned()
    }

    /// Presses the highlighted button.
    pub fn press_selected(&mut self) {
        if let Some(button) = self.selected() {
            self.send(Inbound::Button(button.tag), format!("[{}]", button.label));
        }
    }

    pub fn button_rows(&self) -> Vec<Vec<Button>> {
        self.keyboard.as_ref().map(Keyboard::rows).unwrap_or_default()
    }

    /// First button that does something, so calendars open on a day cell.
    fn first_selectable(&self) -> (usize, usize) {
        self.button_rows()
            .iter()
            .enumerate()
            .find_map(|(r, row)| {
                row.iter()
                    .position(|b| b.tag != crate::domain::IGNORE_TAG)
                    .map(|c| (r, c))
            })
            .unwrap_or((0, 0))
    }
}
