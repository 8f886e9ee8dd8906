//! Presentation layer: the terminal console that stands in for the chat app.
//!
//! Renders the conversation with ratatui and turns key presses and typed
//! commands into inbound events.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
