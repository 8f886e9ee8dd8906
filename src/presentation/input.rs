use crate::application::{App, AppMode, Focus, Inbound};
use crate::domain::ImageInput;
use crossterm::event::{KeyCode, KeyModifiers};

const LOCATION_USAGE: &str = "Usage: /location <latitude> <longitude>";
const PHOTO_USAGE: &str = "Usage: /photo <reference> <size-bytes> [<width> <height>]";
const FILE_USAGE: &str = "Usage: /file <reference> <size-bytes> [<width> <height>]";

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Chat => Self::handle_chat_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_chat_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        app.status_message = None;

        match key {
            KeyCode::F(1) => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
            _ => match app.focus {
                Focus::Keyboard => Self::handle_keyboard_focus(app, key, modifiers),
                Focus::Input => Self::handle_input_focus(app, key),
            },
        }
    }

    fn handle_keyboard_focus(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Up => app.move_selection(-1, 0),
            KeyCode::Down => app.move_selection(1, 0),
            KeyCode::Left => app.move_selection(0, -1),
            KeyCode::Right => app.move_selection(0, 1),
            KeyCode::Enter => app.press_selected(),
            KeyCode::Esc => app.focus = Focus::Input,
            // Typing while on the keyboard starts a message.
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.focus = Focus::Input;
                app.insert_char(c);
            }
            _ => {}
        }
    }

    fn handle_input_focus(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => Self::submit(app),
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left => app.move_cursor(-1),
            KeyCode::Right => app.move_cursor(1),
            KeyCode::Home => app.cursor_home(),
            KeyCode::End => app.cursor_end(),
            KeyCode::Esc => {
                app.take_input();
            }
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') => {
                app.mode = AppMode::Chat;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn submit(app: &mut App) {
        let line = app.take_input();
        if line.trim().is_empty() {
            return;
        }
        match parse_line(&line) {
            Ok(event) => app.send(event, line),
            Err(usage) => {
                app.input = line;
                app.cursor_end();
                app.status_message = Some(usage);
            }
        }
    }
}

/// Turns a typed line into an inbound event.
///
/// Lines starting with a known command become that event; anything else is a
/// text message. A known command with malformed arguments yields its usage.
pub fn parse_line(line: &str) -> Result<Inbound, String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "/start" => Ok(Inbound::Start),
        "/cancel" => Ok(Inbound::Cancel),
        "/reset" => Ok(Inbound::Reset),
        "/getchatid" => Ok(Inbound::ChatInfo),
        "/location" => match args.as_slice() {
            [lat, lon] => match (lat.parse::<f64>(), lon.parse::<f64>()) {
                (Ok(latitude), Ok(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                    Ok(Inbound::Location { latitude, longitude })
                }
                _ => Err(LOCATION_USAGE.to_string()),
            },
            _ => Err(LOCATION_USAGE.to_string()),
        },
        "/photo" => parse_image(&args, false).ok_or_else(|| PHOTO_USAGE.to_string()),
        "/file" => parse_image(&args, true).ok_or_else(|| FILE_USAGE.to_string()),
        _ => Ok(Inbound::Text(line.to_string())),
    }
}

fn parse_image(args: &[&str], is_document: bool) -> Option<Inbound> {
    let (reference, size, dimensions) = match args {
        [reference, size] => (reference, size, None),
        [reference, size, width, height] => (reference, size, Some((width.parse::<u32>().ok()?, height.parse::<u32>().ok()?))),
        _ => return None,
    };
    Some(Inbound::Image(ImageInput {
        reference: reference.to_string(),
        size_bytes: Some(size.parse::<u64>().ok()?),
        width: dimensions.map(|(w, _)| w),
        height: dimensions.map(|(_, h)| h),
        is_document,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{morning, ManualClock, RecordingNotifier, RecordingSink};
    use crate::application::{ChatInfo, CommitPipeline, FormEngine, Speaker};
    use crate::domain::{FormState, UserId};

    fn app() -> App {
        let pipeline = CommitPipeline::new(Box::new(RecordingSink::default()), Box::new(RecordingNotifier::default()));
        let engine = FormEngine::new(pipeline, Box::new(ManualClock::at(morning())));
        let chat = ChatInfo {
            id: -100,
            kind: "group".to_string(),
            title: Some("Field team".to_string()),
        };
        App::new(engine, UserId(7), chat)
    }

    fn type_line(app: &mut App, line: &str) {
        for c in line.chars() {
            InputHandler::handle_key_event(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        InputHandler::handle_key_event(app, KeyCode::Enter, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("/start"), Ok(Inbound::Start));
        assert_eq!(parse_line("/cancel"), Ok(Inbound::Cancel));
        assert_eq!(parse_line("/reset"), Ok(Inbound::Reset));
        assert_eq!(parse_line("/getchatid"), Ok(Inbound::ChatInfo));
        assert_eq!(
            parse_line("/location -5.147665 119.432732"),
            Ok(Inbound::Location {
                latitude: -5.147665,
                longitude: 119.432732
            })
        );
        assert_eq!(
            parse_line("/photo cam-1 250000 1280 960"),
            Ok(Inbound::Image(ImageInput {
                reference: "cam-1".to_string(),
                size_bytes: Some(250000),
                width: Some(1280),
                height: Some(960),
                is_document: false,
            }))
        );
        assert!(matches!(
            parse_line("/file scan.jpg 250000"),
            Ok(Inbound::Image(ImageInput { is_document: true, width: None, .. }))
        ));
    }

    #[test]
    fn test_parse_text_and_unknown_commands() {
        assert_eq!(parse_line("Budi Santoso"), Ok(Inbound::Text("Budi Santoso".to_string())));
        assert_eq!(parse_line("/help me"), Ok(Inbound::Text("/help me".to_string())));
    }

    #[test]
    fn test_parse_malformed_commands() {
        assert_eq!(parse_line("/location -5.1"), Err(LOCATION_USAGE.to_string()));
        assert_eq!(parse_line("/location north east"), Err(LOCATION_USAGE.to_string()));
        assert_eq!(parse_line("/location NaN 1.0"), Err(LOCATION_USAGE.to_string()));
        assert_eq!(parse_line("/photo cam-1"), Err(PHOTO_USAGE.to_string()));
        assert_eq!(parse_line("/photo cam-1 big"), Err(PHOTO_USAGE.to_string()));
        assert_eq!(parse_line("/photo cam-1 1000 640"), Err(PHOTO_USAGE.to_string()));
        assert_eq!(parse_line("/file"), Err(FILE_USAGE.to_string()));
    }

    #[test]
    fn test_enter_submits_typed_line() {
        let mut app = app();
        type_line(&mut app, "/start");
        assert!(app.input.is_empty());
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript[0].text, "/start");
        assert_eq!(app.focus, Focus::Keyboard);

        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.form_state(), Some(FormState::Name));
        assert_eq!(app.transcript[2].text, "[🚀 Check-in]");
    }

    #[test]
    fn test_malformed_command_keeps_line_and_shows_usage() {
        let mut app = app();
        type_line(&mut app, "/location 1");
        assert_eq!(app.input, "/location 1");
        assert_eq!(app.status_message.as_deref(), Some(LOCATION_USAGE));
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn test_blank_line_is_not_sent() {
        let mut app = app();
        type_line(&mut app, "   ");
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn test_typing_on_keyboard_moves_to_input() {
        let mut app = app();
        type_line(&mut app, "/start");
        assert_eq!(app.focus, Focus::Keyboard);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('h'), KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.input, "h");
        InputHandler::handle_key_event(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::Keyboard);
    }

    #[test]
    fn test_chat_info_command() {
        let mut app = app();
        type_line(&mut app, "/getchatid");
        let reply = &app.transcript[1];
        assert_eq!(reply.speaker, Speaker::Bot);
        assert!(reply.text.contains("-100"));
        assert!(reply.text.contains("Field team"));
    }

    #[test]
    fn test_help_mode_toggle_and_scroll() {
        let mut app = app();
        InputHandler::handle_key_event(&mut app, KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(app.mode, AppMode::Help);

        InputHandler::handle_key_event(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        InputHandler::handle_key_event(&mut app, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.help_scroll, 4);

        InputHandler::handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.mode, AppMode::Chat);
    }
}
