use crate::application::{App, AppMode, Focus, Speaker};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let keyboard_height = app.button_rows().len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(if app.keyboard.is_some() { keyboard_height } else { 0 }),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_transcript(f, app, chunks[1]);
    if app.keyboard.is_some() {
        render_keyboard(f, app, chunks[2]);
    }
    render_input_bar(f, app, chunks[3]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let step = app
        .form_state()
        .map(|s| format!("{:?}", s))
        .unwrap_or_else(|| "idle".to_string());
    let header = Paragraph::new(format!(
        "dutylog - Duty Report Console | User: {} | Chat: {} | Step: {}",
        app.user, app.chat.id, step
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for entry in &app.transcript {
        let (prefix, style) = match entry.speaker {
            Speaker::Bot => ("bot", Style::default().fg(Color::Green)),
            Speaker::User => ("you", Style::default().fg(Color::Yellow)),
            Speaker::Console => ("console", Style::default().fg(Color::DarkGray)),
        };
        for (i, text) in entry.text.lines().enumerate() {
            let label = if i == 0 { format!("{:>7} │ ", prefix) } else { "        │ ".to_string() };
            lines.push(Line::from(vec![Span::styled(label, style), Span::raw(text.to_string())]));
        }
        lines.push(Line::from(""));
    }

    // Keep the latest messages in view.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Conversation"))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(transcript, area);
}

fn render_keyboard(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Keyboard;
    let lines: Vec<Line> = app
        .button_rows()
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(c, button)| {
                    let style = if focused && (r, c) == app.selected_button {
                        Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
                    } else if button.tag == crate::domain::IGNORE_TAG {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    Span::styled(format!("[{:^4}]", button.label), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let border = if focused { Color::LightBlue } else { Color::Gray };
    let keyboard = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("Buttons"),
    );
    f.render_widget(keyboard, area);
}

fn render_input_bar(f: &mut Frame, app: &App, area: Rect) {
    let (title, text, style) = match (&app.status_message, app.focus) {
        (Some(status), _) => ("Status", format!("{} | {}", app.input, status), Style::default().fg(Color::Red)),
        (None, Focus::Input) => ("Message (Enter: send | Tab: buttons | F1: help)", app.input.clone(), Style::default().fg(Color::Green)),
        (None, Focus::Keyboard) => (
            "Buttons (arrows: move | Enter: press | Tab: type | Ctrl+Q: quit)",
            app.input.clone(),
            Style::default(),
        ),
    };

    let input = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(style);
    f.render_widget(input, area);

    if app.focus == Focus::Input && matches!(app.mode, AppMode::Chat) {
        f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("dutylog Console Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"DUTYLOG CONSOLE

The console stands in for the chat app: whatever you type is sent to the
report bot as one message, and its replies appear in the conversation.

=== COMMANDS ===
/start                          Show the main menu
/cancel                         Abandon the current report
/reset                          Clear your data and start over
/getchatid                      Show the id of this chat
/location <lat> <lon>           Share a live location
/photo <ref> <bytes> [<w> <h>]  Send a camera photo
/file <ref> <bytes> [<w> <h>]   Send an image as a file (rejected)

Anything else is sent as a plain text message.

=== REPORT STEPS ===
1. Check-in or check-out
2. Full name, in title case
3. ID number, 8 to 20 digits
4. Trip destination
5. Trip start and end dates from the calendar
6. Today's agenda
7. Live location, precise to 4 decimals
8. Camera photo, within 5 minutes of the location
9. Review, then confirm or reset

=== KEYS ===
Enter           Send the message, or press the highlighted button
Tab             Switch between typing and the buttons
Arrow keys      Move between buttons
Esc             Clear the line, or leave the buttons
F1              Show or close this help
Ctrl+C/Ctrl+Q   Quit

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/q        Close this help window"#
}
