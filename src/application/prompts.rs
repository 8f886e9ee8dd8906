//! Texts and keyboards shown to the user at each step.

use chrono::{Datelike, NaiveDate};

use super::events::{ChatInfo, Keyboard, MenuAction, Prompt};
use crate::domain::{FormState, LocationFix, MonthGrid, Period, RecordError, Session, Status};

pub fn main_menu() -> Prompt {
    Prompt::text("🤖 *Duty Report Bot*\n\nWelcome! Choose one of the options below:").with_keyboard(
        Keyboard::menu(vec![
            vec![MenuAction::StartCheckIn.button("🚀 Check-in")],
            vec![MenuAction::StartCheckOut.button("🏁 Check-out")],
            vec![MenuAction::ResetData.button("🔄 Reset data")],
            vec![MenuAction::BotInfo.button("ℹ️ Bot info")],
        ]),
    )
}

pub fn bot_info() -> Prompt {
    Prompt::text(
        "ℹ️ *About this bot*\n\n\
         Records daily check-in and check-out reports for staff on duty trips.\n\n\
         *Steps:*\n\
         • Name and ID number\n\
         • Trip destination\n\
         • Trip period\n\
         • Today's agenda\n\
         • Live location\n\
         • Activity photo from the camera\n\
         • Review before saving\n\n\
         *Commands:*\n\
         /start - show the menu\n\
         /cancel - abandon the current report\n\
         /reset - clear your data",
    )
    .with_keyboard(back_to_menu())
}

pub fn data_reset() -> Prompt {
    Prompt::text("✅ Your data has been reset.\n\nStart a new report:").with_keyboard(Keyboard::menu(vec![
        vec![MenuAction::StartCheckIn.button("🚀 New check-in")],
        vec![MenuAction::StartCheckOut.button("🏁 New check-out")],
        vec![MenuAction::BackToMenu.button("🏠 Back to menu")],
    ]))
}

pub fn reset_command() -> Prompt {
    Prompt::text("🔄 Your data has been reset.\n\nStart a new check-in:").with_keyboard(start_again("🚀 Start new check-in"))
}

pub fn cancelled() -> Prompt {
    Prompt::text("❌ Report cancelled. Your data has been cleared.").with_keyboard(start_again("🚀 Start again"))
}

pub fn no_session() -> Prompt {
    Prompt::text("There is no report in progress. Send /start to begin.")
}

pub fn chat_info(chat: &ChatInfo) -> Prompt {
    Prompt::text(format!(
        "Chat ID: `{}`\nChat type: {}\nChat title: {}",
        chat.id,
        chat.kind,
        chat.title.as_deref().unwrap_or("-")
    ))
}

pub fn started(status: Status) -> Prompt {
    Prompt::text(format!(
        "{} Let's start your daily {}.\n\n{}",
        status.icon(),
        status.label().to_lowercase(),
        instructions(FormState::Name)
    ))
}

/// The request for the input a state expects.
pub fn instructions(state: FormState) -> &'static str {
    match state {
        FormState::Status => "Choose check-in or check-out.",
        FormState::Name => "Enter your *full name*:",
        FormState::IdNumber => "Enter your *ID number*:",
        FormState::Destination => "Enter your *trip destination*:",
        FormState::PeriodStart => "📅 Choose the trip *start date*:",
        FormState::PeriodEnd => "📅 Choose the trip *end date*:",
        FormState::Agenda => "What is *today's agenda*?",
        FormState::Location => {
            "📍 Send your *live location* using 📎 (attachment) → Location.\n\
             Typed addresses are not accepted."
        }
        FormState::Photo => {
            "📸 Send a *photo of today's activity*, taken directly with the camera \
             (📎 → Camera, not from the gallery)."
        }
        FormState::Confirmation => "Review your report and confirm it, or reset to start over.",
    }
}

/// Prompt asking for the current state's input.
pub fn ask(session: &Session, today: NaiveDate) -> Prompt {
    let state = session.state;
    let mut text = String::new();
    if state == FormState::PeriodEnd {
        if let Some(start) = session.period_start {
            text.push_str(&format!("✅ Start date: *{}*\n\n", start.format("%d/%m/%Y")));
        }
    }
    text.push_str(instructions(state));

    let prompt = Prompt::text(text);
    if state.is_calendar() {
        let (year, month) = session.calendar_month.unwrap_or((today.year(), today.month()));
        let grid = MonthGrid::new(year, month).unwrap_or_else(|| MonthGrid::for_date(today));
        prompt.with_keyboard(Keyboard::Calendar(grid))
    } else {
        prompt
    }
}

/// Acknowledges an accepted field and asks for the next one.
pub fn accepted(ack: &str, session: &Session, today: NaiveDate) -> Prompt {
    let mut prompt = ask(session, today);
    prompt.text = format!("{}\n\n{}", ack, prompt.text);
    prompt
}

/// Re-issues the current prompt after a rejection.
pub fn rejected(reason: &str, session: &Session, today: NaiveDate) -> Prompt {
    if session.state == FormState::Confirmation {
        if let Ok(mut prompt) = confirmation(session) {
            prompt.text = format!("❌ {}\n\n{}", reason, prompt.text);
            return prompt;
        }
    }
    let mut prompt = ask(session, today);
    prompt.text = format!("❌ {}\n\n{}", reason, prompt.text);
    prompt
}

pub fn period_accepted(period: &Period) -> Prompt {
    Prompt::text(format!(
        "✅ *Trip period:*\n{}\n\n{}",
        period.text(),
        instructions(FormState::Agenda)
    ))
}

pub fn location_accepted(fix: &LocationFix) -> Prompt {
    Prompt::text(format!(
        "✅ *Live location received.*\n\n📍 Coordinates: {:.6}, {:.6}\n\n{}",
        fix.coordinates.latitude,
        fix.coordinates.longitude,
        instructions(FormState::Photo)
    ))
}

/// Review of every collected field, with the save and reset buttons.
pub fn confirmation(session: &Session) -> Result<Prompt, RecordError> {
    let name = session.name.as_deref().ok_or(RecordError("name"))?;
    let id_number = session.id_number.as_deref().ok_or(RecordError("id_number"))?;
    let destination = session.destination.as_deref().ok_or(RecordError("destination"))?;
    let period = session.period_text().ok_or(RecordError("period"))?;
    let agenda = session.agenda.as_deref().ok_or(RecordError("agenda"))?;
    let location = session.location.as_ref().ok_or(RecordError("location"))?;
    let photo = session.photo.as_ref().ok_or(RecordError("photo"))?;

    let status = session.status;
    let text = format!(
        "📋 *REVIEW {} REPORT*\n\n\
         {} *Status:* {}\n\
         👤 *Name:* {}\n\
         🆔 *ID number:* {}\n\
         📍 *Destination:* {}\n\
         📅 *Period:* {}\n\
         📝 *Agenda:* {}\n\
         🌍 *Location:* [Open in Maps]({})\n\n\
         📸 *Activity photo* ✅ verified from the camera",
        status.label().to_uppercase(),
        status.icon(),
        status.label(),
        name,
        id_number,
        destination,
        period,
        agenda,
        location.coordinates.map_link(),
    );

    Ok(Prompt::text(text)
        .with_photo(photo.reference.clone())
        .with_keyboard(Keyboard::menu(vec![
            vec![MenuAction::ConfirmSave.button("✅ Confirm & save")],
            vec![MenuAction::ConfirmReset.button("🔄 Reset & restart")],
        ])))
}

pub fn committed(status: Status, notified: bool) -> Prompt {
    let mut text = format!(
        "✅ *REPORT SAVED!*\n\nYour daily {} has been recorded.",
        status.label().to_lowercase()
    );
    if notified {
        text.push_str("\n📢 The group has been notified.");
    } else {
        text.push_str("\n⚠️ The report was saved, but the group notification failed.");
    }
    text.push_str("\n\nThank you!");

    Prompt::text(text).with_keyboard(Keyboard::menu(vec![
        vec![MenuAction::StartCheckIn.button("🚀 Check-in again")],
        vec![MenuAction::StartCheckOut.button("🏁 Check-out again")],
    ]))
}

pub fn not_saved() -> Prompt {
    Prompt::text("❌ Could not reach the report storage. Your data was not saved; please fill in the report again.")
        .with_keyboard(start_again("🔄 Try again"))
}

pub fn confirmation_reset() -> Prompt {
    Prompt::text("🔄 *DATA RESET!*\n\nAll data has been cleared. Start your check-in again:")
        .with_keyboard(start_again("🚀 Start new check-in"))
}

pub fn internal_error() -> Prompt {
    Prompt::text("❌ Something went wrong while processing your input. Please try again.")
}

fn back_to_menu() -> Keyboard {
    Keyboard::menu(vec![vec![MenuAction::BackToMenu.button("🏠 Back to menu")]])
}

fn start_again(label: &str) -> Keyboard {
    Keyboard::menu(vec![vec![MenuAction::StartCheckIn.button(label)]])
}
