//! The reporting form as an explicit state machine.
//!
//! [`FormEngine::handle`] takes one inbound event for one user and returns
//! the prompt to show next. Validation and transitions are synchronous; the
//! only calls that may block are the persistence and notification
//! collaborators reached from the confirmation step.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::clock::Clock;
use super::commit::CommitPipeline;
use super::events::{ChatInfo, Inbound, MenuAction, Prompt};
use super::prompts;
use super::registry::SessionRegistry;
use crate::domain::{
    validate_free_text, validate_id_number, validate_location, validate_name, validate_period_end, validate_photo,
    CalendarEvent, FormState, Record, RecordError, Session, Status, UserId, ValidationError,
};

/// Why an event did not advance the form.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The event has the wrong shape for the current step.
    #[error("{expected}")]
    Protocol { expected: &'static str },
    #[error("internal processing error: {0}")]
    Internal(String),
}

impl From<RecordError> for FormError {
    fn from(err: RecordError) -> Self {
        FormError::Internal(err.to_string())
    }
}

/// What each step accepts, shown when something else arrives.
fn expected_input(state: FormState) -> &'static str {
    match state {
        FormState::Status => "Please choose check-in or check-out from the menu.",
        FormState::Name | FormState::IdNumber | FormState::Destination | FormState::Agenda => {
            "Please answer with a text message."
        }
        FormState::PeriodStart | FormState::PeriodEnd => "Please pick a date using the calendar buttons.",
        FormState::Location => {
            "Only a live location is accepted here. Tap 📎 → Location → Send My Current Location \
             and allow location access if asked."
        }
        FormState::Photo => "Only a photo is accepted here. Tap 📎 → Camera, take the photo, then send it.",
        FormState::Confirmation => "Please use the buttons below the review.",
    }
}

/// Drives every user's report through the form, one event at a time.
///
/// # Examples
///
/// ```
/// use dutylog::application::{ChatInfo, CommitPipeline, FormEngine, Inbound, SystemClock};
/// use dutylog::domain::{FormState, UserId};
/// use dutylog::infrastructure::{CsvRecordSink, LogNotifier};
///
/// let pipeline = CommitPipeline::new(Box::new(CsvRecordSink::new("reports.csv")), Box::new(LogNotifier));
/// let mut engine = FormEngine::new(pipeline, Box::new(SystemClock));
/// let chat = ChatInfo { id: 1, kind: "private".to_string(), title: None };
///
/// let prompt = engine.handle(UserId(1), &chat, Inbound::Button("start_checkin".to_string()));
/// assert!(prompt.text.contains("full name"));
///
/// engine.handle(UserId(1), &chat, Inbound::Text("Budi Santoso".to_string()));
/// assert_eq!(engine.sessions().get(UserId(1)).map(|s| s.state), Some(FormState::IdNumber));
/// ```
pub struct FormEngine {
    sessions: SessionRegistry,
    commit: CommitPipeline,
    clock: Box<dyn Clock>,
}

impl FormEngine {
    pub fn new(commit: CommitPipeline, clock: Box<dyn Clock>) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            commit,
            clock,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Processes one event from `user` and returns the reply.
    pub fn handle(&mut self, user: UserId, chat: &ChatInfo, event: Inbound) -> Prompt {
        let now = self.clock.now();
        match event {
            Inbound::Start => prompts::main_menu(),
            Inbound::ChatInfo => prompts::chat_info(chat),
            Inbound::Cancel => {
                self.discard(user, "cancel");
                prompts::cancelled()
            }
            Inbound::Reset => {
                self.discard(user, "reset");
                prompts::reset_command()
            }
            Inbound::Button(tag) => match MenuAction::parse(&tag) {
                Some(MenuAction::StartCheckIn) => self.start(user, Status::CheckIn),
                Some(MenuAction::StartCheckOut) => self.start(user, Status::CheckOut),
                Some(MenuAction::ResetData) => {
                    self.discard(user, "reset button");
                    prompts::data_reset()
                }
                Some(MenuAction::BotInfo) => prompts::bot_info(),
                Some(MenuAction::BackToMenu) => prompts::main_menu(),
                _ => self.on_session_event(user, Inbound::Button(tag), now),
            },
            other => self.on_session_event(user, other, now),
        }
    }

    fn start(&mut self, user: UserId, status: Status) -> Prompt {
        let session = self.sessions.create(user, status);
        info!(user = %user, status = %session.status, "report started");
        prompts::started(status)
    }

    fn discard(&mut self, user: UserId, reason: &str) {
        if let Some(session) = self.sessions.remove(user) {
            info!(user = %user, state = ?session.state, reason, "session discarded");
        }
    }

    fn on_session_event(&mut self, user: UserId, event: Inbound, now: NaiveDateTime) -> Prompt {
        let state = match self.sessions.get(user) {
            Some(session) => session.state,
            None => return prompts::no_session(),
        };
        if state == FormState::Confirmation {
            return self.on_confirmation(user, event, now);
        }

        let Some(session) = self.sessions.get_mut(user) else {
            return prompts::no_session();
        };
        let today = now.date();
        match step(session, event, now) {
            Ok(prompt) => {
                if session.state != state {
                    debug!(user = %user, from = ?state, to = ?session.state, "form advanced");
                }
                prompt
            }
            Err(FormError::Internal(detail)) => {
                error!(user = %user, state = ?state, detail = %detail, "failed to process input");
                prompts::internal_error()
            }
            Err(err) => {
                debug!(user = %user, state = ?state, reason = %err, "input rejected");
                prompts::rejected(&err.to_string(), session, today)
            }
        }
    }

    fn on_confirmation(&mut self, user: UserId, event: Inbound, now: NaiveDateTime) -> Prompt {
        let action = match &event {
            Inbound::Button(tag) => MenuAction::parse(tag),
            _ => None,
        };
        match action {
            Some(MenuAction::ConfirmSave) => self.commit_session(user, now),
            Some(MenuAction::ConfirmReset) => {
                self.discard(user, "reset after review");
                prompts::confirmation_reset()
            }
            _ => {
                let Some(session) = self.sessions.get(user) else {
                    return prompts::no_session();
                };
                prompts::rejected(expected_input(FormState::Confirmation), session, now.date())
            }
        }
    }

    fn commit_session(&mut self, user: UserId, now: NaiveDateTime) -> Prompt {
        let (record, status) = match self.sessions.get(user) {
            Some(session) => match Record::assemble(session, now) {
                Ok(record) => (record, session.status),
                Err(err) => {
                    error!(user = %user, error = %err, "cannot assemble record");
                    return prompts::internal_error();
                }
            },
            None => return prompts::no_session(),
        };

        // The session goes away whether or not the sink accepts the record.
        self.sessions.remove(user);
        match self.commit.commit(&record) {
            Ok(receipt) => {
                info!(user = %user, notified = receipt.notified(), "report committed");
                prompts::committed(status, receipt.notified())
            }
            Err(err) => {
                warn!(user = %user, error = %err, "report dropped after storage failure");
                prompts::not_saved()
            }
        }
    }
}

/// Applies one event to a session that is not yet under review.
///
/// Fields are written only once their validator accepts; any error leaves
/// the session exactly as it was.
fn step(session: &mut Session, event: Inbound, now: NaiveDateTime) -> Result<Prompt, FormError> {
    let today = now.date();
    match (session.state, event) {
        (FormState::Name, Inbound::Text(text)) => {
            session.name = Some(validate_name(&text)?);
            session.advance();
            Ok(prompts::accepted("✅ Name accepted.", session, today))
        }
        (FormState::IdNumber, Inbound::Text(text)) => {
            session.id_number = Some(validate_id_number(&text)?);
            session.advance();
            Ok(prompts::accepted("✅ ID number accepted.", session, today))
        }
        (FormState::Destination, Inbound::Text(text)) => {
            session.destination = Some(validate_free_text(&text)?);
            session.calendar_month = Some((today.year(), today.month()));
            session.advance();
            Ok(prompts::ask(session, today))
        }
        (FormState::PeriodStart | FormState::PeriodEnd, Inbound::Button(tag)) => on_calendar(session, &tag, today),
        (FormState::Agenda, Inbound::Text(text)) => {
            session.agenda = Some(validate_free_text(&text)?);
            session.advance();
            Ok(prompts::ask(session, today))
        }
        (FormState::Location, Inbound::Location { latitude, longitude }) => {
            let fix = validate_location(latitude, longitude, now)?;
            session.location = Some(fix);
            session.advance();
            Ok(prompts::location_accepted(&fix))
        }
        (FormState::Photo, Inbound::Image(image)) => {
            let location_at = session
                .location
                .map(|fix| fix.captured_at)
                .ok_or_else(|| FormError::Internal("photo received before a location".to_string()))?;
            let photo = validate_photo(&image, location_at, now)?;

            let mut reviewed = session.clone();
            reviewed.photo = Some(photo);
            reviewed.advance();
            let prompt = prompts::confirmation(&reviewed)?;
            *session = reviewed;
            Ok(prompt)
        }
        (state, _) => Err(FormError::Protocol {
            expected: expected_input(state),
        }),
    }
}

/// The two-click date range: the first accepted date opens the range, the
/// second closes it. Navigation only changes the month on display.
fn on_calendar(session: &mut Session, tag: &str, today: NaiveDate) -> Result<Prompt, FormError> {
    let event = CalendarEvent::parse(tag).ok_or(FormError::Protocol {
        expected: expected_input(session.state),
    })?;

    let picked = match event {
        CalendarEvent::Navigate { year, month } => {
            session.calendar_month = Some((year, month));
            return Ok(prompts::ask(session, today));
        }
        CalendarEvent::Ignore => return Ok(prompts::ask(session, today)),
        CalendarEvent::Today => today,
        CalendarEvent::Select(date) => date,
    };

    match session.state {
        FormState::PeriodStart => {
            session.period_start = Some(picked);
            session.calendar_month = Some((picked.year(), picked.month()));
            session.advance();
            Ok(prompts::ask(session, today))
        }
        FormState::PeriodEnd => {
            let start = session
                .period_start
                .ok_or_else(|| FormError::Internal("end date chosen without a start date".to_string()))?;
            let period = validate_period_end(start, picked)?;
            session.period = Some(period);
            session.calendar_month = None;
            session.advance();
            Ok(prompts::period_accepted(&period))
        }
        state => Err(FormError::Protocol {
            expected: expected_input(state),
        }),
    }
}
