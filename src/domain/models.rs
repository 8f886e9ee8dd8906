use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::RecordError;

/// Identity of the user a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the report opens or closes a duty trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    CheckIn,
    CheckOut,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::CheckIn => "Check-in",
            Status::CheckOut => "Check-out",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Status::CheckIn => "🚀",
            Status::CheckOut => "🏁",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The steps of the reporting form, in the order they are visited.
///
/// `Status` is the entry step: choosing check-in or check-out creates the
/// session, which starts life in `Name`. There is no terminal variant; a
/// session that finishes is removed from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormState {
    Status,
    Name,
    IdNumber,
    Destination,
    PeriodStart,
    PeriodEnd,
    Agenda,
    Location,
    Photo,
    Confirmation,
}

impl FormState {
    /// Transition table: the state reached when this one accepts its input.
    ///
    /// `Confirmation` has no successor; confirming leaves the machine.
    pub fn next(self) -> Option<FormState> {
        use FormState::*;
        match self {
            Status => Some(Name),
            Name => Some(IdNumber),
            IdNumber => Some(Destination),
            Destination => Some(PeriodStart),
            PeriodStart => Some(PeriodEnd),
            PeriodEnd => Some(Agenda),
            Agenda => Some(Location),
            Location => Some(Photo),
            Photo => Some(Confirmation),
            Confirmation => None,
        }
    }

    pub fn is_calendar(self) -> bool {
        matches!(self, FormState::PeriodStart | FormState::PeriodEnd)
    }
}

/// Inclusive date range of the duty trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Display form stored with the record, e.g. `01/03/2024 - 03/03/2024 (3 days)`.
    pub fn text(&self) -> String {
        let days = self.days();
        format!(
            "{} - {} ({} {})",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y"),
            days,
            if days == 1 { "day" } else { "days" }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn map_link(&self) -> String {
        format!("https://www.google.com/maps?q={},{}", self.latitude, self.longitude)
    }
}

/// An accepted location together with the moment it was accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinates: Coordinates,
    pub captured_at: NaiveDateTime,
}

/// Metadata of an inbound image attachment, as reported by the transport.
///
/// Size and dimensions are optional because not every transport reports
/// them; a zero is treated the same as unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub reference: String,
    pub size_bytes: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub is_document: bool,
}

/// An accepted photo.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoEvidence {
    pub reference: String,
    pub captured_at: NaiveDateTime,
    pub size_bytes: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PhotoEvidence {
    pub fn resolution(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }
}

/// The in-progress report of one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub status: Status,
    pub state: FormState,
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub destination: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period: Option<Period>,
    pub agenda: Option<String>,
    pub location: Option<LocationFix>,
    pub photo: Option<PhotoEvidence>,
    /// Month currently shown by the date picker, as (year, month).
    pub calendar_month: Option<(i32, u32)>,
}

impl Session {
    /// Creates a session for `status`, already past the status step.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            state: FormState::Name,
            name: None,
            id_number: None,
            destination: None,
            period_start: None,
            period: None,
            agenda: None,
            location: None,
            photo: None,
            calendar_month: None,
        }
    }

    /// Moves to the successor of the current state. Returns the new state.
    pub fn advance(&mut self) -> FormState {
        if let Some(next) = self.state.next() {
            self.state = next;
        }
        self.state
    }

    pub fn period_text(&self) -> Option<String> {
        self.period.as_ref().map(Period::text)
    }
}

/// A finished report, in the column order of the persistence sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub timestamp: String,
    pub name: String,
    pub id_number: String,
    pub destination: String,
    pub period_text: String,
    pub agenda: String,
    pub latitude: f64,
    pub longitude: f64,
    pub map_link: String,
    pub photo_reference: String,
    pub status: String,
    #[serde(skip)]
    pub committed_at: NaiveDateTime,
}

impl Record {
    /// Builds the final record from a completed session.
    pub fn assemble(session: &Session, now: NaiveDateTime) -> Result<Self, RecordError> {
        let name = session.name.clone().ok_or(RecordError("name"))?;
        let id_number = session.id_number.clone().ok_or(RecordError("id_number"))?;
        let destination = session.destination.clone().ok_or(RecordError("destination"))?;
        let period = session.period.ok_or(RecordError("period"))?;
        let agenda = session.agenda.clone().ok_or(RecordError("agenda"))?;
        let location = session.location.ok_or(RecordError("location"))?;
        let photo = session.photo.as_ref().ok_or(RecordError("photo"))?;

        Ok(Self {
            timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            name,
            id_number,
            destination,
            period_text: period.text(),
            agenda,
            latitude: location.coordinates.latitude,
            longitude: location.coordinates.longitude,
            map_link: location.coordinates.map_link(),
            photo_reference: photo.reference.clone(),
            status: session.status.label().to_string(),
            committed_at: now,
        })
    }

    /// Markdown caption used when broadcasting the record.
    pub fn caption(&self) -> String {
        let icon = if self.status == Status::CheckIn.label() {
            Status::CheckIn.icon()
        } else {
            Status::CheckOut.icon()
        };
        format!(
            "📋 *{} DUTY REPORT*\n\n\
             {} *Status:* {}\n\
             📅 *Date:* {}\n\
             👤 *Name:* {}\n\
             🆔 *ID number:* {}\n\
             📍 *Destination:* {}\n\
             📅 *Period:* {}\n\
             📝 *Agenda:* {}\n\
             🌍 *Location:* [Open in Google Maps]({})\n\n\
             ✅ The report has been recorded.",
            self.status.to_uppercase(),
            icon,
            self.status,
            self.committed_at.format("%d/%m/%Y %H:%M"),
            self.name,
            self.id_number,
            self.destination,
            self.period_text,
            self.agenda,
            self.map_link,
        )
    }
}

/// A tappable keyboard button: the label shown and the tag sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub tag: String,
}

impl Button {
    pub fn new(label: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag: tag.into(),
        }
    }
}
