//! Collaborator doubles shared by the application tests.

use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::clock::Clock;
use super::commit::{Notifier, NotifyError, RecordSink, SinkError};
use crate::domain::Record;

#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }
}

impl RecordSink for RecordingSink {
    fn append(&self, record: &Record) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct FailingSink;

impl RecordSink for FailingSink {
    fn append(&self, _record: &Record) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("sheet offline".to_string()))
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    records: Arc<Mutex<Vec<Record>>>,
}

impl RecordingNotifier {
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, record: &Record) -> Result<(), NotifyError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _record: &Record) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected("chat not found".to_string()))
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

pub fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(8, 30, 0).unwrap()
}

pub fn sample_record() -> Record {
    Record {
        timestamp: "2024-03-01 08:30:00".to_string(),
        name: "Budi Santoso".to_string(),
        id_number: "123456789012".to_string(),
        destination: "Makassar".to_string(),
        period_text: "01/03/2024 - 03/03/2024 (3 days)".to_string(),
        agenda: "Site audit".to_string(),
        latitude: -5.1477,
        longitude: 119.4327,
        map_link: "https://www.google.com/maps?q=-5.1477,119.4327".to_string(),
        photo_reference: "photo-1".to_string(),
        status: "Check-in".to_string(),
        committed_at: morning(),
    }
}
