//! Hands a finished record to the persistence sink and the broadcast channel.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::Record;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write record: {0}")]
    Write(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel unreachable: {0}")]
    Transport(String),
    #[error("notification rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("record was not saved: {0}")]
    Persistence(#[from] SinkError),
}

/// Append-only store of finished records.
pub trait RecordSink {
    fn append(&self, record: &Record) -> Result<(), SinkError>;
}

/// Outbound channel that announces a finished record.
pub trait Notifier {
    fn notify(&self, record: &Record) -> Result<(), NotifyError>;
}

/// Result of a commit whose record was persisted.
#[derive(Debug)]
pub struct CommitReceipt {
    pub notification_error: Option<NotifyError>,
}

impl CommitReceipt {
    pub fn notified(&self) -> bool {
        self.notification_error.is_none()
    }
}

pub struct CommitPipeline {
    sink: Box<dyn RecordSink>,
    notifier: Box<dyn Notifier>,
}

impl CommitPipeline {
    pub fn new(sink: Box<dyn RecordSink>, notifier: Box<dyn Notifier>) -> Self {
        Self { sink, notifier }
    }

    /// Persists `record`, then broadcasts it.
    ///
    /// A failed broadcast does not undo the commit; it is reported on the
    /// receipt instead.
    pub fn commit(&self, record: &Record) -> Result<CommitReceipt, CommitError> {
        if let Err(err) = self.sink.append(record) {
            error!(name = %record.name, status = %record.status, error = %err, "persisting record failed");
            return Err(err.into());
        }
        info!(name = %record.name, status = %record.status, "record persisted");

        let notification_error = match self.notifier.notify(record) {
            Ok(()) => {
                info!(name = %record.name, "notification delivered");
                None
            }
            Err(err) => {
                warn!(name = %record.name, error = %err, "notification failed, record kept");
                Some(err)
            }
        };

        Ok(CommitReceipt { notification_error })
    }
}
