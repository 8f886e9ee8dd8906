use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::config::NotificationConfig;
use crate::application::{Notifier, NotifyError};
use crate::domain::Record;

#[derive(Debug, Serialize, PartialEq)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: String,
    parse_mode: &'static str,
}

/// Posts each committed record to a group chat through the bot API.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_base: &str, token: &str, chat_id: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/bot{}/sendPhoto", api_base.trim_end_matches('/'), token),
            chat_id: chat_id.to_string(),
        })
    }

    fn payload<'a>(&'a self, record: &'a Record) -> SendPhoto<'a> {
        SendPhoto {
            chat_id: &self.chat_id,
            photo: &record.photo_reference,
            caption: record.caption(),
            parse_mode: "Markdown",
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, record: &Record) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.payload(record))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Value = response.json().unwrap_or(Value::Null);
        debug!(status = %status, "sendPhoto answered");
        check_reply(status.is_success(), &body)
    }
}

/// A reply counts as delivered only with a success status and `"ok": true`.
fn check_reply(success: bool, body: &Value) -> Result<(), NotifyError> {
    let ok = body.get("ok").and_then(Value::as_bool).unwrap_or(false);
    if success && ok {
        return Ok(());
    }
    let description = body
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("no description")
        .to_string();
    Err(NotifyError::Rejected(description))
}

/// Stand-in used when no bot credentials are configured.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, record: &Record) -> Result<(), NotifyError> {
        info!(name = %record.name, status = %record.status, "notification disabled, record logged only");
        Ok(())
    }
}

/// Picks the bot notifier when credentials are present.
pub fn build_notifier(config: &NotificationConfig) -> Result<Box<dyn Notifier>, NotifyError> {
    match config.credentials() {
        Some((token, chat_id)) => Ok(Box::new(TelegramNotifier::new(
            &config.api_base,
            token,
            chat_id,
            Duration::from_secs(config.timeout_secs),
        )?)),
        None => Ok(Box::new(LogNotifier)),
    }
}
