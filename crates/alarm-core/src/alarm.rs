//! Alarm records and their delivery channel.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Delivery channel for an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Push,
}

impl Channel {
    /// Get string representation for storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Push => "push",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Channel::Email),
            "sms" => Ok(Channel::Sms),
            "push" => Ok(Channel::Push),
            _ => Err(format!("Unknown channel: {s} (expected email, sms or push)")),
        }
    }
}

/// Display status, derived from the `notified` flag only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmStatus {
    Pending,
    Notified,
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmStatus::Pending => f.write_str("Pending"),
            AlarmStatus::Notified => f.write_str("Notified"),
        }
    }
}

/// A scheduled notification tied to one user.
///
/// `time` is fixed at creation. `notified` only ever goes from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    /// Files written before ids existed get a fresh one on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub username: String,
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
    pub channel: Channel,
    pub message: String,
    #[serde(default)]
    pub notified: bool,
}

impl Alarm {
    /// Build a pending alarm due `offset_secs` after `now`.
    ///
    /// # Errors
    /// Returns [`ValidationError::OffsetOutOfRange`] when the due time is not
    /// representable.
    pub fn new(
        username: impl Into<String>,
        now: DateTime<Utc>,
        offset_secs: i64,
        channel: Channel,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let time = Duration::try_seconds(offset_secs)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or(ValidationError::OffsetOutOfRange { offset_secs })?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: username.into(),
            time,
            channel,
            message: message.into(),
            notified: false,
        })
    }

    /// Due: time has passed and not yet notified.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.time <= now && !self.notified
    }

    pub fn status(&self) -> AlarmStatus {
        if self.notified {
            AlarmStatus::Notified
        } else {
            AlarmStatus::Pending
        }
    }
}

/// RFC 3339, or a timestamp without offset read as UTC
/// (e.g. `2025-10-18T10:00:05.123456`).
fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(time) = raw.parse::<DateTime<Utc>>() {
        return Ok(time);
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid alarm time '{raw}': {e}")))
}
