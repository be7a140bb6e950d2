//! Alarm service: the orchestration layer.
//!
//! Ties the credential check, the alarm store and a notifier together. The
//! service has no internal thread -- the caller drives polling, either one
//! step at a time with `poll_once()` or through the fixed-count
//! `run_polling()` loop.
//!
//! ## Alarm lifecycle
//!
//! ```text
//! Scheduled -> Notified
//! Scheduled | Notified -> Deleted
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::alarm::{Alarm, AlarmStatus, Channel};
use crate::auth::{CredentialCheck, Session};
use crate::error::{AuthError, Result, StoreError};
use crate::notify::{Notification, Notifier};
use crate::storage::{AlarmStore, Config};

/// Message used when none is configured.
pub const DEFAULT_MESSAGE: &str = "Your alarm went off!";

/// One row of a user's alarm listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmView {
    /// Position among the user's alarms; the index `delete` expects.
    pub index: usize,
    pub alarm: Alarm,
    pub status: AlarmStatus,
}

/// Outcome of one polling pass.
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    pub at: DateTime<Utc>,
    /// Alarms notified during this pass, already flagged.
    pub notified: Vec<Alarm>,
}

impl PollReport {
    /// True when nothing was due.
    pub fn is_idle(&self) -> bool {
        self.notified.is_empty()
    }
}

pub struct AlarmService<N: Notifier> {
    auth: CredentialCheck,
    store: AlarmStore,
    notifier: N,
    message: String,
}

impl<N: Notifier> AlarmService<N> {
    pub fn new(store: AlarmStore, notifier: N) -> Self {
        Self {
            auth: CredentialCheck::default(),
            store,
            notifier,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Open the configured store and apply the configured password and message.
    ///
    /// # Errors
    /// Fails if the alarm file cannot be created or parsed.
    pub fn from_config(config: &Config, notifier: N) -> Result<Self> {
        let store = AlarmStore::open(&config.store_path)?;
        Ok(Self::new(store, notifier)
            .with_credential_check(CredentialCheck::new(config.expected_password.clone()))
            .with_message(config.message_template.clone()))
    }

    pub fn with_credential_check(mut self, auth: CredentialCheck) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.auth.authenticate(username, password)
    }

    /// Schedule an alarm `offset_secs` from now for the session user.
    pub fn schedule(&mut self, session: &Session, offset_secs: i64, channel: Channel) -> Result<Alarm> {
        self.schedule_at(session, offset_secs, channel, Utc::now())
    }

    /// Like [`schedule`](Self::schedule), relative to an explicit `now`.
    pub fn schedule_at(
        &mut self,
        session: &Session,
        offset_secs: i64,
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Result<Alarm> {
        let alarm = Alarm::new(&session.username, now, offset_secs, channel, &self.message)?;
        Ok(self.store.add(&session.username, alarm)?)
    }

    pub fn poll_once(&mut self) -> Result<PollReport> {
        self.poll_at(Utc::now())
    }

    /// Notify and flag every alarm due at `now`.
    pub fn poll_at(&mut self, now: DateTime<Utc>) -> Result<PollReport> {
        let due = self.store.due_alarms(now);
        if due.is_empty() {
            tracing::debug!(at = %now, "no due alarms");
        }

        let mut notified = Vec::with_capacity(due.len());
        for mut alarm in due {
            tracing::debug!(id = %alarm.id, notifier = self.notifier.name(), "alarm due");
            self.notifier.notify(&Notification::from(&alarm));
            self.store.mark_notified(alarm.id)?;
            alarm.notified = true;
            notified.push(alarm);
        }

        Ok(PollReport { at: now, notified })
    }

    /// Poll `iterations` times, sleeping `interval` between passes.
    ///
    /// `on_report` sees each pass with its zero-based iteration number.
    pub fn run_polling<F>(&mut self, iterations: u32, interval: Duration, mut on_report: F) -> Result<()>
    where
        F: FnMut(u32, &PollReport),
    {
        for i in 0..iterations {
            let report = self.poll_once()?;
            on_report(i, &report);
            if i + 1 < iterations && !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        Ok(())
    }

    /// The user's alarms in store order, with display status.
    pub fn list_for_user(&self, username: &str) -> Vec<AlarmView> {
        self.store
            .alarms_for_user(username)
            .into_iter()
            .enumerate()
            .map(|(index, alarm)| AlarmView {
                index,
                alarm: alarm.clone(),
                status: alarm.status(),
            })
            .collect()
    }

    /// Delete the session user's `index`-th alarm.
    pub fn delete(&mut self, session: &Session, index: usize) -> Result<Alarm> {
        Ok(self.store.delete(&session.username, index)?)
    }

    /// Delete one of the session user's alarms by id.
    ///
    /// Alarms owned by someone else are reported as not found.
    pub fn delete_by_id(&mut self, session: &Session, id: Uuid) -> Result<Alarm> {
        let owned = self
            .store
            .get(id)
            .is_some_and(|alarm| alarm.username == session.username);
        if !owned {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(self.store.delete_by_id(id)?)
    }

    pub fn store(&self) -> &AlarmStore {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
