//! JSON-file backed alarm storage.
//!
//! The whole sequence is kept in memory and the backing file is rewritten
//! in full after every mutation. Mutations are applied to a copy first and
//! only committed once the write succeeded, so memory and disk never
//! disagree after a call returns. Single writer only: there is no locking.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::alarm::Alarm;
use crate::error::StoreError;

/// File name used when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "alarms.json";

/// Ordered alarm sequence plus its durable copy.
pub struct AlarmStore {
    path: PathBuf,
    alarms: Vec<Alarm>,
}

impl AlarmStore {
    /// Open the store at `path`, creating an empty file if none exists.
    ///
    /// Records stored without an id get one, and the file is rewritten so
    /// the ids stay stable across opens.
    ///
    /// # Errors
    /// Returns [`StoreError::Corrupt`] if the file exists but is not an alarm
    /// list, or [`StoreError::Io`] if it cannot be created, read or rewritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        Self::initialize(&path)?;
        let mut store = Self {
            path,
            alarms: Vec::new(),
        };
        store.reload()?;
        tracing::debug!(
            path = %store.path.display(),
            count = store.alarms.len(),
            "alarm store opened"
        );
        Ok(store)
    }

    fn initialize(path: &Path) -> Result<(), StoreError> {
        if path.exists() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        tracing::info!(path = %path.display(), "creating empty alarm file");
        write_file(path, "[]")
    }

    /// Read the file, returning the alarms and how many were missing an id.
    fn load(path: &Path) -> Result<(Vec<Alarm>, usize), StoreError> {
        let corrupt = |source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        };

        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&content).map_err(corrupt)?;
        let missing_ids = records
            .iter()
            .filter(|record| record.get("id").is_none())
            .count();
        let alarms = serde_json::from_value(serde_json::Value::Array(records)).map_err(corrupt)?;
        Ok((alarms, missing_ids))
    }

    /// Write `alarms` to disk, then make them the in-memory sequence.
    fn commit(&mut self, alarms: Vec<Alarm>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&alarms).map_err(StoreError::Serialize)?;
        write_file(&self.path, &content)?;
        self.alarms = alarms;
        Ok(())
    }

    /// Re-read the sequence from the backing file.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let (alarms, missing_ids) = Self::load(&self.path)?;
        if missing_ids == 0 {
            self.alarms = alarms;
            return Ok(());
        }

        tracing::info!(path = %self.path.display(), missing_ids, "persisting assigned alarm ids");
        self.commit(alarms)
    }

    /// Append an alarm owned by `username`. Duplicates are allowed.
    pub fn add(&mut self, username: &str, mut alarm: Alarm) -> Result<Alarm, StoreError> {
        alarm.username = username.to_string();

        let mut next = self.alarms.clone();
        next.push(alarm.clone());
        self.commit(next)?;

        tracing::info!(
            username,
            id = %alarm.id,
            due = %alarm.time,
            channel = %alarm.channel,
            "alarm added"
        );
        Ok(alarm)
    }

    /// Alarms with `time <= now` that have not been notified, in store order.
    pub fn due_alarms(&self, now: DateTime<Utc>) -> Vec<Alarm> {
        self.alarms
            .iter()
            .filter(|alarm| alarm.is_due(now))
            .cloned()
            .collect()
    }

    /// Flag the alarm as notified. Already-notified alarms stay notified.
    pub fn mark_notified(&mut self, id: Uuid) -> Result<(), StoreError> {
        let mut next = self.alarms.clone();
        let alarm = next
            .iter_mut()
            .find(|alarm| alarm.id == id)
            .ok_or(StoreError::NotFound(id))?;
        alarm.notified = true;
        self.commit(next)
    }

    /// Delete the `index`-th alarm among `username`'s alarms.
    ///
    /// The index is resolved against the current sequence at call time.
    ///
    /// # Errors
    /// Returns [`StoreError::IndexOutOfRange`] and leaves the store untouched
    /// when the user has `index` alarms or fewer.
    pub fn delete(&mut self, username: &str, index: usize) -> Result<Alarm, StoreError> {
        let user_alarms = self.alarms_for_user(username);
        let target = user_alarms
            .get(index)
            .map(|alarm| alarm.id)
            .ok_or_else(|| StoreError::IndexOutOfRange {
                username: username.to_string(),
                index,
                len: user_alarms.len(),
            })?;

        self.delete_by_id(target)
    }

    /// Delete the alarm with the given id.
    pub fn delete_by_id(&mut self, id: Uuid) -> Result<Alarm, StoreError> {
        let position = self
            .alarms
            .iter()
            .position(|alarm| alarm.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut next = self.alarms.clone();
        let removed = next.remove(position);
        self.commit(next)?;

        tracing::info!(username = %removed.username, id = %removed.id, "alarm deleted");
        Ok(removed)
    }

    /// Find an alarm by id.
    pub fn get(&self, id: Uuid) -> Option<&Alarm> {
        self.alarms.iter().find(|alarm| alarm.id == id)
    }

    /// Every alarm, in insertion order.
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    /// The user's alarms, in insertion order.
    pub fn alarms_for_user(&self, username: &str) -> Vec<&Alarm> {
        self.alarms
            .iter()
            .filter(|alarm| alarm.username == username)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write through a sibling temp file and rename over the target.
fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| DEFAULT_STORE_FILE.into());
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, content).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}
