//! # Alarm Core Library
//!
//! Business logic for the alarm scheduling demo. The CLI binary is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Credential Check**: mock password check that opens a [`Session`]
//! - **Storage**: JSON-file alarm store rewritten on every mutation, and
//!   TOML-based configuration
//! - **Notifier**: delivery stand-ins behind the [`Notifier`] trait
//! - **Service**: [`AlarmService`] schedules, lists, deletes and polls
//!
//! Everything is single-threaded and synchronous; the caller drives polling.

pub mod alarm;
pub mod auth;
pub mod error;
pub mod notify;
pub mod service;
pub mod storage;

pub use alarm::{Alarm, AlarmStatus, Channel};
pub use auth::{CredentialCheck, Session};
pub use error::{AuthError, ConfigError, CoreError, StoreError, ValidationError};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notification, Notifier};
pub use service::{AlarmService, AlarmView, PollReport};
pub use storage::{AlarmStore, Config};
