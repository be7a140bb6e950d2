//! Alarm management commands for CLI.

use std::time::Duration;

use alarm_core::storage::Config;
use alarm_core::{
    AlarmService, Channel, ConsoleNotifier, MemoryNotifier, Notifier, PollReport, Session,
};
use clap::{Args, Subcommand};
use uuid::Uuid;

/// Credentials; missing values fall back to the configured demo user.
#[derive(Args)]
pub struct Credentials {
    /// Username
    #[arg(long)]
    user: Option<String>,
    /// Password
    #[arg(long)]
    password: Option<String>,
}

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Schedule an alarm relative to now
    Schedule {
        #[command(flatten)]
        credentials: Credentials,
        /// Seconds from now until the alarm is due
        #[arg(long, allow_negative_numbers = true)]
        offset: i64,
        /// Delivery channel: email, sms or push
        #[arg(long, default_value = "email")]
        channel: Channel,
    },
    /// List the user's alarms
    List {
        #[command(flatten)]
        credentials: Credentials,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one of the user's alarms
    Delete {
        #[command(flatten)]
        credentials: Credentials,
        /// Position in the user's alarm list
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        index: Option<usize>,
        /// Alarm ID
        #[arg(long)]
        id: Option<Uuid>,
    },
    /// Notify due alarms
    Poll {
        #[command(flatten)]
        credentials: Credentials,
        /// Number of passes (default: from configuration)
        #[arg(long)]
        iterations: Option<u32>,
        /// Pause between passes in milliseconds (default: from configuration)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Print one JSON report per pass instead of the console transcript
        #[arg(long)]
        json: bool,
    },
}

/// Authenticate, printing progress unless `quiet` (JSON output).
fn login<N: Notifier>(
    service: &AlarmService<N>,
    credentials: Credentials,
    config: &Config,
    quiet: bool,
) -> Result<Session, Box<dyn std::error::Error>> {
    let user = credentials.user.unwrap_or_else(|| config.demo.username.clone());
    let password = credentials
        .password
        .unwrap_or_else(|| config.demo.password.clone());

    if !quiet {
        println!("Authenticating user '{user}'...");
    }
    match service.authenticate(&user, &password) {
        Ok(session) => {
            if !quiet {
                println!("Authentication succeeded for '{user}'.");
            }
            Ok(session)
        }
        Err(e) => {
            if !quiet {
                println!("Authentication error: wrong password for '{user}'");
            }
            Err(e.into())
        }
    }
}

fn poll<N: Notifier>(
    mut service: AlarmService<N>,
    credentials: Credentials,
    config: &Config,
    iterations: u32,
    interval: Duration,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Polling covers every user; logging in only gates the command.
    login(&service, credentials, config, json)?;

    let mut encode_failure = None;
    service.run_polling(iterations, interval, |_, report: &PollReport| {
        if json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    encode_failure.get_or_insert(e);
                }
            }
        } else if report.is_idle() {
            println!("No active alarms to notify.");
        }
    })?;

    match encode_failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

pub fn run(action: AlarmAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AlarmAction::Schedule {
            credentials,
            offset,
            channel,
        } => {
            let mut service = AlarmService::from_config(config, ConsoleNotifier)?;
            let session = login(&service, credentials, config, false)?;
            let alarm = service.schedule(&session, offset, channel)?;
            println!(
                "Alarm scheduled: {} at {} via {}",
                alarm.id,
                alarm.time.to_rfc3339(),
                alarm.channel
            );
        }
        AlarmAction::List { credentials, json } => {
            let service = AlarmService::from_config(config, ConsoleNotifier)?;
            let session = login(&service, credentials, config, json)?;
            let views = service.list_for_user(&session.username);
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                super::print_alarms(&views);
            }
        }
        AlarmAction::Delete {
            credentials,
            index,
            id,
        } => {
            let mut service = AlarmService::from_config(config, ConsoleNotifier)?;
            let session = login(&service, credentials, config, false)?;
            let removed = match (id, index) {
                (Some(id), _) => service.delete_by_id(&session, id)?,
                (None, Some(index)) => service.delete(&session, index)?,
                (None, None) => return Err("an index or --id is required".into()),
            };
            println!("Alarm deleted: {}", removed.id);
        }
        AlarmAction::Poll {
            credentials,
            iterations,
            interval_ms,
            json,
        } => {
            let iterations = iterations.unwrap_or(config.demo.poll_iterations);
            let interval = Duration::from_millis(interval_ms.unwrap_or(config.demo.poll_interval_ms));
            // JSON output keeps deliveries off stdout.
            if json {
                let service = AlarmService::from_config(config, MemoryNotifier::new())?;
                poll(service, credentials, config, iterations, interval, true)?;
            } else {
                let service = AlarmService::from_config(config, ConsoleNotifier)?;
                poll(service, credentials, config, iterations, interval, false)?;
            }
        }
    }

    Ok(())
}
