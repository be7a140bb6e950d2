//! Scripted demo: authenticate, schedule, list, delete one, then poll.

use std::time::Duration;

use alarm_core::storage::Config;
use alarm_core::{AlarmService, ConsoleNotifier};

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let demo = &config.demo;
    let mut service = AlarmService::from_config(config, ConsoleNotifier)?;

    println!("\n--- Alarm Management System ---");

    println!("\nAuthenticating user '{}'...", demo.username);
    let session = match service.authenticate(&demo.username, &demo.password) {
        Ok(session) => session,
        Err(e) => {
            println!("Authentication error: wrong password for '{}'", demo.username);
            println!("Authentication failed. Ending session.");
            return Err(e.into());
        }
    };
    println!("Authentication succeeded for '{}'.", session.username);

    println!("\n--- Scheduling new alarms ---");
    for planned in &demo.alarms {
        let alarm = service.schedule(&session, planned.offset_secs, planned.channel)?;
        println!(
            "Alarm scheduled for user '{}': {} via {} ({}s)",
            alarm.username,
            alarm.time.to_rfc3339(),
            alarm.channel,
            planned.offset_secs
        );
    }

    super::print_alarms(&service.list_for_user(&session.username));

    println!("\n--- Deleting an alarm ---");
    match service.delete(&session, demo.delete_index) {
        Ok(removed) => println!(
            "Alarm deleted: {} via {}",
            removed.time.to_rfc3339(),
            removed.channel
        ),
        Err(e) => println!("Invalid alarm index: {e}"),
    }

    println!("\n--- Monitoring active alarms ---");
    service.run_polling(
        demo.poll_iterations,
        Duration::from_millis(demo.poll_interval_ms),
        |_, report| {
            if report.is_idle() {
                println!("No active alarms to notify.");
            }
        },
    )?;

    println!("\n--- End of simulation ---");
    Ok(())
}
