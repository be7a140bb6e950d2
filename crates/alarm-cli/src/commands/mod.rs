pub mod alarm;
pub mod config;
pub mod demo;

use alarm_core::AlarmView;

/// Print a user's alarms the way the demo and `alarm list` show them.
pub fn print_alarms(views: &[AlarmView]) {
    if views.is_empty() {
        println!("No alarms configured.");
        return;
    }

    println!("\n--- Configured alarms ---");
    for view in views {
        println!(
            "[{}] - Time: {}, Channel: {}, Status: {}",
            view.index,
            view.alarm.time.to_rfc3339(),
            view.alarm.channel,
            view.status
        );
    }
}
