use winddown_core::SystemAction;
use winddown_core::ipc::Command;
use winddown_core::timer::parse_hours_minutes;

use super::send;

/// Arms the app timer. The daemon validates the duration and target
/// and replies with what it armed.
pub fn execute_app(pid: Option<u32>, hours: &str, minutes: &str, shutdown_after: bool) {
    let command = Command::ArmApp {
        pid,
        duration_secs: parse_hours_minutes(hours, minutes),
        shutdown_after,
    };

    let response = send::send_or_exit(&command);
    if let Some(msg) = response.message {
        println!("{msg}");
    }
}

/// Arms the system timer with a power action.
pub fn execute_system(action: SystemAction, hours: &str, minutes: &str) {
    let command = Command::ArmSystem {
        action,
        duration_secs: parse_hours_minutes(hours, minutes),
    };

    let response = send::send_or_exit(&command);
    if let Some(msg) = response.message {
        println!("{msg}");
    }
}
