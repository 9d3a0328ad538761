use winddown_core::ipc::Command;

use super::send;

/// Selects the process the app timer targets by default.
pub fn execute(pid: u32) {
    let response = send::send_or_exit(&Command::Select { pid });
    if let Some(msg) = response.message {
        println!("{msg}");
    }
}
