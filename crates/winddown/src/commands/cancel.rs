use winddown_core::ipc::Command;

use super::send;

pub fn execute_app() {
    let response = send::send_or_exit(&Command::CancelApp);
    if let Some(msg) = response.message {
        println!("{msg}");
    }
}

pub fn execute_system() {
    let response = send::send_or_exit(&Command::CancelSystem);
    if let Some(msg) = response.message {
        println!("{msg}");
    }
}
