use winddown_core::ipc::{Command, Response, ResponseStatus};

/// Sends a command to the running daemon and returns the successful
/// response. Prints the failure and exits otherwise — every CLI verb
/// that talks to the daemon shares this edge.
pub fn send_or_exit(command: &Command) -> Response {
    if !winddown_windows::ipc::is_daemon_running() {
        eprintln!("Winddown is not running.");
        std::process::exit(1);
    }

    match winddown_windows::ipc::send_command(command) {
        Ok(response) if response.status == ResponseStatus::Ok => response,
        Ok(response) => {
            eprintln!(
                "Error: {}",
                response.message.unwrap_or("unknown error".into())
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to reach the daemon: {e}");
            std::process::exit(1);
        }
    }
}
