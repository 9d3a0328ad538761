use winddown_core::ipc::ResponseStatus;

pub fn execute() {
    // Try graceful shutdown via IPC first.
    if winddown_windows::ipc::is_daemon_running() {
        let command = winddown_core::Command::Stop;
        match winddown_windows::ipc::send_command(&command) {
            Ok(response) if response.status == ResponseStatus::Ok => {
                println!("Winddown stopped. {}", response.message.unwrap_or_default());
                let _ = winddown_core::pid::remove_pid_file();
                return;
            }
            Ok(response) => {
                eprintln!(
                    "Error: {}",
                    response.message.unwrap_or("unknown error".into())
                );
                return;
            }
            Err(e) => eprintln!("IPC failed: {e}"),
        }
    }

    // Fallback: the IPC pipe is gone but the process may still be
    // alive (e.g. the IPC thread crashed). Check the PID file.
    match winddown_core::pid::read_pid_file() {
        Ok(Some(pid)) if winddown_windows::process::is_process_alive(pid) => {
            if winddown_windows::process::kill_process(pid) {
                let _ = winddown_core::pid::remove_pid_file();
                println!("Winddown stopped (killed PID {pid}).");
            } else {
                eprintln!("Failed to kill process {pid}.");
                std::process::exit(1);
            }
        }
        _ => {
            println!("Winddown is not running.");
        }
    }
}
