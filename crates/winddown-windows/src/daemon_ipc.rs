use std::sync::mpsc;

#[cfg(windows)]
use winddown_core::ipc::Command;

use super::daemon_types::DaemonMsg;
#[cfg(windows)]
use super::daemon_types::ResponseSender;

/// Accepts IPC connections in a loop and forwards commands to the
/// main daemon thread. Runs on a dedicated thread.
#[cfg(windows)]
pub(super) fn ipc_loop(tx: mpsc::Sender<DaemonMsg>) {
    use crate::ipc::PipeServer;

    loop {
        let server = match PipeServer::create() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to create pipe: {e}");
                return;
            }
        };

        let command = match server.accept_command() {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("Error reading command: {e}");
                continue;
            }
        };

        let (reply_tx, reply_rx): (ResponseSender, _) = mpsc::channel();
        let is_stop = matches!(command, Command::Stop);

        if tx.send(DaemonMsg::Command(command, reply_tx)).is_err() {
            return;
        }

        if let Ok(response) = reply_rx.recv() {
            let _ = server.send_response(&response);
        }

        if is_stop {
            return;
        }
    }
}

/// There is no pipe transport off Windows; the daemon runs without a
/// control surface.
#[cfg(not(windows))]
pub(super) fn ipc_loop(_tx: mpsc::Sender<DaemonMsg>) {
    eprintln!("IPC listener unavailable on this platform.");
}
