use std::sync::mpsc;

use winddown_core::ipc::{Command, Response};

/// Internal message type for the main daemon thread.
pub(super) enum DaemonMsg {
    /// 1-second tick driving both countdowns and the fallback poll.
    Tick,
    /// The environment watcher saw the set of windows change.
    EnvironmentChanged,
    /// A CLI command with a callback to send the response.
    Command(Command, ResponseSender),
}

/// Sends a response back to the IPC thread for the connected client.
pub(super) type ResponseSender = mpsc::Sender<Response>;
