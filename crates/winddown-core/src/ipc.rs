use serde::{Deserialize, Serialize};

use crate::SystemAction;

/// The named pipe path used for IPC between CLI and daemon.
pub const PIPE_NAME: &str = r"\\.\pipe\winddown";

/// A command sent from the CLI to the daemon.
///
/// These are serialized as JSON and sent over the named pipe.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    /// Request the daemon to stop.
    Stop,
    /// Request the daemon's current status (slots + selection).
    Status,
    /// Request the cached process list.
    List,
    /// Request an immediate re-poll of the process list.
    Refresh,
    /// Select a process from the cached list.
    Select { pid: u32 },
    /// Arm the app timer. Without a pid, the current selection is used.
    ArmApp {
        pid: Option<u32>,
        duration_secs: u64,
        shutdown_after: bool,
    },
    /// Arm the system timer with a power action.
    ArmSystem {
        action: SystemAction,
        duration_secs: u64,
    },
    /// Cancel the app timer countdown.
    CancelApp,
    /// Cancel the system timer countdown.
    CancelSystem,
}

/// A response sent from the daemon back to the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Whether the command succeeded.
    pub status: ResponseStatus,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Optional structured payload (process list, status report).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Status of a daemon response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

impl Response {
    /// Creates a successful response with no message.
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
            data: None,
        }
    }

    /// Creates a successful response with a message.
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Creates a successful response carrying a payload.
    pub fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
            data: Some(data),
        }
    }

    /// Creates an error response with a cause.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// One timer slot as reported over IPC.
#[derive(Debug, Serialize, Deserialize)]
pub struct SlotReport {
    /// "idle", "armed", "fired", "cancelled", or "failed: <cause>".
    pub status: String,
    pub remaining_seconds: u64,
    /// Display name of the armed target (app slot, while armed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Armed power action (system slot, while armed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// The currently selected process, as reported over IPC.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionReport {
    pub pid: u32,
    pub name: String,
}

/// Full daemon status: both slots, the selection, and list size.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusReport {
    pub app: SlotReport,
    pub system: SlotReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectionReport>,
    pub process_count: usize,
}
