use std::fmt;

use serde::{Deserialize, Serialize};

/// A system power transition the system timer slot can be armed with.
///
/// Resolved once at arm time; the engine never re-interprets a string
/// action key at fire time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemAction {
    Shutdown,
    Restart,
    Sleep,
}

impl fmt::Display for SystemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Shutdown => "shutdown",
            Self::Restart => "restart",
            Self::Sleep => "sleep",
        };
        f.write_str(s)
    }
}

/// Outcome of a terminate request.
///
/// `AlreadyGone` is success-equivalent: the intended end state (process
/// not running) already holds, so chained actions still proceed.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminateOutcome {
    /// Termination was requested and accepted by the OS.
    Terminated,
    /// No process with that pid exists anymore.
    AlreadyGone,
    /// The OS rejected the request (permission denied, etc.).
    Failed(String),
}

/// Outcome of a power transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The transition was requested and accepted by the OS.
    Requested,
    /// The OS rejected the request.
    Failed(String),
}

/// OS capabilities the timer engine fires into.
///
/// Each method is a thin, single-attempt call; failures are surfaced,
/// never retried at this layer. The platform crate provides the real
/// implementation, tests substitute a recording mock.
pub trait ActionExecutor {
    /// Requests termination of the process with the given pid.
    fn terminate(&mut self, pid: u32) -> TerminateOutcome;

    /// Requests a system shutdown.
    fn shutdown(&mut self) -> ActionOutcome;

    /// Requests a system restart.
    fn restart(&mut self) -> ActionOutcome;

    /// Requests system sleep.
    fn sleep(&mut self) -> ActionOutcome;
}
