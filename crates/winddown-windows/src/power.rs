//! System power transitions and the OS-backed action executor.
//!
//! Each transition is one external command with a success/failure
//! outcome — no retries, no elevation handling beyond surfacing the
//! OS's refusal.

#[cfg(any(windows, target_os = "linux"))]
use std::process::Command;

use winddown_core::{ActionExecutor, ActionOutcome, TerminateOutcome};

use crate::process;

/// Requests an immediate system shutdown.
pub fn request_shutdown() -> ActionOutcome {
    #[cfg(windows)]
    {
        run_command("shutdown", &["/s", "/t", "0"])
    }
    #[cfg(target_os = "linux")]
    {
        run_command("systemctl", &["poweroff"])
    }
    #[cfg(not(any(windows, target_os = "linux")))]
    {
        unsupported()
    }
}

/// Requests an immediate system restart.
pub fn request_restart() -> ActionOutcome {
    #[cfg(windows)]
    {
        run_command("shutdown", &["/r", "/t", "0"])
    }
    #[cfg(target_os = "linux")]
    {
        run_command("systemctl", &["reboot"])
    }
    #[cfg(not(any(windows, target_os = "linux")))]
    {
        unsupported()
    }
}

/// Requests system sleep.
pub fn request_sleep() -> ActionOutcome {
    #[cfg(windows)]
    {
        run_command("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"])
    }
    #[cfg(target_os = "linux")]
    {
        run_command("systemctl", &["suspend"])
    }
    #[cfg(not(any(windows, target_os = "linux")))]
    {
        unsupported()
    }
}

/// Runs the transition command and maps its exit into an outcome.
#[cfg(any(windows, target_os = "linux"))]
fn run_command(program: &str, args: &[&str]) -> ActionOutcome {
    match Command::new(program).args(args).status() {
        Ok(status) if status.success() => ActionOutcome::Requested,
        Ok(status) => ActionOutcome::Failed(format!("{program} exited with {status}")),
        Err(e) => ActionOutcome::Failed(format!("{program}: {e}")),
    }
}

#[cfg(not(any(windows, target_os = "linux")))]
fn unsupported() -> ActionOutcome {
    ActionOutcome::Failed("power transitions are not supported on this platform".into())
}

/// The timer engine's executor, backed by the real OS capabilities.
pub struct OsActionExecutor;

impl ActionExecutor for OsActionExecutor {
    fn terminate(&mut self, pid: u32) -> TerminateOutcome {
        process::terminate(pid)
    }

    fn shutdown(&mut self) -> ActionOutcome {
        request_shutdown()
    }

    fn restart(&mut self) -> ActionOutcome {
        request_restart()
    }

    fn sleep(&mut self) -> ActionOutcome {
        request_sleep()
    }
}
