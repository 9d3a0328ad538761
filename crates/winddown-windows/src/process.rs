//! Process liveness and termination.

use winddown_core::TerminateOutcome;

/// Checks whether a process with the given PID is still alive.
///
/// Uses `OpenProcess` with minimal access rights. If the handle can be
/// opened, the process exists. This also detects stale PID files left
/// behind when the daemon was killed without a clean shutdown.
#[cfg(windows)]
pub fn is_process_alive(pid: u32) -> bool {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

    // SAFETY: OpenProcess attempts to open an existing process.
    // PROCESS_QUERY_LIMITED_INFORMATION is the least-privilege access
    // right that still confirms the process exists.
    let result = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) };

    match result {
        Ok(handle) => {
            // SAFETY: The handle was only opened to check existence.
            unsafe {
                let _ = CloseHandle(handle);
            }
            true
        }
        Err(_) => false,
    }
}

#[cfg(not(windows))]
pub fn is_process_alive(pid: u32) -> bool {
    use sysinfo::{Pid, ProcessesToUpdate, System};

    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
    system.process(Pid::from_u32(pid)).is_some()
}

/// Requests termination of the process with the given PID.
///
/// A pid that no longer exists reports `AlreadyGone` — the intended end
/// state already holds — while a live process the OS refuses to touch
/// (typically access denied) reports `Failed` with the cause.
#[cfg(windows)]
pub fn terminate(pid: u32) -> TerminateOutcome {
    use windows::Win32::Foundation::{CloseHandle, ERROR_INVALID_PARAMETER};
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};

    // SAFETY: OpenProcess with PROCESS_TERMINATE either yields a handle
    // we own (closed below) or an error.
    let handle = match unsafe { OpenProcess(PROCESS_TERMINATE, false, pid) } {
        Ok(handle) => handle,
        // OpenProcess reports a nonexistent pid as an invalid parameter.
        Err(e) if e.code() == ERROR_INVALID_PARAMETER.to_hresult() => {
            return TerminateOutcome::AlreadyGone;
        }
        Err(_) if !is_process_alive(pid) => return TerminateOutcome::AlreadyGone,
        Err(e) => return TerminateOutcome::Failed(e.message()),
    };

    // SAFETY: TerminateProcess with a PROCESS_TERMINATE handle; the
    // handle is closed regardless of the result.
    let result = unsafe { TerminateProcess(handle, 1) };
    unsafe {
        let _ = CloseHandle(handle);
    }

    match result {
        Ok(()) => TerminateOutcome::Terminated,
        Err(_) if !is_process_alive(pid) => TerminateOutcome::AlreadyGone,
        Err(e) => TerminateOutcome::Failed(e.message()),
    }
}

#[cfg(not(windows))]
pub fn terminate(pid: u32) -> TerminateOutcome {
    use sysinfo::{Pid, ProcessesToUpdate, System};

    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);

    match system.process(Pid::from_u32(pid)) {
        Some(process) => {
            if process.kill() {
                TerminateOutcome::Terminated
            } else {
                TerminateOutcome::Failed("kill request rejected by the OS".into())
            }
        }
        None => TerminateOutcome::AlreadyGone,
    }
}

/// Kills a process outright, reporting only success or failure.
///
/// Used by the CLI to put down a daemon whose IPC thread died; the
/// richer `terminate` outcomes don't matter there.
pub fn kill_process(pid: u32) -> bool {
    matches!(
        terminate(pid),
        TerminateOutcome::Terminated | TerminateOutcome::AlreadyGone
    )
}
