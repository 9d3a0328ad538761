//! Enumeration of running applications that own a visible window.
//!
//! `EnumWindows` supplies `(pid, title)` pairs for qualifying top-level
//! windows; `sysinfo` supplies the owning executable's name and path.
//! Multiple windows of one process collapse into a single record
//! (first-seen title wins — `EnumWindows` yields z-order, so the first
//! title belongs to the most recently activated window).

use sysinfo::System;

use winddown_core::process::{ProcessEnumerator, ProcessRecord};

/// Processes that own visible windows but are part of the desktop shell,
/// not applications a user would schedule for closing.
#[cfg(windows)]
const SHELL_HOSTS: &[&str] = &[
    "explorer",
    "TextInputHost",
    "SearchHost",
    "ShellExperienceHost",
    "StartMenuExperienceHost",
];

/// Pseudo-window titles that never belong to a real application.
#[cfg(windows)]
const SKIP_TITLES: &[&str] = &["Program Manager", "Windows Input Experience"];

/// Enumerates running applications via `EnumWindows` + `sysinfo`.
///
/// Owns a `sysinfo::System` so process tables refresh incrementally
/// across polls instead of being rebuilt from scratch.
pub struct DesktopEnumerator {
    system: System,
}

impl Default for DesktopEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopEnumerator {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl ProcessEnumerator for DesktopEnumerator {
    fn enumerate(&mut self) -> Result<Vec<ProcessRecord>, String> {
        enumerate_impl(&mut self.system)
    }
}

#[cfg(windows)]
fn enumerate_impl(system: &mut System) -> Result<Vec<ProcessRecord>, String> {
    use sysinfo::{Pid, ProcessesToUpdate};
    use winddown_core::process::{collapse_by_pid, sort_records};

    use crate::icon;

    let windows = collapse_by_pid(enumerate_windows()?);
    system.refresh_processes(ProcessesToUpdate::All, true);

    let own_pid = std::process::id();
    let mut records = Vec::new();

    for w in windows {
        if w.pid == own_pid {
            continue;
        }
        // The process may have exited between EnumWindows and the
        // sysinfo refresh; skip rather than fail the poll.
        let Some(process) = system.process(Pid::from_u32(w.pid)) else {
            continue;
        };

        let raw_name = process.name().to_string_lossy().to_string();
        if SHELL_HOSTS.iter().any(|host| raw_name.contains(host)) {
            continue;
        }

        // Icon extraction failure degrades to an absent icon.
        let icon = process.exe().and_then(|path| icon::extract_data_url(path));

        records.push(ProcessRecord {
            pid: w.pid,
            raw_name,
            title: w.title,
            icon,
        });
    }

    sort_records(&mut records);
    Ok(records)
}

/// Collects `(pid, title)` for every visible, titled, top-level
/// application window.
///
/// This calls the Win32 `EnumWindows` API, which iterates over every
/// top-level window and invokes a callback for each one. Filtering
/// happens inside the callback to keep only real application windows.
#[cfg(windows)]
fn enumerate_windows() -> Result<Vec<winddown_core::process::WindowInfo>, String> {
    use windows::Win32::Foundation::LPARAM;
    use windows::Win32::UI::WindowsAndMessaging::EnumWindows;

    use winddown_core::process::WindowInfo;

    let mut windows: Vec<WindowInfo> = Vec::new();

    // SAFETY: EnumWindows calls our callback for each top-level window.
    // We pass a pointer to our Vec as LPARAM (user data). The callback
    // casts it back to &mut Vec<WindowInfo> to collect results. This is
    // safe because EnumWindows runs synchronously — the Vec outlives the
    // call.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut windows as *mut _ as isize),
        )
        .map_err(|e| format!("EnumWindows failed: {e}"))?;
    }

    Ok(windows)
}

/// Callback invoked by `EnumWindows` for each top-level window.
///
/// Returns `TRUE` to continue enumeration. Win32 can't call Rust
/// closures directly, so the result Vec travels through the `LPARAM`
/// pointer-sized user data slot.
#[cfg(windows)]
unsafe extern "system" fn enum_window_callback(
    hwnd: windows::Win32::Foundation::HWND,
    lparam: windows::Win32::Foundation::LPARAM,
) -> windows::core::BOOL {
    use windows::core::BOOL;

    use winddown_core::process::WindowInfo;

    use crate::window::Window;

    // SAFETY: lparam points to the Vec<WindowInfo> in enumerate_windows.
    let sink = unsafe { &mut *(lparam.0 as *mut Vec<WindowInfo>) };

    let window = Window::new(hwnd);
    if window.is_visible() && window.is_app_window() {
        let title = window.title();
        let pid = window.pid();
        if pid != 0 && qualifies(&title) {
            sink.push(WindowInfo { pid, title });
        }
    }

    BOOL(1) // TRUE — continue enumerating
}

/// A window qualifies when it has a real title that isn't one of the
/// desktop shell's pseudo-windows.
#[cfg(windows)]
fn qualifies(title: &str) -> bool {
    !title.is_empty() && !SKIP_TITLES.contains(&title) && !title.starts_with("MSCTFIME")
}

/// Window enumeration is a Windows capability; other platforms report
/// an empty desktop rather than an error.
#[cfg(not(windows))]
fn enumerate_impl(_system: &mut System) -> Result<Vec<ProcessRecord>, String> {
    Ok(Vec::new())
}
