/// Ctrl+C handling for foreground CLI modes.
#[cfg(windows)]
pub mod ctrl_c;

/// Daemon main loop.
pub mod daemon;

/// Top-level application enumeration.
pub mod enumerate;

/// App icon extraction.
#[cfg(windows)]
mod icon;

/// IPC via Named Pipes.
pub mod ipc;

/// Power transition requests and the OS-backed action executor.
pub mod power;

/// Process utilities (alive check, termination).
pub mod process;

/// Environment-change watcher.
pub mod watcher;

/// Window type wrapping a Win32 `HWND`.
#[cfg(windows)]
mod window;

pub use enumerate::DesktopEnumerator;
pub use power::OsActionExecutor;
