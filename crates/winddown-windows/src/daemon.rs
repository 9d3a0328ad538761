use winddown_core::EngineResult;
use winddown_core::pid;

#[path = "daemon_handlers.rs"]
mod daemon_handlers;
#[path = "daemon_ipc.rs"]
mod daemon_ipc;
#[path = "daemon_loop.rs"]
mod daemon_loop;
#[path = "daemon_threads.rs"]
mod daemon_threads;
#[path = "daemon_types.rs"]
mod daemon_types;

/// Runs the Winddown daemon.
///
/// Starts background threads for the environment watcher, the IPC
/// listener, and the 1-second tick source. The main thread owns the
/// process cache and both timer slots.
pub fn run() -> EngineResult<()> {
    pid::write_pid_file()?;
    eprintln!("Winddown daemon started.");

    let result = daemon_loop::daemon_loop();

    let _ = pid::remove_pid_file();

    result
}
