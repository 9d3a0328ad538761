//! Live view of environment-change notifications, for checking that
//! the watcher fires when windows open and close.

/// Watches environment-change notifications in real time.
/// Press Ctrl+C to stop.
#[cfg(windows)]
pub fn execute() {
    use std::sync::mpsc;

    println!("Watching environment changes (press Ctrl+C to stop)...\n");

    let (tx, rx) = mpsc::channel();
    let watcher = match winddown_windows::watcher::start(tx) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to start watcher: {e}");
            return;
        }
    };

    // Set up Ctrl+C handler to stop the watcher cleanly.
    let (stop_tx, stop_rx) = mpsc::channel();
    winddown_windows::ctrl_c::set_handler(stop_tx);

    let mut count: u64 = 0;
    loop {
        // Check for Ctrl+C
        if stop_rx.try_recv().is_ok() {
            break;
        }

        match rx.recv_timeout(std::time::Duration::from_millis(100)) {
            Ok(()) => {
                count += 1;
                println!("environment changed (#{count})");
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    watcher.stop();
}

#[cfg(not(windows))]
pub fn execute() {
    println!("Environment watching is only supported on Windows.");
}
