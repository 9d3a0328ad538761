use winddown_core::ipc::{Command, SlotReport, StatusReport};
use winddown_core::timer::format_hms;

/// Shows daemon liveness, both timer slots, and the selection.
pub fn execute() {
    if !winddown_windows::ipc::is_daemon_running() {
        // Pipe isn't responding — check if a stale PID file was left
        // behind by a daemon that was killed without a clean shutdown.
        if let Ok(Some(pid)) = winddown_core::pid::read_pid_file() {
            if winddown_windows::process::is_process_alive(pid) {
                println!("Winddown process exists (PID: {pid}) but is not responding.");
            } else {
                let _ = winddown_core::pid::remove_pid_file();
                println!("Winddown is not running (cleaned up stale PID file).");
            }
        } else {
            println!("Winddown is not running.");
        }
        return;
    }

    let response = super::send::send_or_exit(&Command::Status);
    let report: Option<StatusReport> = response
        .data
        .and_then(|data| serde_json::from_value(data).ok());
    let Some(report) = report else {
        println!("Winddown is running.");
        return;
    };

    println!("Winddown is running.");
    println!("  App timer      {}", slot_line(&report.app));
    println!("  System timer   {}", slot_line(&report.system));
    match report.selected {
        Some(sel) => println!("  Selected       {} (PID {})", sel.name, sel.pid),
        None => println!("  Selected       nothing"),
    }
    println!("  Applications   {}", report.process_count);
}

/// One slot as a status line, e.g. "armed: Notes in 0:04:59".
fn slot_line(slot: &SlotReport) -> String {
    if slot.status != "armed" {
        return slot.status.clone();
    }

    let what = slot
        .target
        .as_deref()
        .or(slot.action.as_deref())
        .unwrap_or("?");
    format!("armed: {what} in {}", format_hms(slot.remaining_seconds))
}
