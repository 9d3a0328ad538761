use winddown_core::display::display_name;
use winddown_core::ipc::{Command, Response, SelectionReport, SlotReport, StatusReport};
use winddown_core::process::ProcessEnumerator;
use winddown_core::timer::{AppTarget, format_hms};
use winddown_core::{ProcessDirectory, RefreshTrigger, SlotId, TimerEngine};

/// Handles one CLI command against the daemon state and returns the
/// response to ship back over IPC.
///
/// Arming only validates and starts countdowns; actions execute later,
/// from the tick path. Invalid input (zero duration, unknown or missing
/// target) is rejected here with the slot state untouched.
pub(super) fn handle_command(
    command: &Command,
    directory: &mut ProcessDirectory,
    engine: &mut TimerEngine,
    enumerator: &mut dyn ProcessEnumerator,
) -> Response {
    match command {
        Command::Stop => Response::ok_with_message("daemon stopping"),

        Command::Status => match serde_json::to_value(status_report(directory, engine)) {
            Ok(data) => Response::ok_with_data(data),
            Err(e) => Response::error(format!("failed to serialize status: {e}")),
        },

        Command::List => match serde_json::to_value(directory.records()) {
            Ok(data) => Response::ok_with_data(data),
            Err(e) => Response::error(format!("failed to serialize process list: {e}")),
        },

        Command::Refresh => {
            directory.refresh(enumerator, RefreshTrigger::Notification);
            Response::ok_with_message(format!(
                "{} applications running",
                directory.records().len()
            ))
        }

        Command::Select { pid } => match directory.select(*pid) {
            Ok(()) => {
                // select() just verified the pid is present.
                let name = directory.find(*pid).map_or_else(String::new, display_name);
                Response::ok_with_message(format!("selected {name} (PID {pid})"))
            }
            Err(e) => Response::error(e),
        },

        Command::ArmApp {
            pid,
            duration_secs,
            shutdown_after,
        } => arm_app(directory, engine, *pid, *duration_secs, *shutdown_after),

        Command::ArmSystem {
            action,
            duration_secs,
        } => match engine.arm_system(*action, *duration_secs) {
            Ok(()) => Response::ok_with_message(format!(
                "system {action} in {}",
                format_hms(*duration_secs)
            )),
            Err(e) => Response::error(e),
        },

        Command::CancelApp => {
            engine.cancel_app();
            Response::ok_with_message("app timer cancelled")
        }

        Command::CancelSystem => {
            engine.cancel_system();
            Response::ok_with_message("system timer cancelled")
        }
    }
}

/// Arms the app slot against an explicit pid or the current selection.
///
/// The target's pid and display name are snapshotted into the engine at
/// arm time; later selection changes or refreshes don't affect an armed
/// countdown.
fn arm_app(
    directory: &mut ProcessDirectory,
    engine: &mut TimerEngine,
    pid: Option<u32>,
    duration_secs: u64,
    shutdown_after: bool,
) -> Response {
    let Some(pid) = pid.or(directory.selected_pid()) else {
        return Response::error("no process selected");
    };
    let Some(record) = directory.find(pid) else {
        return Response::error(format!("process {pid} is not in the current list"));
    };

    let target = AppTarget {
        pid,
        name: display_name(record),
    };
    let name = target.name.clone();

    match engine.arm_app(target, duration_secs, shutdown_after) {
        Ok(()) => {
            let chain = if shutdown_after {
                ", then shutting down"
            } else {
                ""
            };
            Response::ok_with_message(format!(
                "closing {name} in {}{chain}",
                format_hms(duration_secs)
            ))
        }
        Err(e) => Response::error(e),
    }
}

/// Builds the full status report: both slots, selection, list size.
fn status_report(directory: &ProcessDirectory, engine: &TimerEngine) -> StatusReport {
    StatusReport {
        app: SlotReport {
            status: engine.status(SlotId::App).to_string(),
            remaining_seconds: engine.remaining(SlotId::App),
            target: engine.app_target().map(|t| t.name.clone()),
            action: None,
        },
        system: SlotReport {
            status: engine.status(SlotId::System).to_string(),
            remaining_seconds: engine.remaining(SlotId::System),
            target: None,
            action: engine.system_action().map(|a| a.to_string()),
        },
        selected: directory.selected().map(|r| SelectionReport {
            pid: r.pid,
            name: display_name(r),
        }),
        process_count: directory.records().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use winddown_core::SystemAction;
    use winddown_core::ipc::ResponseStatus;
    use winddown_core::process::ProcessRecord;
    use winddown_core::timer::SlotStatus;

    struct FakeEnumerator {
        records: Vec<ProcessRecord>,
    }

    impl ProcessEnumerator for FakeEnumerator {
        fn enumerate(&mut self) -> Result<Vec<ProcessRecord>, String> {
            Ok(self.records.clone())
        }
    }

    fn record(pid: u32, raw_name: &str, title: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            raw_name: raw_name.into(),
            title: title.into(),
            icon: None,
        }
    }

    fn loaded_directory() -> (ProcessDirectory, FakeEnumerator) {
        let mut enumerator = FakeEnumerator {
            records: vec![
                record(10, "notes.exe", "budget.txt - Notes"),
                record(20, "game.exe", "Solitaire"),
            ],
        };
        let mut directory = ProcessDirectory::new();
        directory.refresh(&mut enumerator, RefreshTrigger::Startup);
        (directory, enumerator)
    }

    #[test]
    fn arm_app_without_selection_is_rejected() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();

        let command = Command::ArmApp {
            pid: None,
            duration_secs: 60,
            shutdown_after: false,
        };
        let response = handle_command(&command, &mut directory, &mut engine, &mut enumerator);

        assert_eq!(response.status, ResponseStatus::Error);
        assert_eq!(engine.status(SlotId::App), SlotStatus::Idle);
    }

    #[test]
    fn arm_app_with_unknown_pid_is_rejected() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();

        let command = Command::ArmApp {
            pid: Some(999),
            duration_secs: 60,
            shutdown_after: false,
        };
        let response = handle_command(&command, &mut directory, &mut engine, &mut enumerator);

        assert_eq!(response.status, ResponseStatus::Error);
        assert_eq!(engine.status(SlotId::App), SlotStatus::Idle);
    }

    #[test]
    fn arm_app_uses_the_current_selection_and_snapshots_its_name() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();
        directory.select(10).unwrap();

        let command = Command::ArmApp {
            pid: None,
            duration_secs: 120,
            shutdown_after: true,
        };
        let response = handle_command(&command, &mut directory, &mut engine, &mut enumerator);

        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(engine.remaining(SlotId::App), 120);

        let target = engine.app_target().unwrap();
        assert_eq!(target.pid, 10);
        // Display identity, not the raw window title.
        assert_eq!(target.name, "budget.txt");
    }

    #[test]
    fn arm_app_with_zero_duration_is_rejected() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();

        let command = Command::ArmApp {
            pid: Some(20),
            duration_secs: 0,
            shutdown_after: false,
        };
        let response = handle_command(&command, &mut directory, &mut engine, &mut enumerator);

        assert_eq!(response.status, ResponseStatus::Error);
        assert_eq!(engine.status(SlotId::App), SlotStatus::Idle);
    }

    #[test]
    fn arm_system_reports_the_action_and_duration() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();

        let command = Command::ArmSystem {
            action: SystemAction::Restart,
            duration_secs: 3600,
        };
        let response = handle_command(&command, &mut directory, &mut engine, &mut enumerator);

        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(response.message.unwrap(), "system restart in 1:00:00");
        assert_eq!(engine.system_action(), Some(SystemAction::Restart));
    }

    #[test]
    fn status_reports_both_slots_and_the_selection() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();
        directory.select(20).unwrap();
        engine
            .arm_system(SystemAction::Sleep, 90)
            .unwrap();

        let response = handle_command(
            &Command::Status,
            &mut directory,
            &mut engine,
            &mut enumerator,
        );
        let report: StatusReport = serde_json::from_value(response.data.unwrap()).unwrap();

        assert_eq!(report.app.status, "idle");
        assert_eq!(report.system.status, "armed");
        assert_eq!(report.system.remaining_seconds, 90);
        assert_eq!(report.system.action.as_deref(), Some("sleep"));
        assert_eq!(report.selected.unwrap().name, "Solitaire");
        assert_eq!(report.process_count, 2);
    }

    #[test]
    fn list_ships_the_cached_records() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();

        let response = handle_command(
            &Command::List,
            &mut directory,
            &mut engine,
            &mut enumerator,
        );
        let records: Vec<ProcessRecord> = serde_json::from_value(response.data.unwrap()).unwrap();

        assert_eq!(records.len(), 2);
        // Cached order is title-sorted by the enumerator, not re-sorted
        // here; the fake's order passes through untouched.
        assert_eq!(records[0].pid, 10);
    }

    #[test]
    fn cancel_commands_always_succeed() {
        let (mut directory, mut enumerator) = loaded_directory();
        let mut engine = TimerEngine::new();

        let response = handle_command(
            &Command::CancelApp,
            &mut directory,
            &mut engine,
            &mut enumerator,
        );
        assert_eq!(response.status, ResponseStatus::Ok);
    }
}
