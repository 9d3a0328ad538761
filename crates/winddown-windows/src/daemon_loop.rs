use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;

use winddown_core::config;
use winddown_core::ipc::Command;
use winddown_core::{
    EngineResult, ProcessDirectory, RefreshTrigger, SlotId, TimerEngine, log_info, log_warn,
};

use crate::enumerate::DesktopEnumerator;
use crate::power::OsActionExecutor;
use crate::watcher;

use super::daemon_handlers;
use super::daemon_threads;
use super::daemon_types::DaemonMsg;

/// The inner daemon loop, separated so cleanup always runs in `run()`.
///
/// All mutable state (the process cache, the selection, both timer
/// slots) lives on this thread; ticks, watcher notifications, and IPC
/// commands arrive as messages. Single-writer discipline keeps list
/// replacement atomic for readers and firing exclusive per slot.
pub(super) fn daemon_loop() -> EngineResult<()> {
    let config = config::load();
    winddown_core::log::init(&config.logging);

    log_info!("Daemon started (PID: {})", std::process::id());
    log_info!(
        "Config: refresh interval {}s, log_level={}",
        config.refresh.interval_secs,
        config.logging.level
    );

    let mut directory = ProcessDirectory::new();
    let mut engine = TimerEngine::new();
    let mut executor = OsActionExecutor;
    let mut enumerator = DesktopEnumerator::new();

    // First poll before anything can ask for the list.
    directory.refresh(&mut enumerator, RefreshTrigger::Startup);
    log_info!("Tracking {} applications", directory.records().len());

    let (tx, rx) = mpsc::channel::<DaemonMsg>();

    // Environment watcher. Losing it costs freshness, not correctness
    // (the fallback interval still polls), so a hook failure only warns.
    let (watch_tx, watch_rx) = mpsc::channel();
    let watcher = match watcher::start(watch_tx) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log_warn!("environment watcher unavailable: {e}");
            None
        }
    };
    let watch_bridge = daemon_threads::spawn_watch_bridge(watch_rx, tx.clone());

    // IPC listener and the 1-second tick source.
    let ipc_thread = daemon_threads::spawn_ipc_listener(tx.clone());
    let tick_stop = Arc::new(AtomicBool::new(false));
    let tick_thread = daemon_threads::spawn_tick_thread(tx.clone(), tick_stop.clone());

    let mut ticks_since_poll: u64 = 0;

    // Main processing loop — blocks until a message arrives.
    while let Ok(msg) = rx.recv() {
        match msg {
            DaemonMsg::Tick => {
                ticks_since_poll += 1;
                if ticks_since_poll >= config.refresh.interval_secs {
                    ticks_since_poll = 0;
                    directory.refresh(&mut enumerator, RefreshTrigger::Interval);
                }

                let effects = engine.tick(&mut executor);
                if effects.app_fired {
                    log_info!("app timer fired: {}", engine.status(SlotId::App));
                    // The target is presumed gone: drop the selection and
                    // re-poll so clients see the new reality.
                    directory.clear_selection();
                    directory.refresh(&mut enumerator, RefreshTrigger::AfterFire);
                }
                if effects.system_fired {
                    log_info!("system timer fired: {}", engine.status(SlotId::System));
                }
            }

            DaemonMsg::EnvironmentChanged => {
                directory.refresh(&mut enumerator, RefreshTrigger::Notification);
            }

            DaemonMsg::Command(command, reply_tx) => {
                let response = daemon_handlers::handle_command(
                    &command,
                    &mut directory,
                    &mut engine,
                    &mut enumerator,
                );
                let _ = reply_tx.send(response);
                if matches!(command, Command::Stop) {
                    break;
                }
            }
        }
    }

    log_info!("Daemon stopping");
    tick_stop.store(true, std::sync::atomic::Ordering::Relaxed);
    if let Some(watcher) = watcher {
        watcher.stop();
    }
    drop(tx);
    let _ = watch_bridge.join();
    let _ = tick_thread.join();
    let _ = ipc_thread.join();

    Ok(())
}
