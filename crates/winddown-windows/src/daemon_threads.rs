use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use super::daemon_ipc;
use super::daemon_types::DaemonMsg;

/// Bridges watcher notifications into the daemon message channel.
pub(super) fn spawn_watch_bridge(
    watch_rx: mpsc::Receiver<()>,
    tx: mpsc::Sender<DaemonMsg>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for () in watch_rx {
            if tx.send(DaemonMsg::EnvironmentChanged).is_err() {
                break;
            }
        }
    })
}

/// Spawns the IPC listener thread.
pub(super) fn spawn_ipc_listener(tx: mpsc::Sender<DaemonMsg>) -> thread::JoinHandle<()> {
    thread::spawn(move || daemon_ipc::ipc_loop(tx))
}

/// Spawns the 1-second tick thread that clocks both countdowns.
pub(super) fn spawn_tick_thread(
    tx: mpsc::Sender<DaemonMsg>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(std::time::Duration::from_secs(1));
            if tx.send(DaemonMsg::Tick).is_err() {
                break;
            }
        }
    })
}
