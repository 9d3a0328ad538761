//! Environment-change watcher.
//!
//! Hooks system-wide window create/destroy/show/hide events and sends a
//! debounced `()` notification whenever the set of top-level windows may
//! have changed. The daemon re-polls on each notification; the fallback
//! interval covers anything the hook misses, so a platform without the
//! hook loses freshness, never correctness.

#[cfg(not(windows))]
use std::sync::mpsc::Sender;

#[cfg(not(windows))]
use winddown_core::EngineResult;

/// Handle for stopping the watcher thread.
pub struct WatcherHandle {
    #[cfg(windows)]
    thread_id: u32,
    #[cfg(windows)]
    handle: std::thread::JoinHandle<()>,
}

#[cfg(windows)]
mod imp {
    use std::sync::mpsc::Sender;
    use std::thread;
    use std::time::{Duration, Instant};

    use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
    use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent};
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, EVENT_OBJECT_CREATE, EVENT_OBJECT_HIDE, GetMessageW, MSG,
        PostThreadMessageW, TranslateMessage, WINEVENT_OUTOFCONTEXT, WINEVENT_SKIPOWNPROCESS,
        WM_QUIT,
    };

    use winddown_core::EngineResult;

    use super::WatcherHandle;

    /// Object ID indicating the event applies to the window itself,
    /// not a child element like a scrollbar or menu item.
    const OBJID_WINDOW: i32 = 0;

    /// Minimum gap between notifications. Window churn (a browser
    /// opening, a dialog closing) produces event bursts; one poll per
    /// burst is enough.
    const DEBOUNCE: Duration = Duration::from_millis(500);

    // Thread-local state for the WinEvent callback: the notification
    // sender and the time of the last notification sent.
    thread_local! {
        static NOTIFIER: std::cell::RefCell<Option<Sender<()>>> =
            const { std::cell::RefCell::new(None) };
        static LAST_SENT: std::cell::Cell<Option<Instant>> = const { std::cell::Cell::new(None) };
    }

    /// Starts the watcher on a new thread and returns its handle.
    pub fn start(tx: Sender<()>) -> EngineResult<WatcherHandle> {
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<u32, String>>();

        let handle = thread::spawn(move || {
            NOTIFIER.with(|cell| {
                *cell.borrow_mut() = Some(tx);
            });

            let thread_id = unsafe { windows::Win32::System::Threading::GetCurrentThreadId() };

            // SAFETY: SetWinEventHook registers our callback for the
            // window create/destroy/show/hide range. WINEVENT_OUTOFCONTEXT
            // runs the callback in our process; WINEVENT_SKIPOWNPROCESS
            // ignores windows we own.
            let hook = unsafe {
                SetWinEventHook(
                    EVENT_OBJECT_CREATE,
                    EVENT_OBJECT_HIDE,
                    None,
                    Some(win_event_proc),
                    0,
                    0,
                    WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
                )
            };

            if hook.is_invalid() {
                let _ = ready_tx.send(Err("failed to set WinEvent hook".to_string()));
                return;
            }

            let _ = ready_tx.send(Ok(thread_id));

            // Message pump: WinEvent callbacks are delivered here.
            // Blocks until WM_QUIT arrives via stop().
            let mut msg = MSG::default();
            while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            unsafe {
                let _ = UnhookWinEvent(hook);
            }
        });

        let thread_id: u32 = ready_rx
            .recv()
            .map_err(|_| -> Box<dyn std::error::Error> {
                "watcher thread exited unexpectedly".into()
            })?
            .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

        Ok(WatcherHandle { thread_id, handle })
    }

    /// The WinEvent callback: debounce, then notify.
    unsafe extern "system" fn win_event_proc(
        _hook: HWINEVENTHOOK,
        _event: u32,
        _hwnd: HWND,
        id_object: i32,
        _id_child: i32,
        _event_thread: u32,
        _event_time: u32,
    ) {
        // Ignore events on child objects (scrollbars, buttons, etc.).
        if id_object != OBJID_WINDOW {
            return;
        }

        let now = Instant::now();
        let debounced = LAST_SENT.with(|cell| match cell.get() {
            Some(last) if now.duration_since(last) < DEBOUNCE => true,
            _ => {
                cell.set(Some(now));
                false
            }
        });
        if debounced {
            return;
        }

        NOTIFIER.with(|cell| {
            if let Some(tx) = cell.borrow().as_ref() {
                let _ = tx.send(());
            }
        });
    }

    impl WatcherHandle {
        /// Signals the watcher to stop and waits for the thread to finish.
        pub fn stop(self) {
            unsafe {
                let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
            let _ = self.handle.join();
        }
    }
}

#[cfg(windows)]
pub use imp::start;

/// No window-event hook exists off Windows; the fallback poll interval
/// is the only freshness source there.
#[cfg(not(windows))]
pub fn start(_tx: Sender<()>) -> EngineResult<WatcherHandle> {
    Ok(WatcherHandle {})
}

#[cfg(not(windows))]
impl WatcherHandle {
    pub fn stop(self) {}
}
