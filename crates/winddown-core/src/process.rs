use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A boxed error type for engine operations.
///
/// Fallible seams (enumeration, IPC, daemon plumbing) return this;
/// anything that implements the `Error` trait can be boxed into it.
pub type EngineResult<T> = Result<T, Box<dyn std::error::Error>>;

/// One running application that owns at least one visible top-level window.
///
/// Records are built fresh on every enumeration and never merged: the next
/// poll replaces the whole list. A `pid` is only unique among processes
/// alive at enumeration time — the OS may reuse it later for an unrelated
/// process, and callers must treat such a record as a different process
/// that happens to share a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Process identifier at enumeration time.
    pub pid: u32,
    /// Executable base name as reported by the OS (may carry `.exe`).
    pub raw_name: String,
    /// Title of the process's primary visible window.
    pub title: String,
    /// Base64 PNG data URL for the app icon, or `None` when extraction
    /// failed or the executable has no icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// One visible top-level window as reported by the platform layer,
/// before windows are collapsed into per-process records.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub pid: u32,
    pub title: String,
}

/// Platform-agnostic process enumeration trait.
///
/// The platform crate provides the implementation; the daemon and tests
/// only see this seam. A total failure (e.g. no privilege to query the
/// process table) is an `Err`; zero qualifying processes is `Ok(vec![])`.
pub trait ProcessEnumerator {
    fn enumerate(&mut self) -> Result<Vec<ProcessRecord>, String>;
}

/// Collapses multiple windows owned by one process into a single entry.
///
/// First-seen title wins: `EnumWindows` yields windows in z-order, so the
/// first window seen for a pid is its most recently activated one. Order
/// of first appearance is preserved.
pub fn collapse_by_pid(windows: Vec<WindowInfo>) -> Vec<WindowInfo> {
    let mut seen: HashSet<u32> = HashSet::new();
    windows
        .into_iter()
        .filter(|w| seen.insert(w.pid))
        .collect()
}

/// Sorts records by title, case-insensitively, for a stable display order.
pub fn sort_records(records: &mut [ProcessRecord]) {
    records.sort_by_key(|r| r.title.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win(pid: u32, title: &str) -> WindowInfo {
        WindowInfo {
            pid,
            title: title.into(),
        }
    }

    #[test]
    fn collapse_keeps_first_title_per_pid() {
        let collapsed = collapse_by_pid(vec![
            win(10, "Inbox - Mail"),
            win(20, "Terminal"),
            win(10, "Compose - Mail"),
        ]);

        assert_eq!(collapsed, vec![win(10, "Inbox - Mail"), win(20, "Terminal")]);
    }

    #[test]
    fn collapse_preserves_first_seen_order() {
        let collapsed = collapse_by_pid(vec![win(3, "c"), win(1, "a"), win(2, "b"), win(1, "a2")]);

        let pids: Vec<u32> = collapsed.iter().map(|w| w.pid).collect();
        assert_eq!(pids, vec![3, 1, 2]);
    }

    #[test]
    fn collapse_of_empty_input_is_empty() {
        assert!(collapse_by_pid(Vec::new()).is_empty());
    }

    #[test]
    fn sort_is_case_insensitive() {
        let mut records = vec![
            ProcessRecord {
                pid: 1,
                raw_name: "b.exe".into(),
                title: "beta".into(),
                icon: None,
            },
            ProcessRecord {
                pid: 2,
                raw_name: "a.exe".into(),
                title: "Alpha".into(),
                icon: None,
            },
        ];

        sort_records(&mut records);
        assert_eq!(records[0].title, "Alpha");
        assert_eq!(records[1].title, "beta");
    }
}
