//! Process-list cache, selection, and reconciliation.
//!
//! Every poll — startup, environment notification, fallback interval, or
//! post-fire — funnels through [`ProcessDirectory::refresh`], so cache
//! replacement and selection eviction behave identically no matter which
//! producer triggered them. Duplicate polls are idempotent.

use std::fmt;

use crate::log_warn;
use crate::process::{ProcessEnumerator, ProcessRecord};

/// Why a poll of the process list was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// First poll when the daemon starts.
    Startup,
    /// The environment watcher reported a window change (or a client
    /// asked for a manual refresh).
    Notification,
    /// The fallback interval elapsed, covering missed notifications.
    Interval,
    /// An app timer fired; the target is presumed gone.
    AfterFire,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Startup => "startup",
            Self::Notification => "notification",
            Self::Interval => "interval",
            Self::AfterFire => "after-fire",
        };
        f.write_str(s)
    }
}

/// The cached process list plus the user's current selection.
///
/// Owned by the daemon thread; replacement is wholesale, so IPC readers
/// serialize either the old or the new complete list, never a partial
/// one. Timer slots are never touched here: an armed app timer whose
/// target vanished keeps counting and observes `AlreadyGone` at fire
/// time.
#[derive(Default)]
pub struct ProcessDirectory {
    records: Vec<ProcessRecord>,
    selected: Option<u32>,
}

impl ProcessDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successfully polled list.
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    /// The selected record, resolved against the current list.
    pub fn selected(&self) -> Option<&ProcessRecord> {
        let pid = self.selected?;
        self.records.iter().find(|r| r.pid == pid)
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected
    }

    /// Selects a process by pid. Rejects pids absent from the cached
    /// list so a stale client can't arm against a ghost.
    pub fn select(&mut self, pid: u32) -> Result<(), String> {
        if !self.records.iter().any(|r| r.pid == pid) {
            return Err(format!("process {pid} is not in the current list"));
        }
        self.selected = Some(pid);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Looks up a record by pid in the cached list.
    pub fn find(&self, pid: u32) -> Option<&ProcessRecord> {
        self.records.iter().find(|r| r.pid == pid)
    }

    /// Polls the enumerator and reconciles.
    ///
    /// On success the cache is replaced and a selection whose pid is no
    /// longer present is evicted. On failure the previous cache is kept
    /// and the failure is logged; the list is never cleared to empty by
    /// a failed poll.
    pub fn refresh(&mut self, enumerator: &mut dyn ProcessEnumerator, trigger: RefreshTrigger) {
        match enumerator.enumerate() {
            Ok(records) => {
                self.records = records;
                if let Some(pid) = self.selected
                    && !self.records.iter().any(|r| r.pid == pid)
                {
                    self.selected = None;
                }
            }
            Err(cause) => {
                log_warn!("process enumeration failed ({trigger} poll): {cause}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Enumerator fed from a queue of canned results.
    struct FakeEnumerator {
        results: Vec<Result<Vec<ProcessRecord>, String>>,
    }

    impl FakeEnumerator {
        fn new(results: Vec<Result<Vec<ProcessRecord>, String>>) -> Self {
            Self { results }
        }
    }

    impl ProcessEnumerator for FakeEnumerator {
        fn enumerate(&mut self) -> Result<Vec<ProcessRecord>, String> {
            self.results.remove(0)
        }
    }

    fn record(pid: u32, title: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            raw_name: format!("app{pid}.exe"),
            title: title.into(),
            icon: None,
        }
    }

    #[test]
    fn refresh_replaces_the_cache_wholesale() {
        let mut dir = ProcessDirectory::new();
        let mut enumerator = FakeEnumerator::new(vec![
            Ok(vec![record(1, "One"), record(2, "Two")]),
            Ok(vec![record(3, "Three")]),
        ]);

        dir.refresh(&mut enumerator, RefreshTrigger::Startup);
        assert_eq!(dir.records().len(), 2);

        dir.refresh(&mut enumerator, RefreshTrigger::Interval);
        assert_eq!(dir.records().len(), 1);
        assert_eq!(dir.records()[0].pid, 3);
    }

    #[test]
    fn enumeration_failure_keeps_the_previous_cache() {
        let mut dir = ProcessDirectory::new();
        let mut enumerator = FakeEnumerator::new(vec![
            Ok(vec![record(1, "One")]),
            Err("query failed".into()),
        ]);

        dir.refresh(&mut enumerator, RefreshTrigger::Startup);
        dir.refresh(&mut enumerator, RefreshTrigger::Interval);

        assert_eq!(dir.records().len(), 1);
        assert_eq!(dir.records()[0].pid, 1);
    }

    #[test]
    fn selection_is_evicted_when_its_pid_vanishes() {
        let mut dir = ProcessDirectory::new();
        let mut enumerator = FakeEnumerator::new(vec![
            Ok(vec![record(1, "One"), record(2, "Two")]),
            Ok(vec![record(2, "Two")]),
        ]);

        dir.refresh(&mut enumerator, RefreshTrigger::Startup);
        dir.select(1).unwrap();
        assert_eq!(dir.selected().unwrap().pid, 1);

        dir.refresh(&mut enumerator, RefreshTrigger::Notification);
        assert!(dir.selected().is_none());
        assert!(dir.selected_pid().is_none());
    }

    #[test]
    fn selection_survives_when_its_pid_remains() {
        let mut dir = ProcessDirectory::new();
        let mut enumerator = FakeEnumerator::new(vec![
            Ok(vec![record(1, "One"), record(2, "Two")]),
            Ok(vec![record(1, "One renamed")]),
        ]);

        dir.refresh(&mut enumerator, RefreshTrigger::Startup);
        dir.select(1).unwrap();
        dir.refresh(&mut enumerator, RefreshTrigger::Interval);

        assert_eq!(dir.selected().unwrap().title, "One renamed");
    }

    #[test]
    fn selecting_an_unknown_pid_is_rejected() {
        let mut dir = ProcessDirectory::new();
        let mut enumerator = FakeEnumerator::new(vec![Ok(vec![record(1, "One")])]);
        dir.refresh(&mut enumerator, RefreshTrigger::Startup);

        assert!(dir.select(99).is_err());
        assert!(dir.selected_pid().is_none());
    }

    #[test]
    fn selection_eviction_does_not_depend_on_failed_polls() {
        let mut dir = ProcessDirectory::new();
        let mut enumerator = FakeEnumerator::new(vec![
            Ok(vec![record(1, "One")]),
            Err("transient".into()),
        ]);

        dir.refresh(&mut enumerator, RefreshTrigger::Startup);
        dir.select(1).unwrap();
        dir.refresh(&mut enumerator, RefreshTrigger::Interval);

        // A failed poll is not evidence the process is gone.
        assert_eq!(dir.selected_pid(), Some(1));
    }
}
