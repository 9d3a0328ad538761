//! Human-friendly display names for process records.
//!
//! Window titles are dominated by document names ("budget.txt - Notes")
//! and, for browsers, by the active page. The resolver reduces a record
//! to the label a user would recognize the application by.

use crate::ProcessRecord;

/// Known browser executables mapped to their product names.
///
/// Matched as substrings of the lowercased raw process name. Browsers get
/// a fixed label because their titles describe the page, not the app.
const BROWSERS: &[(&str, &str)] = &[
    ("chrome", "Google Chrome"),
    ("msedge", "Microsoft Edge"),
    ("firefox", "Firefox"),
    ("opera", "Opera"),
    ("brave", "Brave"),
];

/// Title separators, checked in order of first occurrence in the title.
const SEPARATORS: &[&str] = &[" - ", " — ", " | ", " · "];

/// Derives a display name for a process. Pure, total, never empty.
///
/// Policy, in order:
/// 1. No window title → executable name with its `.exe` suffix stripped.
/// 2. Known browser → fixed product name, regardless of title.
/// 3. Title with a separator → the part before the first separator.
/// 4. Otherwise the title verbatim.
pub fn display_name(record: &ProcessRecord) -> String {
    if record.title.is_empty() {
        return strip_exe_suffix(&record.raw_name).to_string();
    }

    let lower_name = record.raw_name.to_lowercase();
    for (needle, friendly) in BROWSERS {
        if lower_name.contains(needle) {
            return (*friendly).to_string();
        }
    }

    if let Some(prefix) = before_first_separator(&record.title) {
        return prefix.to_string();
    }

    record.title.clone()
}

/// Strips a trailing `.exe` (any case). Falls back to the full name when
/// stripping would leave nothing.
fn strip_exe_suffix(raw_name: &str) -> &str {
    let len = raw_name.len();
    if len > 4
        && raw_name.is_char_boundary(len - 4)
        && raw_name[len - 4..].eq_ignore_ascii_case(".exe")
    {
        return &raw_name[..len - 4];
    }
    raw_name
}

/// Returns the trimmed text before the earliest separator occurrence,
/// or `None` when no separator is present or the prefix is blank.
fn before_first_separator(title: &str) -> Option<&str> {
    let first = SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()?;

    let prefix = title[..first].trim();
    if prefix.is_empty() { None } else { Some(prefix) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(raw_name: &str, title: &str) -> ProcessRecord {
        ProcessRecord {
            pid: 1,
            raw_name: raw_name.into(),
            title: title.into(),
            icon: None,
        }
    }

    #[test]
    fn browser_table_wins_over_separator_heuristic() {
        let r = record("chrome.exe", "My Page - Google Chrome");
        assert_eq!(display_name(&r), "Google Chrome");
    }

    #[test]
    fn title_prefix_before_first_separator() {
        let r = record("notes.exe", "budget.txt - Notes");
        assert_eq!(display_name(&r), "budget.txt");
    }

    #[test]
    fn empty_title_falls_back_to_stripped_raw_name() {
        let r = record("service.exe", "");
        assert_eq!(display_name(&r), "service");
    }

    #[test]
    fn exe_suffix_strip_is_case_insensitive() {
        let r = record("Helper.EXE", "");
        assert_eq!(display_name(&r), "Helper");
    }

    #[test]
    fn bare_exe_name_is_kept_whole() {
        // Stripping ".exe" here would leave an empty label.
        let r = record(".exe", "");
        assert_eq!(display_name(&r), ".exe");
    }

    #[test]
    fn earliest_separator_wins() {
        let r = record("edit.exe", "draft | notes - Editor");
        assert_eq!(display_name(&r), "draft");
    }

    #[test]
    fn em_dash_and_interpunct_separators_match() {
        assert_eq!(display_name(&record("a.exe", "Doc — App")), "Doc");
        assert_eq!(display_name(&record("b.exe", "Track · Player")), "Track");
    }

    #[test]
    fn title_without_separator_is_verbatim() {
        let r = record("game.exe", "Solitaire");
        assert_eq!(display_name(&r), "Solitaire");
    }

    #[test]
    fn blank_separator_prefix_falls_through_to_title() {
        let r = record("odd.exe", " - leading separator");
        assert_eq!(display_name(&r), " - leading separator");
    }

    #[test]
    fn msedge_maps_to_microsoft_edge() {
        let r = record("msedge.exe", "Docs - Profile 1 - Microsoft Edge");
        assert_eq!(display_name(&r), "Microsoft Edge");
    }
}
