//! Run report rendering and the daily log.
//!
//! The report is plain text appended to `<log_dir>/<YYYY-MM-DD>.log`. When the
//! process looks like it runs in an interactive session it is also echoed to
//! stdout with colored section headers.

use crate::summary::RunSummary;
use chrono::{DateTime, Local, NaiveDate};
use colored::*;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TITLE: &str = "🧹 Saafsafai Cleanup Report";
const DELETED_HEADER: &str = "🗑️ Deleted temp files:";
const MOVED_HEADER: &str = "📁 Moved files to category folders:";
const REMOVED_HEADER: &str = "📦 Deleted old node_modules folders:";
const FAILED_HEADER: &str = "⚠️ Failed operations:";
const NOTHING_TO_CLEAN: &str = "📭 Nothing to clean today.";

/// Renders the report text for `summary`.
///
/// A run with no cleaned items and no failures ends with a "nothing to clean"
/// line; a run where everything failed ends differently so the two can be
/// told apart in the log.
pub fn render(summary: &RunSummary, timestamp: DateTime<Local>) -> String {
    let mut lines = vec![
        format!("{} - {}", TITLE, timestamp.format("%Y-%m-%d %H:%M:%S")),
        String::new(),
    ];

    push_section(&mut lines, DELETED_HEADER, &summary.deleted_files);
    push_section(&mut lines, MOVED_HEADER, &summary.moved_files);
    let removed: Vec<String> = summary
        .removed_dirs
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    push_section(&mut lines, REMOVED_HEADER, &removed);
    let failed: Vec<String> = summary
        .failures
        .iter()
        .map(|f| format!("{} {}: {}", f.action, f.path.display(), f.reason))
        .collect();
    push_section(&mut lines, FAILED_HEADER, &failed);

    let total = summary.total_cleaned();
    let failures = summary.failures.len();
    match (total, failures) {
        (0, 0) => lines.push(NOTHING_TO_CLEAN.to_string()),
        (0, n) => lines.push(format!(
            "❌ Nothing was cleaned; {} {} failed.",
            n,
            plural(n, "operation", "operations")
        )),
        (t, 0) => lines.push(format!(
            "✨ Cleaned up {} {} total.",
            t,
            plural(t, "item", "items")
        )),
        (t, n) => lines.push(format!(
            "✨ Cleaned up {} {} total; {} {} failed.",
            t,
            plural(t, "item", "items"),
            n,
            plural(n, "operation", "operations")
        )),
    }

    lines.join("\n")
}

fn push_section<S: AsRef<str>>(lines: &mut Vec<String>, header: &str, items: &[S]) {
    if items.is_empty() {
        return;
    }
    lines.push(header.to_string());
    lines.extend(items.iter().map(|item| format!("   - {}", item.as_ref())));
    lines.push(String::new());
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

/// Path of the log file for `date`.
pub fn log_file_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

/// Appends `text` to the log file for `date`, creating the directory if needed.
///
/// Returns the path written to.
pub fn write_daily_log(log_dir: &Path, text: &str, date: NaiveDate) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_file_path(log_dir, date);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{}", text)?;
    writeln!(file)?;
    Ok(path)
}

/// Guesses whether a person is watching: `TERM` is set and either a display
/// or an SSH session is present.
///
/// `lookup` returns the value of an environment variable, if set.
pub fn is_interactive<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());
    set("TERM") && (set("DISPLAY") || set("SSH_CLIENT"))
}

/// [`is_interactive`] against the real process environment.
pub fn is_interactive_env() -> bool {
    is_interactive(|key| std::env::var(key).ok())
}

/// Prints a rendered report with colored headers.
pub fn echo(text: &str) {
    for line in text.lines() {
        let styled = match line {
            l if l.starts_with(TITLE) => l.bold().to_string(),
            DELETED_HEADER | MOVED_HEADER | REMOVED_HEADER => line.cyan().bold().to_string(),
            FAILED_HEADER => line.yellow().bold().to_string(),
            l if l.starts_with("✨") || l == NOTHING_TO_CLEAN => l.green().to_string(),
            l if l.starts_with("❌") => l.red().to_string(),
            l => l.to_string(),
        };
        println!("{}", styled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{Action, FailedItem};
    use chrono::TimeZone;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_render_empty_run() {
        let text = render(&RunSummary::new(), at_noon());
        assert!(text.starts_with("🧹 Saafsafai Cleanup Report - 2024-03-09 12:00:00"));
        assert!(text.ends_with(NOTHING_TO_CLEAN));
        assert!(!text.contains(DELETED_HEADER));
    }

    #[test]
    fn test_render_lists_every_section() {
        let mut summary = RunSummary::new();
        summary.deleted_files.push("x.tmp".to_string());
        summary.moved_files.push("photo.jpg".to_string());
        summary
            .removed_dirs
            .push(PathBuf::from("/home/me/proj/node_modules"));

        let text = render(&summary, at_noon());

        assert!(text.contains("🗑️ Deleted temp files:\n   - x.tmp"));
        assert!(text.contains("📁 Moved files to category folders:\n   - photo.jpg"));
        assert!(text.contains("   - /home/me/proj/node_modules"));
        assert!(text.ends_with("✨ Cleaned up 3 items total."));
    }

    #[test]
    fn test_render_failures_only_differs_from_empty() {
        let mut summary = RunSummary::new();
        summary
            .failures
            .push(FailedItem::new(Action::Move, "/d/a.pdf", "permission denied"));

        let text = render(&summary, at_noon());

        assert!(!text.contains(NOTHING_TO_CLEAN));
        assert!(text.contains("   - move /d/a.pdf: permission denied"));
        assert!(text.ends_with("❌ Nothing was cleaned; 1 operation failed."));
    }

    #[test]
    fn test_render_mixed_results() {
        let mut summary = RunSummary::new();
        summary.moved_files.push("a.zip".to_string());
        summary
            .failures
            .push(FailedItem::new(Action::Delete, "/d/b.part", "busy"));
        summary
            .failures
            .push(FailedItem::new(Action::Delete, "/d/c.part", "busy"));

        let text = render(&summary, at_noon());
        assert!(text.ends_with("✨ Cleaned up 1 item total; 2 operations failed."));
    }

    #[test]
    fn test_write_daily_log_appends() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let path = write_daily_log(&log_dir, "first run", date).unwrap();
        write_daily_log(&log_dir, "second run", date).unwrap();

        assert_eq!(path, log_dir.join("2024-03-09.log"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("first run"));
        assert!(content.contains("second run"));
        assert!(content.find("first run") < content.find("second run"));
    }

    #[test]
    fn test_is_interactive_heuristic() {
        assert!(is_interactive(env(&[("TERM", "xterm"), ("DISPLAY", ":0")])));
        assert!(is_interactive(env(&[
            ("TERM", "xterm"),
            ("SSH_CLIENT", "10.0.0.1 5555 22")
        ])));
        assert!(!is_interactive(env(&[("TERM", "xterm")])));
        assert!(!is_interactive(env(&[("DISPLAY", ":0")])));
        assert!(!is_interactive(env(&[("TERM", ""), ("DISPLAY", ":0")])));
        assert!(!is_interactive(env(&[])));
    }
}
