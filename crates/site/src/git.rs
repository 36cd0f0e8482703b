//! Last-updated timestamps from git history.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::process::Command;

/// Unix timestamp of the last commit touching `path`.
///
/// Runs `git log -1 --format=%at -- <file>` from the file's directory. Returns
/// `None` when git is missing, the file is untracked or the output is not a
/// timestamp.
pub fn last_modified(path: &Path) -> Option<i64> {
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty())?;
    let file_name = path.file_name()?;

    let output = Command::new("git")
        .args(["log", "-1", "--format=%at", "--"])
        .arg(file_name)
        .current_dir(dir)
        .output()
        .map_err(|err| log::debug!("git unavailable for {}: {}", path.display(), err))
        .ok()?;
    if !output.status.success() {
        log::debug!("git log failed for {}", path.display());
        return None;
    }

    parse_timestamp(&String::from_utf8_lossy(&output.stdout))
}

fn parse_timestamp(stdout: &str) -> Option<i64> {
    stdout.trim().parse().ok()
}

/// Human-readable age of `timestamp` relative to `now`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use leaf_site::git::format_last_modified;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
/// let yesterday = now.timestamp() - 86_400;
/// assert_eq!(format_last_modified(yesterday, now), "Yesterday");
/// ```
pub fn format_last_modified(timestamp: i64, now: DateTime<Utc>) -> String {
    let Some(modified) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
        return String::new();
    };
    let days = (now - modified).num_days();

    match days {
        ..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        7..=29 => plural(days / 7, "week"),
        30..=364 => plural(days / 30, "month"),
        _ => modified.format("%Y-%m-%d").to_string(),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
