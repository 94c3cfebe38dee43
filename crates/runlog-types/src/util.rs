use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::path::{Component, Path};

/// Header timestamp layout used by transcripts (`2024-01-01T00:00:00`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Sentinel instant for timestamps that failed to parse.
///
/// Sorts before every real transcript timestamp.
pub fn zero_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parse a transcript timestamp, falling back to [`zero_instant`].
///
/// Accepts the bare header layout (interpreted as UTC) and RFC 3339.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Utc.from_utc_datetime(&naive);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| zero_instant())
}

/// Reduce a string to a file-name-safe component.
///
/// Keeps ASCII letters, digits, `-` and `_`; everything else becomes `-`.
/// Leading/trailing separators are trimmed and an empty result falls back
/// to `artifact`.
pub fn sanitize_component(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == '-' || c == '_');
    if trimmed.is_empty() {
        "artifact".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lexically normalize a relative path to `/`-separated form.
///
/// `""`, `"."` and `"./"` all become `"."`; `..` pops a component when
/// possible.
pub fn normalize_rel_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|p| p != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Drop trailing lines that are empty or whitespace-only
pub fn trim_trailing_blank(lines: &[String]) -> Vec<String> {
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);
    lines[..end].to_vec()
}

/// Keep only lines with visible content
pub fn non_blank(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect()
}
