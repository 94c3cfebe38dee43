use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use runlog_runtime::CategorySummary;
use runlog_runtime::explorer::format_relative_time_at;
use runlog_types::ArtifactNode;

const EXPANDED: &str = "▾";
const COLLAPSED: &str = "▸";

/// `<name>  <label>  <summary>`, columns padded to the widest entry
pub fn format_summaries(summaries: &[CategorySummary]) -> String {
    let name_width = summaries.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    let label_width = summaries.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);

    summaries
        .iter()
        .map(|s| {
            format!(
                "{:<name_width$}  {:<label_width$}  {}\n",
                s.name, s.label, s.summary
            )
        })
        .collect()
}

/// Indented tree, two spaces per level.
///
/// ```text
/// ▾ staging/  2h ago
///   ▸ run-1/  2h ago
///     notes.md  1.2 KB  3d ago
/// ```
pub fn format_tree(nodes: &[&ArtifactNode], now: DateTime<Utc>, color: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&format_node(node, now, color));
        out.push('\n');
    }
    out
}

fn format_node(node: &ArtifactNode, now: DateTime<Utc>, color: bool) -> String {
    let indent = "  ".repeat(node.level);
    let age = node
        .mod_time
        .map(|ts| format_relative_time_at(ts, now))
        .unwrap_or_else(|| "-".to_string());

    if node.is_dir {
        let marker = if node.expanded { EXPANDED } else { COLLAPSED };
        let name = format!("{}/", node.name);
        let name = if color {
            name.blue().bold().to_string()
        } else {
            name
        };
        format!("{}{} {}  {}", indent, marker, name, age)
    } else {
        format!("{}  {}  {}  {}", indent, node.name, format_size(node.size), age)
    }
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
