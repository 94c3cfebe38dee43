use regex::Regex;
use runlog_types::{Attribute, Category, FormattedEvent, RawEvent, non_blank, trim_trailing_blank};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Header substrings that identify the agent start-up banner
pub const AGENT_BANNERS: &[&str] = &["OpenAI Codex", "Claude Code", "codex-cli"];

/// Trailing `in <duration>` of a command result, optionally followed by `:`
/// Example: "-lc 'cargo test' succeeded in 1.2s:"
static DURATION_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+in\s+(\d[\d.,]*\s*(?:ms|s|m|h)?)\s*:?\s*$").unwrap()
});

/// One classification rule: a predicate and the builder used when it matches.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&RawEvent) -> bool,
    pub build: fn(&RawEvent) -> FormattedEvent,
}

/// Classification rules, first match wins.
///
/// Several predicates can match the same event (a `turn diff` event is also
/// a generic `turn` event), so the order here is part of the output format.
pub static RULES: &[Rule] = &[
    Rule {
        name: "preface",
        matches: |e| e.timestamp.is_empty() && !e.body.is_empty(),
        build: build_preface,
    },
    Rule {
        name: "run_context",
        matches: |e| AGENT_BANNERS.iter().any(|b| e.raw_header.contains(b)),
        build: build_run_context,
    },
    Rule {
        name: "user_brief",
        matches: |e| e.raw_header.trim_end().ends_with("User instructions:"),
        build: build_user_brief,
    },
    Rule {
        name: "shared_context",
        matches: |e| e.raw_header.to_lowercase().contains("shared context"),
        build: build_shared_context,
    },
    Rule {
        name: "thinking",
        matches: |e| e.channel == "thinking",
        build: build_thinking,
    },
    Rule {
        name: "codex_stage",
        matches: |e| e.channel == "codex",
        build: build_stage,
    },
    Rule {
        name: "exec_request",
        matches: |e| e.channel == "exec",
        build: build_exec_request,
    },
    Rule {
        name: "exec_result",
        matches: |e| e.channel == "bash",
        build: build_exec_result,
    },
    Rule {
        name: "tokens",
        matches: |e| e.channel == "tokens",
        build: build_tokens,
    },
    Rule {
        name: "patch",
        matches: |e| e.channel.starts_with("apply_patch"),
        build: build_patch,
    },
    Rule {
        name: "turn_diff",
        matches: |e| e.channel == "turn" && e.message.trim().starts_with("diff"),
        build: build_diff,
    },
    Rule {
        name: "log_entry",
        matches: |_| true,
        build: build_log_entry,
    },
];

pub fn classify(event: &RawEvent) -> FormattedEvent {
    RULES
        .iter()
        .find(|rule| (rule.matches)(event))
        .map(|rule| (rule.build)(event))
        .unwrap_or_else(|| build_log_entry(event))
}

pub fn classify_all(events: &[RawEvent]) -> Vec<FormattedEvent> {
    let formatted: Vec<FormattedEvent> = events.iter().map(classify).collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in &formatted {
        *counts.entry(event.category.as_str()).or_default() += 1;
    }
    tracing::debug!(?counts, "classified events");

    formatted
}

fn build_preface(e: &RawEvent) -> FormattedEvent {
    FormattedEvent::new("Preface", Category::ContextMetadata, e.line)
        .with(Attribute::new("lines", non_blank(&e.body)))
}

fn build_run_context(e: &RawEvent) -> FormattedEvent {
    let mut event = FormattedEvent::new("Run Context", Category::ContextInit, e.line)
        .with(Attribute::single("timestamp", e.timestamp.clone()))
        .with(Attribute::single("agent_version", e.raw_header.clone()));

    for line in &e.body {
        let line = line.trim();
        if line.is_empty() || is_separator(line) {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().replace(' ', "_");
            if key.is_empty() {
                continue;
            }
            event.push(Attribute::single(key, value.trim()));
        }
    }

    event
}

fn is_separator(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '-' | '=' | '_' | '*' | '─'))
}

fn build_user_brief(e: &RawEvent) -> FormattedEvent {
    FormattedEvent::new("User Brief", Category::ContextInstructions, e.line)
        .with(Attribute::single("timestamp", e.timestamp.clone()))
        .with(Attribute::new("instructions", non_blank(&e.body)))
}

fn build_shared_context(e: &RawEvent) -> FormattedEvent {
    let mut artifacts = Vec::new();
    let mut notes = Vec::new();

    for line in &e.body {
        if let Some(name) = line.strip_prefix("### ") {
            artifacts.push(name.to_string());
        } else if !line.trim().is_empty() {
            notes.push(line.clone());
        }
    }

    FormattedEvent::new("Shared Context", Category::ContextManifest, e.line)
        .with(Attribute::new("artifacts", artifacts))
        .with(Attribute::new("notes", notes))
}

fn build_thinking(e: &RawEvent) -> FormattedEvent {
    let lines = non_blank(&e.body);

    let heading = lines.first().and_then(|first| {
        let trimmed = first.trim();
        trimmed
            .strip_prefix("**")
            .and_then(|rest| rest.strip_suffix("**"))
            .map(|inner| inner.trim().to_string())
            .filter(|inner| !inner.is_empty())
    });

    let (title, notes) = match heading {
        Some(title) => (title, lines[1..].to_vec()),
        None => ("Agent Thinking".to_string(), lines),
    };

    FormattedEvent::new(title, Category::CognitionStart, e.line)
        .with(Attribute::new("notes", notes))
}

fn build_stage(e: &RawEvent) -> FormattedEvent {
    FormattedEvent::new("Execution Stage", Category::CognitionStage, e.line)
        .with(Attribute::new("detail", non_blank(&e.body)))
}

fn build_exec_request(e: &RawEvent) -> FormattedEvent {
    let (command, cwd) = match e.message.rsplit_once(" in ") {
        Some((command, cwd)) => (command.trim(), cwd.trim()),
        None => (e.message.trim(), ""),
    };

    FormattedEvent::new("Shell Invocation", Category::ToolExecRequest, e.line)
        .with(Attribute::single("command", command))
        .with(Attribute::single("cwd", cwd))
}

fn build_exec_result(e: &RawEvent) -> FormattedEvent {
    let status = if e.message.contains(" succeeded") {
        "succeeded"
    } else if e.message.contains(" failed") {
        "failed"
    } else {
        ""
    };

    let (summary, duration) = match DURATION_SUFFIX_REGEX.captures(&e.message) {
        Some(caps) => {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(e.message.len());
            (e.message[..start].trim(), caps[1].trim().to_string())
        }
        None => (e.message.trim().trim_end_matches(':').trim_end(), String::new()),
    };

    FormattedEvent::new("Command Result", Category::ToolExecResult, e.line)
        .with(Attribute::single("summary", summary))
        .with(Attribute::single("status", status))
        .with(Attribute::single("duration", duration))
        .with(Attribute::new("output", trim_trailing_blank(&e.body)))
}

fn build_tokens(e: &RawEvent) -> FormattedEvent {
    let message = e.message.trim();
    let used = message.strip_prefix("used:").unwrap_or(message).trim();

    FormattedEvent::new("Token Snapshot", Category::TelemetryTokens, e.line)
        .with(Attribute::single("tokens_used", used))
}

fn build_patch(e: &RawEvent) -> FormattedEvent {
    FormattedEvent::new("Patch Application", Category::ToolPatchResult, e.line)
        .with(Attribute::single("summary", e.raw_header.clone()))
        .with(Attribute::new("details", non_blank(&e.body)))
}

fn build_diff(e: &RawEvent) -> FormattedEvent {
    FormattedEvent::new("Diff Artifact", Category::OutputDiffBody, e.line)
        .with(Attribute::new("diff", trim_trailing_blank(&e.body)))
}

fn build_log_entry(e: &RawEvent) -> FormattedEvent {
    let label = if e.channel.is_empty() {
        "message"
    } else {
        e.channel.as_str()
    };

    FormattedEvent::new("Log Entry", Category::LogRaw, e.line)
        .with(Attribute::single("summary", e.message.trim()))
        .with(Attribute::new(label, trim_trailing_blank(&e.body)))
}
