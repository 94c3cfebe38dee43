use regex::Regex;
use runlog_types::{TelemetrySnapshot, parse_timestamp};
use std::sync::LazyLock;

/// `[2024-01-01T00:00:00] tokens used: 12,345`
static BRACKETED_TOKENS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[([^\]]+)\]\s*tokens used:\s*([\d,]+)").unwrap());

/// `... tokens_used: 12345` anywhere on the line
static INLINE_TOKENS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tokens_used:\s*([\d,]+)").unwrap());

/// `... duration: 1,500ms`
static INLINE_DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"duration:\s*([\d,]+)\s*ms").unwrap());

/// `bash -lc 'make' succeeded in 1,500ms:`
static EXEC_DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(?:succeeded|failed) in ([\d,]+)ms").unwrap());

/// Raw telemetry samples in transcript order (not yet sorted)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub tokens: Vec<TelemetrySnapshot>,
    pub durations: Vec<TelemetrySnapshot>,
}

pub fn extract(content: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;

        if let Some(caps) = BRACKETED_TOKENS_REGEX.captures(line) {
            if let Some(tokens) = parse_number(&caps[2], line_no) {
                let ts = parse_timestamp(&caps[1]);
                extraction
                    .tokens
                    .push(TelemetrySnapshot::tokens(ts, tokens, line_no));
            }
            continue;
        }

        if let Some(caps) = INLINE_TOKENS_REGEX.captures(line) {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            if let Some(tokens) = parse_number(&caps[1], line_no) {
                let ts = parse_timestamp(bracket_before(line, start).unwrap_or(""));
                extraction
                    .tokens
                    .push(TelemetrySnapshot::tokens(ts, tokens, line_no));
            }
            // Token lines never count as duration lines
            continue;
        }

        let duration = INLINE_DURATION_REGEX
            .captures(line)
            .or_else(|| EXEC_DURATION_REGEX.captures(line));

        if let Some(caps) = duration {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            if let Some(ms) = parse_number(&caps[1], line_no) {
                let ts = parse_timestamp(bracket_before(line, start).unwrap_or(""));
                extraction
                    .durations
                    .push(TelemetrySnapshot::latency(ts, ms, line_no));
            }
        }
    }

    tracing::debug!(
        tokens = extraction.tokens.len(),
        durations = extraction.durations.len(),
        "extracted telemetry samples"
    );
    extraction
}

/// Contents of the nearest `[...]` that closes before `end`
fn bracket_before(line: &str, end: usize) -> Option<&str> {
    let head = &line[..end];
    let close = head.rfind(']')?;
    let open = head[..close].rfind('[')?;
    Some(&head[open + 1..close])
}

/// Parse a count with optional thousands separators
fn parse_number(raw: &str, line_no: usize) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    match digits.parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(line = line_no, raw, %err, "skipping malformed telemetry number");
            None
        }
    }
}
