use crate::Result;
use regex::Regex;
use runlog_types::RawEvent;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

/// Header line: `[2024-01-01T00:00:00] rest of header`
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})\]\s*(.*)$").unwrap()
});

/// Incremental line splitter.
///
/// Feed lines in order with [`Scanner::push_line`], then call
/// [`Scanner::finish`] to flush the open event.
#[derive(Debug, Default)]
pub struct Scanner {
    events: Vec<RawEvent>,
    current: Option<RawEvent>,
    preface: Vec<String>,
    line_no: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        self.line_no += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(caps) = HEADER_REGEX.captures(line) {
            self.close_current();
            let timestamp = caps[1].to_string();
            let rest = caps[2].trim_end();
            let (channel, message) = split_channel(rest);

            self.current = Some(RawEvent {
                line: self.line_no,
                timestamp,
                raw_header: rest.to_string(),
                channel,
                message,
                body: Vec::new(),
            });
            return;
        }

        match self.current.as_mut() {
            Some(event) => event.body.push(line.to_string()),
            None => self.preface.push(line.to_string()),
        }
    }

    pub fn finish(mut self) -> Vec<RawEvent> {
        // Also emits the preface of a transcript without any header
        self.close_current();
        tracing::debug!(events = self.events.len(), lines = self.line_no, "scanned transcript");
        self.events
    }

    fn close_current(&mut self) {
        if let Some(event) = self.current.take() {
            self.events.push(event);
        } else if !self.preface.is_empty() {
            let body = std::mem::take(&mut self.preface);
            self.events.push(RawEvent::preface(body));
        }
    }
}

/// Split a header remainder into `(channel, message)`.
///
/// The first whitespace-delimited token is a channel only when it is made
/// of lowercase ASCII letters, `-` and `_`.
fn split_channel(rest: &str) -> (String, String) {
    let (first, remainder) = match rest.split_once(char::is_whitespace) {
        Some((first, remainder)) => (first, remainder.trim_start()),
        None => (rest, ""),
    };

    let is_channel = !first.is_empty()
        && first
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '-' || c == '_');

    if is_channel {
        (first.to_string(), remainder.to_string())
    } else {
        (String::new(), rest.to_string())
    }
}

/// Scan a byte stream; invalid UTF-8 is replaced rather than rejected
pub fn scan_reader<R: BufRead>(mut reader: R) -> Result<Vec<RawEvent>> {
    let mut scanner = Scanner::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        scanner.push_line(&String::from_utf8_lossy(&buf));
    }
    Ok(scanner.finish())
}

pub fn scan_file(path: &Path) -> Result<Vec<RawEvent>> {
    let file = File::open(path)?;
    scan_reader(BufReader::new(file))
}

pub fn scan_str(content: &str) -> Vec<RawEvent> {
    let mut scanner = Scanner::new();
    for line in content.lines() {
        scanner.push_line(line);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_channel_lowercase_token() {
        assert_eq!(
            split_channel("exec bash -lc ls in /repo"),
            ("exec".to_string(), "bash -lc ls in /repo".to_string())
        );
        assert_eq!(
            split_channel("apply_patch auto_approved=true:"),
            ("apply_patch".to_string(), "auto_approved=true:".to_string())
        );
        assert_eq!(
            split_channel("thinking"),
            ("thinking".to_string(), String::new())
        );
    }

    #[test]
    fn test_split_channel_rejects_uppercase_and_symbols() {
        assert_eq!(
            split_channel("User instructions:"),
            (String::new(), "User instructions:".to_string())
        );
        assert_eq!(
            split_channel("codeX stage"),
            (String::new(), "codeX stage".to_string())
        );
        assert_eq!(
            split_channel("apply_patch(auto_approved=true) exited 0"),
            (
                String::new(),
                "apply_patch(auto_approved=true) exited 0".to_string()
            )
        );
        assert_eq!(split_channel(""), (String::new(), String::new()));
    }

    #[test]
    fn test_headers_without_preface() {
        let events = scan_str(
            "[2024-01-01T00:00:00] thinking\n**Plan**\n[2024-01-01T00:00:01] codex\ndone\n[2024-01-01T00:00:02] tokens used: 10\n",
        );

        assert_eq!(events.len(), 3);
        assert_eq!(
            events.iter().map(|e| e.line).collect::<Vec<_>>(),
            vec![1, 3, 5]
        );
        assert_eq!(events[0].body, vec!["**Plan**"]);
        assert_eq!(events[2].channel, "tokens");
        assert_eq!(events[2].message, "used: 10");
    }

    #[test]
    fn test_preface_before_first_header() {
        let events = scan_str("banner line\n\n[2024-01-01T00:00:00] codex\nbody\n");

        assert_eq!(events.len(), 2);
        assert!(events[0].is_preface());
        assert_eq!(events[0].line, 1);
        assert_eq!(events[0].body, vec!["banner line", ""]);
        assert_eq!(events[1].line, 3);
        assert_eq!(events[1].body, vec!["body"]);
    }

    #[test]
    fn test_transcript_without_headers_is_all_preface() {
        let events = scan_str("one\ntwo\n");
        assert_eq!(events.len(), 1);
        assert!(events[0].is_preface());
        assert_eq!(events[0].body, vec!["one", "two"]);
    }

    #[test]
    fn test_malformed_header_is_body() {
        let events = scan_str("[2024-01-01T00:00:00] codex\n[2024-01-01 00:00:01] not a header\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].body, vec!["[2024-01-01 00:00:01] not a header"]);
    }

    #[test]
    fn test_crlf_lines() {
        let events = scan_str("[2024-01-01T00:00:00] exec ls in /tmp\r\nout\r\n");
        assert_eq!(events[0].message, "ls in /tmp");
        assert_eq!(events[0].body, vec!["out"]);
    }

    #[test]
    fn test_reader_replaces_invalid_utf8() {
        let bytes: &[u8] = b"[2024-01-01T00:00:00] exec cat notes.txt in /tmp\r\ncaf\xe9 latin-1 output\nlast";
        let events = scan_reader(bytes).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "cat notes.txt in /tmp");
        assert_eq!(events[0].body, vec!["caf\u{fffd} latin-1 output", "last"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(scan_str("").is_empty());
    }

    #[test]
    fn test_scan_missing_file_is_error() {
        let result = scan_file(Path::new("/definitely/not/here.log"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
