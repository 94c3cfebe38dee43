use serde::{Deserialize, Serialize};

use crate::category::Category;

/// One header-anchored chunk of a transcript, before classification.
///
/// `line` is the 1-based line of the header. The synthetic preface event
/// (content before the first header) uses line 1 and empty
/// `timestamp`/`channel`/`raw_header`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub line: usize,
    pub timestamp: String,
    /// Header remainder after the bracketed timestamp
    pub raw_header: String,
    pub channel: String,
    pub message: String,
    pub body: Vec<String>,
}

impl RawEvent {
    pub fn preface(body: Vec<String>) -> Self {
        Self {
            line: 1,
            timestamp: String::new(),
            raw_header: String::new(),
            channel: String::new(),
            message: String::new(),
            body,
        }
    }

    pub fn is_preface(&self) -> bool {
        self.timestamp.is_empty()
    }
}

/// Named, possibly multi-line field of a classified event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub label: String,
    pub value: Vec<String>,
}

impl Attribute {
    pub fn new(label: impl Into<String>, value: Vec<String>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn single(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: vec![value.into()],
        }
    }

    /// True when there is nothing worth rendering
    pub fn is_empty(&self) -> bool {
        self.value.iter().all(|line| line.trim().is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.value.len()
    }

    pub fn char_count(&self) -> usize {
        self.value.iter().map(|line| line.chars().count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedEvent {
    pub title: String,
    pub category: Category,
    /// Source line of the originating RawEvent
    pub line: usize,
    pub attributes: Vec<Attribute>,
}

impl FormattedEvent {
    pub fn new(title: impl Into<String>, category: Category, line: usize) -> Self {
        Self {
            title: title.into(),
            category,
            line,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute unless it has no content.
    pub fn push(&mut self, attribute: Attribute) {
        if !attribute.is_empty() {
            self.attributes.push(attribute);
        }
    }

    pub fn with(mut self, attribute: Attribute) -> Self {
        self.push(attribute);
        self
    }

    pub fn attribute(&self, label: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.label == label)
    }
}
