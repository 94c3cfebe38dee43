use crate::Result;
use crate::store::ArtifactStore;
use runlog_types::{Attribute, FormattedEvent};

const SEPARATOR_WIDTH: usize = 80;

/// Renders classified events as a linear plain-text report.
///
/// Each event becomes one block:
///
/// ```text
/// --------------------------------------------------------------------------------
/// Command Result · tool.exec_result (logs/run.log:23)
/// --------------------------------------------------------------------------------
/// status: succeeded
/// output:
///   src/main.rs
/// --------------------------------------------------------------------------------
/// ```
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    source_label: String,
}

impl ReportRenderer {
    /// `source_label` is the transcript path shown in every block header
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
        }
    }

    pub fn render(&self, events: &[FormattedEvent], store: &mut ArtifactStore) -> Result<String> {
        let mut blocks = Vec::with_capacity(events.len());
        for event in events {
            let processed = store.process(event)?;
            blocks.push(self.render_block(&processed));
        }

        let mut report = blocks.join("\n\n");
        if !report.is_empty() {
            report.push('\n');
        }
        Ok(report)
    }

    fn render_block(&self, event: &FormattedEvent) -> String {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        let mut lines = vec![
            separator.clone(),
            format!(
                "{} · {} ({}:{})",
                event.title, event.category, self.source_label, event.line
            ),
            separator.clone(),
        ];

        for attribute in event.attributes.iter().filter(|a| !a.is_empty()) {
            render_attribute(attribute, &mut lines);
        }

        lines.push(separator);
        lines.join("\n")
    }
}

fn render_attribute(attribute: &Attribute, out: &mut Vec<String>) {
    if let [only] = attribute.value.as_slice()
        && !only.is_empty()
        && !only.contains('\n')
    {
        out.push(format!("{}: {}", attribute.label, only));
        return;
    }

    out.push(format!("{}:", attribute.label));
    for value in &attribute.value {
        for line in value.split('\n') {
            if line.trim().is_empty() {
                out.push("  ".to_string());
            } else {
                out.push(format!("  {}", line));
            }
        }
    }
}
