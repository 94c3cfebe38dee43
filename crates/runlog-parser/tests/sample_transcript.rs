use runlog_parser::{classify_all, scan_file};
use runlog_types::Category;
use std::path::Path;

fn sample_path() -> &'static Path {
    Path::new("tests/samples/codex_run.log")
}

#[test]
fn test_sample_scans_with_preface() {
    let events = scan_file(sample_path()).expect("sample should be readable");

    // 15 headers plus the synthetic preface
    assert_eq!(events.len(), 16);
    assert!(events[0].is_preface());
    assert_eq!(events[0].line, 1);
    assert!(events.windows(2).all(|w| w[0].line < w[1].line));
}

#[test]
fn test_sample_categories_in_order() {
    let events = scan_file(sample_path()).unwrap();
    let formatted = classify_all(&events);
    let categories: Vec<Category> = formatted.iter().map(|e| e.category).collect();

    assert_eq!(
        categories,
        vec![
            Category::ContextMetadata,
            Category::ContextInit,
            Category::ContextInstructions,
            Category::ContextManifest,
            Category::CognitionStart,
            Category::ToolExecRequest,
            Category::ToolExecResult,
            Category::TelemetryTokens,
            Category::ToolPatchResult,
            Category::LogRaw,
            Category::OutputDiffBody,
            Category::ToolExecRequest,
            Category::ToolExecResult,
            Category::TelemetryTokens,
            Category::CognitionStage,
            Category::TelemetryTokens,
        ]
    );
}

#[test]
fn test_sample_thinking_title() {
    let events = scan_file(sample_path()).unwrap();
    let formatted = classify_all(&events);
    let thinking = formatted
        .iter()
        .find(|e| e.category == Category::CognitionStart)
        .unwrap();

    insta::assert_json_snapshot!(thinking, @r###"
    {
      "title": "Inspecting the CLI entrypoint",
      "category": "cognition.start",
      "line": 17,
      "attributes": [
        {
          "label": "notes",
          "value": [
            "Need to find where args are parsed."
          ]
        }
      ]
    }
    "###);
}
