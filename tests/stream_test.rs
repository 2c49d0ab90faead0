//! Integration tests for the async stream adapter.

use futures::{StreamExt, stream};
use tooltag::{ContentBlock, ParseEvent, ParserOptions, ToolSchema, parse_stream};

fn schema() -> ToolSchema {
    ToolSchema::builder()
        .tool("read_file", ["path", "start_line", "end_line"])
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_stream_parses_chunked_tool_call() {
    let chunks = stream::iter(
        ["Let me look. <read_", "file><path>src/lib", ".rs</path></read_file>"]
            .map(String::from)
            .to_vec(),
    );

    let events: Vec<ParseEvent> = parse_stream(chunks, schema(), ParserOptions::default())
        .collect()
        .await;

    assert!(events.iter().all(|e| !e.is_issue()));

    let finals: Vec<&ContentBlock> = events
        .iter()
        .filter_map(ParseEvent::as_block)
        .filter(|b| !b.is_partial())
        .collect();
    assert_eq!(finals.len(), 2);
    assert_eq!(finals[0].as_text().unwrap().text, "Let me look.");
    assert_eq!(
        finals[1].as_tool_use().unwrap().param("path"),
        Some("src/lib.rs")
    );
}

#[tokio::test]
async fn test_stream_emits_partials_at_chunk_boundaries() {
    let chunks = stream::iter(
        ["<read_file><path>a", "bc", "</path></read_file>"]
            .map(String::from)
            .to_vec(),
    );

    let events: Vec<ParseEvent> = parse_stream(chunks, schema(), ParserOptions::default())
        .collect()
        .await;

    let snapshots: Vec<&str> = events
        .iter()
        .filter_map(ParseEvent::as_block)
        .filter(|b| b.is_partial())
        .filter_map(ContentBlock::as_tool_use)
        .filter_map(|t| t.param("path"))
        .collect();
    assert_eq!(snapshots, vec!["a", "abc"]);
}

#[tokio::test]
async fn test_stream_surfaces_issues() {
    let chunks = stream::iter(vec!["<nope></nope>".to_string()]);

    let events: Vec<ParseEvent> = parse_stream(chunks, schema(), ParserOptions::default())
        .collect()
        .await;

    assert!(events.iter().any(ParseEvent::is_issue));
}

#[tokio::test]
async fn test_stream_relaxed_mode_is_silent() {
    let chunks = stream::iter(vec!["<nope></nope>".to_string()]);

    let events: Vec<ParseEvent> = parse_stream(chunks, schema(), ParserOptions::relaxed())
        .collect()
        .await;

    assert!(events.iter().all(|e| !e.is_issue()));
}

#[tokio::test]
async fn test_stream_finalizes_trailing_text_on_end() {
    let chunks = stream::iter(vec!["closing thoughts".to_string()]);

    let events: Vec<ParseEvent> = parse_stream(chunks, schema(), ParserOptions::default())
        .collect()
        .await;

    let last = events
        .last()
        .and_then(ParseEvent::as_block)
        .and_then(ContentBlock::as_text)
        .expect("trailing text should be finalized");
    assert!(!last.partial);
    assert_eq!(last.text, "closing thoughts");
}
