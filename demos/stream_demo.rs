//! Parsing an async chunk stream into parse events.
//!
//! Run with: cargo run --example stream_demo

use futures::{StreamExt, stream};
use tooltag::{ContentBlock, ParseEvent, ParserOptions, ToolSchema, parse_stream};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let schema = ToolSchema::builder()
        .tool("execute_command", ["command"])
        .build()?;

    let chunks = stream::iter(
        [
            "Running the tests now. ",
            "<execute_command><com",
            "mand>cargo test --all",
            "</command></execute_command>",
        ]
        .map(String::from)
        .to_vec(),
    );

    let mut events = parse_stream(chunks, schema, ParserOptions::default());

    while let Some(event) = events.next().await {
        match event {
            ParseEvent::Block(ContentBlock::Text(text)) if !text.partial => {
                println!("text: {}", text.text);
            }
            ParseEvent::Block(ContentBlock::ToolUse(tool)) => {
                let stage = if tool.partial { "assembling" } else { "complete" };
                println!("tool ({stage}): {} {:?}", tool.name, tool.params);
            }
            ParseEvent::Block(_) => {}
            ParseEvent::Issue(issue) => println!("recovered: {issue}"),
        }
    }

    Ok(())
}
