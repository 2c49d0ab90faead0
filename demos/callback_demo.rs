//! Callback-driven parsing of a simulated model stream.
//!
//! Run with: cargo run --example callback_demo

use tooltag::{ContentBlock, Parser, ParserOptions, ToolSchema};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let schema = ToolSchema::builder()
        .tool("read_file", ["path", "start_line", "end_line"])
        .tool("write_to_file", ["path", "content"])
        .build()?;

    let mut parser = Parser::new(schema, ParserOptions::default());

    parser.on_block(|block| match &block {
        ContentBlock::Text(text) => {
            let marker = if text.partial { "…" } else { "✓" };
            println!("[text {marker}] {}", text.text);
        }
        ContentBlock::ToolUse(tool) => {
            let marker = if tool.partial { "…" } else { "✓" };
            println!("[tool {marker}] {} {}", tool.name, tool.input_json());
        }
    });

    parser.on_error(|issue| {
        println!("[recovered] {issue}");
    });

    // Token-sized chunks, the way a model actually streams.
    let chunks = [
        "I'll start by reading",
        " the file.\n\n<read_",
        "file><path>src/m",
        "ain.rs</path><start",
        "_line>1</start_line><end_line>4",
        "0</end_line></read",
        "_file>\n\nThat gives me",
        " enough context.",
    ];

    for chunk in chunks {
        parser.process_chunk(chunk);
    }
    parser.finalize();

    Ok(())
}
