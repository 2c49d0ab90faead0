//! # tooltag
//!
//! A streaming parser for the XML-style tool-invocation mini-language that
//! generative models embed in their output.
//!
//! ## Overview
//!
//! Agent-flavored models interleave prose with tool invocations of the form
//! `<tool_name><param_name>value</param_name>…</tool_name>`. The output
//! arrives incrementally, and chunk boundaries land at arbitrary offsets —
//! including in the middle of a tag. This crate turns that stream into a
//! sequence of typed [`ContentBlock`]s (text or tool-use) as soon as they
//! are discernible, republishing incomplete blocks as *partial* snapshots
//! so UIs can render progressively.
//!
//! ## Key Properties
//!
//! - **Chunk-agnostic**: identical input produces identical blocks no
//!   matter how it is split into chunks
//! - **Never fails mid-stream**: malformed input yields advisory
//!   [`ParseIssue`]s and is preserved verbatim as literal content
//! - **Schema-checked**: tool and parameter tags are validated against a
//!   caller-supplied [`ToolSchema`]; unknown names fall back to literal text
//! - **Strict and relaxed modes**: relaxed mode absorbs tag-like sequences
//!   inside payloads (diffs, code) without emitting diagnostics
//! - **No I/O, no globals**: one owned parser per logical stream
//!
//! ## Two Interaction Modes
//!
//! ### 1. Callback-driven (`Parser`)
//!
//! Feed chunks synchronously and receive blocks through callbacks:
//!
//! ```
//! use tooltag::{ContentBlock, Parser, ParserOptions, ToolSchema};
//!
//! let schema = ToolSchema::builder()
//!     .tool("read_file", ["path", "start_line", "end_line"])
//!     .build()?;
//!
//! let mut parser = Parser::new(schema, ParserOptions::default());
//! parser.on_block(|block| match &block {
//!     ContentBlock::Text(text) => println!("text: {}", text.text),
//!     ContentBlock::ToolUse(tool) => println!("tool: {}", tool.name),
//! });
//! parser.on_error(|issue| eprintln!("recovered: {issue}"));
//!
//! parser.process_chunk("Let me check. <read_file><path>src/lib");
//! parser.process_chunk(".rs</path></read_file>");
//! parser.finalize();
//! # Ok::<(), tooltag::Error>(())
//! ```
//!
//! ### 2. Stream adapter (`parse_stream`)
//!
//! Plug a [`futures::Stream`] of chunks in and consume [`ParseEvent`]s:
//!
//! ```
//! use futures::{StreamExt, stream};
//! use tooltag::{ParserOptions, ToolSchema, parse_stream};
//!
//! # futures::executor::block_on(async {
//! let schema = ToolSchema::builder().tool("read_file", ["path"]).build().unwrap();
//! let chunks = stream::iter(vec!["<read_file><path>a.rs</path></read_file>".to_string()]);
//!
//! let mut events = parse_stream(chunks, schema, ParserOptions::default());
//! while let Some(event) = events.next().await {
//!     println!("{event:?}");
//! }
//! # });
//! ```
//!
//! ## Architecture
//!
//! - **schema**: the tree of allowed tags (root → tools → parameters)
//! - **parser**: all mutable parse state plus the chunk driver
//! - **states**: one transition function per state of the machine
//! - **events**: block/error callbacks and the [`EventQueue`] capture helper
//! - **types**: the emitted content blocks
//! - **config**: strict/relaxed configuration
//! - **error**: construction errors and the advisory diagnostic taxonomy
//! - **stream**: the async adapter

/// Strict/relaxed parser configuration.
mod config;

/// Construction errors and advisory parse diagnostics.
mod error;

/// Block/error event delivery and the queue-based capture helper.
mod events;

/// The parser context and chunk driver.
mod parser;

/// Tag schema: allowed tools and their parameters.
mod schema;

/// Per-state character transition functions.
mod states;

/// Async adapter from chunk streams to event streams.
mod stream;

/// Content block types emitted by the parser.
mod types;

// --- Core Parser API ---

pub use parser::Parser;

// --- Configuration ---

pub use config::ParserOptions;

// --- Schema ---

pub use schema::{ToolSchema, ToolSchemaBuilder};

// --- Events ---

pub use events::{EventQueue, ParseEvent};

// --- Error Handling ---

pub use error::{Error, ParseIssue, Result};

// --- Content Blocks ---

pub use types::{ContentBlock, TextBlock, ToolUseBlock};

// --- Async Streaming ---

pub use stream::parse_stream;

/// Convenience module containing the most commonly used items.
/// Import with `use tooltag::prelude::*;`.
pub mod prelude {
    pub use crate::{
        ContentBlock, Error, EventQueue, ParseEvent, ParseIssue, Parser, ParserOptions, Result,
        TextBlock, ToolSchema, ToolUseBlock, parse_stream,
    };
}
