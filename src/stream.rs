//! Async adapter: chunk streams in, parse events out.
//!
//! The core [`Parser`] is synchronous and callback-driven. Streaming-first
//! consumers usually hold the model output as a [`futures::Stream`] of text
//! chunks instead; [`parse_stream`] bridges the two, feeding each chunk
//! through a parser and yielding every resulting [`ParseEvent`] in order.
//! When the upstream ends the parser is finalized, so the trailing text
//! block (if any) is part of the output.
//!
//! No I/O happens here; the adapter is pure plumbing and runs on whatever
//! executor polls it.
//!
//! # Example
//!
//! ```
//! use futures::{StreamExt, stream};
//! use tooltag::{ParserOptions, ToolSchema, parse_stream};
//!
//! # futures::executor::block_on(async {
//! let schema = ToolSchema::builder().tool("read_file", ["path"]).build().unwrap();
//! let chunks = stream::iter(vec![
//!     "<read_file><pa".to_string(),
//!     "th>a.rs</path></read_file>".to_string(),
//! ]);
//!
//! let mut events = parse_stream(chunks, schema, ParserOptions::default());
//! while let Some(event) = events.next().await {
//!     println!("{event:?}");
//! }
//! # });
//! ```

use crate::config::ParserOptions;
use crate::events::{EventQueue, ParseEvent};
use crate::parser::Parser;
use crate::schema::ToolSchema;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

/// Parse a stream of text chunks into a stream of [`ParseEvent`]s.
///
/// Each upstream item is handed to [`Parser::process_chunk`] as one chunk,
/// so chunk-boundary partial snapshots land exactly where the upstream
/// yields. After the last chunk the parser is finalized and its remaining
/// events are flushed.
///
/// The returned stream is `Send` and boxed, matching how the rest of the
/// ecosystem passes streams across task boundaries.
pub fn parse_stream<S>(
    chunks: S,
    schema: ToolSchema,
    options: ParserOptions,
) -> Pin<Box<dyn Stream<Item = ParseEvent> + Send>>
where
    S: Stream<Item = String> + Send + 'static,
{
    let mut parser = Parser::new(schema, options);
    let queue = EventQueue::new();
    queue.attach(&mut parser);

    // `None` marks end of stream and triggers finalization.
    let source = chunks.map(Some).chain(stream::once(async { None }));

    let events = source.flat_map(move |item| {
        match item {
            Some(chunk) => parser.process_chunk(&chunk),
            None => parser.finalize(),
        }
        stream::iter(queue.drain())
    });

    Box::pin(events)
}
