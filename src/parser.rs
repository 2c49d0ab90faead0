//! Incremental streaming parser for tool-invocation tags in model output.
//!
//! Model output interleaves prose with invocations of the form
//! `<tool_name><param_name>value</param_name>…</tool_name>`. The parser
//! consumes that stream chunk by chunk — chunk boundaries may land anywhere,
//! including mid-tag — and publishes typed [`ContentBlock`]s as soon as they
//! are discernible. Incomplete blocks are republished as *partial* snapshots
//! at chunk boundaries so a UI can render progressively.
//!
//! # Lifecycle
//!
//! 1. Build a [`ToolSchema`](crate::ToolSchema) and construct the parser
//!    with [`Parser::new`].
//! 2. Register callbacks with [`Parser::on_block`] / [`Parser::on_error`].
//! 3. Feed chunks through [`Parser::process_chunk`] as they arrive.
//! 4. Call [`Parser::finalize`] at end of stream. The instance resets and
//!    can be reused for the next stream.
//!
//! `process_chunk` never blocks and never fails: malformed input produces an
//! advisory [`ParseIssue`] and the offending characters are preserved as
//! literal content in the nearest applicable buffer.
//!
//! # Determinism
//!
//! The sequence of non-partial blocks and diagnostics is a pure function of
//! the characters consumed; splitting the same input differently only moves
//! where partial snapshots are taken, never what they contain.
//!
//! # Example
//!
//! ```
//! use tooltag::{ContentBlock, Parser, ParserOptions, ToolSchema};
//!
//! let schema = ToolSchema::builder()
//!     .tool("read_file", ["path", "start_line", "end_line"])
//!     .build()?;
//!
//! let mut parser = Parser::new(schema, ParserOptions::default());
//! parser.on_block(|block| {
//!     if let ContentBlock::ToolUse(tool) = &block {
//!         if !tool.partial {
//!             println!("tool call: {} {:?}", tool.name, tool.params);
//!         }
//!     }
//! });
//!
//! parser.process_chunk("I'll read that file. <read_file><pa");
//! parser.process_chunk("th>src/main.rs</path></read_file>");
//! parser.finalize();
//! # Ok::<(), tooltag::Error>(())
//! ```

use crate::config::ParserOptions;
use crate::error::ParseIssue;
use crate::events::EventSink;
use crate::schema::{NodeId, ROOT, ToolSchema};
use crate::states::ParseState;
use crate::types::{ContentBlock, TextBlock, ToolUseBlock};
use std::collections::HashMap;

/// A tool invocation still being assembled from the stream.
#[derive(Debug, Clone)]
pub(crate) struct ToolUseInProgress {
    pub(crate) name: String,
    pub(crate) params: HashMap<String, String>,
}

impl ToolUseInProgress {
    fn new(name: String) -> Self {
        Self {
            name,
            params: HashMap::new(),
        }
    }
}

/// Streaming parser turning a chunked character stream into content blocks.
///
/// One instance per logical stream; the parser is single-threaded and driven
/// synchronously by its caller. See the [module docs](self) for the
/// lifecycle.
pub struct Parser {
    pub(crate) schema: ToolSchema,
    pub(crate) options: ParserOptions,
    pub(crate) state: ParseState,

    /// Characters accumulated outside any tool.
    pub(crate) text_buffer: String,
    /// Characters of an opening tag name being read.
    pub(crate) tag_buffer: String,
    /// Characters of a closing tag name being read.
    pub(crate) closing_tag_buffer: String,
    /// Characters of the current parameter value.
    pub(crate) param_value_buffer: String,

    /// Position in the schema tree; starts at the root.
    pub(crate) current_node: NodeId,
    /// The invocation being assembled, when inside a tool.
    pub(crate) current_tool_use: Option<ToolUseInProgress>,
    /// The parameter being filled, when inside a parameter tag.
    pub(crate) current_param_name: Option<String>,

    pub(crate) sink: EventSink,
}

impl Parser {
    /// Construct a parser at the start of a stream, in the `Text` state.
    pub fn new(schema: ToolSchema, options: ParserOptions) -> Self {
        Self {
            schema,
            options,
            state: ParseState::default(),
            text_buffer: String::new(),
            tag_buffer: String::new(),
            closing_tag_buffer: String::new(),
            param_value_buffer: String::new(),
            current_node: ROOT,
            current_tool_use: None,
            current_param_name: None,
            sink: EventSink::default(),
        }
    }

    /// Register the block callback, replacing any previous one.
    ///
    /// Delivered blocks are defensive copies; the callback may keep or
    /// mutate them freely without affecting later emissions.
    pub fn on_block<F>(&mut self, handler: F)
    where
        F: FnMut(ContentBlock) + Send + 'static,
    {
        self.sink.block = Some(Box::new(handler));
    }

    /// Register the error callback, replacing any previous one.
    ///
    /// Receives advisory [`ParseIssue`]s in strict mode. Never called in
    /// relaxed mode.
    pub fn on_error<F>(&mut self, handler: F)
    where
        F: FnMut(ParseIssue) + Send + 'static,
    {
        self.sink.issue = Some(Box::new(handler));
    }

    /// The options this parser was constructed with.
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// The schema this parser validates against.
    pub fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    /// Consume one chunk of model output.
    ///
    /// Dispatches every character through the state machine, then publishes
    /// at most one partial snapshot of whatever is still in flight: the
    /// pending text if the parser sits between tools, otherwise the tool-use
    /// under assembly (including the value of a parameter still being read).
    pub fn process_chunk(&mut self, chunk: &str) {
        tracing::trace!(len = chunk.len(), state = ?self.state, "processing chunk");
        for ch in chunk.chars() {
            self.step(ch);
        }
        self.emit_chunk_snapshot();
    }

    /// Signal end of stream.
    ///
    /// Emits pending trailing text as a final block if it is non-empty after
    /// trimming. A tool-use still open at this point is *not* re-emitted;
    /// its last partial snapshot stands as the final observation. All state
    /// then resets to the post-construction condition, so the instance can
    /// parse another stream.
    pub fn finalize(&mut self) {
        if self.state == ParseState::Text {
            self.flush_text_block();
        }
        tracing::debug!(
            open_tool = self.current_tool_use.as_ref().map(|t| t.name.as_str()),
            "finalizing parser"
        );

        self.text_buffer.clear();
        self.tag_buffer.clear();
        self.closing_tag_buffer.clear();
        self.param_value_buffer.clear();
        self.current_node = ROOT;
        self.current_tool_use = None;
        self.current_param_name = None;
        self.state = ParseState::Text;
    }

    /// Begin assembling an invocation of the tool node `node`.
    pub(crate) fn open_tool(&mut self, node: NodeId) {
        let name = self.schema.name(node).to_string();
        tracing::debug!(tool = %name, "opening tool use");
        self.current_tool_use = Some(ToolUseInProgress::new(name));
        self.current_node = node;
    }

    /// Begin collecting the value of the parameter node `node`.
    pub(crate) fn open_param(&mut self, node: NodeId) {
        self.current_param_name = Some(self.schema.name(node).to_string());
        self.param_value_buffer.clear();
        self.current_node = node;
    }

    /// Store the finished parameter value and ascend to the tool.
    pub(crate) fn close_param(&mut self) {
        let key = self
            .current_param_name
            .take()
            .unwrap_or_else(|| self.schema.name(self.current_node).to_string());
        let value = std::mem::take(&mut self.param_value_buffer);
        if let Some(tool) = self.current_tool_use.as_mut() {
            tool.params.insert(key, value);
        }
        self.current_node = self.schema.parent(self.current_node).unwrap_or(ROOT);
    }

    /// Emit the assembled invocation as a final block and return to root.
    pub(crate) fn close_tool(&mut self) {
        if let Some(tool) = self.current_tool_use.take() {
            self.emit_block(ContentBlock::ToolUse(ToolUseBlock::new(
                tool.name,
                tool.params,
                false,
            )));
        }
        self.current_node = ROOT;
    }

    /// Abandon whatever was in flight and return to prose at the root.
    /// Recovery of last resort; the surrounding handler has already salvaged
    /// what it could into a buffer.
    pub(crate) fn reset_to_root(&mut self) {
        self.current_tool_use = None;
        self.current_param_name = None;
        self.param_value_buffer.clear();
        self.closing_tag_buffer.clear();
        self.current_node = ROOT;
        self.state = ParseState::Text;
    }

    /// Flush `text_buffer` as a final text block, trimmed; empty results
    /// are dropped. The buffer is cleared either way.
    pub(crate) fn flush_text_block(&mut self) {
        let text = std::mem::take(&mut self.text_buffer);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.emit_block(ContentBlock::Text(TextBlock::new(trimmed, false)));
        }
    }

    /// Publish at most one partial snapshot for the chunk boundary.
    fn emit_chunk_snapshot(&mut self) {
        if self.state == ParseState::Text {
            let trimmed = self.text_buffer.trim();
            if !trimmed.is_empty() {
                let block = ContentBlock::Text(TextBlock::new(trimmed, true));
                self.emit_block(block);
                return;
            }
        }

        if let Some(tool) = &self.current_tool_use {
            // Deep-copy the working params so the consumer can hold the
            // snapshot while parsing continues; fold in the value of a
            // parameter still being read.
            let mut params = tool.params.clone();
            if let Some(param) = &self.current_param_name {
                params.insert(param.clone(), self.param_value_buffer.clone());
            }
            let block = ContentBlock::ToolUse(ToolUseBlock::new(tool.name.clone(), params, true));
            self.emit_block(block);
        }
    }

    pub(crate) fn emit_block(&mut self, block: ContentBlock) {
        tracing::trace!(partial = block.is_partial(), "emitting block");
        self.sink.emit_block(block);
    }

    /// Report a recoverable anomaly. Relaxed mode swallows the event; the
    /// recovery that accompanies it happens in the caller either way.
    pub(crate) fn report(&mut self, issue: ParseIssue) {
        tracing::debug!(%issue, relaxed = self.options.relaxed_mode, "recovering from malformed input");
        if !self.options.relaxed_mode {
            self.sink.emit_issue(issue);
        }
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("state", &self.state)
            .field("current_node", &self.schema.name(self.current_node))
            .field("text_buffer", &self.text_buffer)
            .field("tag_buffer", &self.tag_buffer)
            .field("closing_tag_buffer", &self.closing_tag_buffer)
            .field("param_value_buffer", &self.param_value_buffer)
            .field("current_tool_use", &self.current_tool_use)
            .field("current_param_name", &self.current_param_name)
            .field("relaxed_mode", &self.options.relaxed_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventQueue, ParseEvent};

    fn schema() -> ToolSchema {
        ToolSchema::builder()
            .tool("read_file", ["path", "start_line", "end_line"])
            .build()
            .unwrap()
    }

    fn parser_with_queue() -> (Parser, EventQueue) {
        let mut parser = Parser::new(schema(), ParserOptions::default());
        let queue = EventQueue::new();
        queue.attach(&mut parser);
        (parser, queue)
    }

    fn blocks(events: Vec<ParseEvent>) -> Vec<ContentBlock> {
        events.into_iter().filter_map(ParseEvent::into_block).collect()
    }

    #[test]
    fn test_text_partial_then_final() {
        let (mut parser, queue) = parser_with_queue();

        parser.process_chunk("Hello world");
        let partials = blocks(queue.drain());
        assert_eq!(partials.len(), 1);
        let text = partials[0].as_text().unwrap();
        assert_eq!(text.text, "Hello world");
        assert!(text.partial);

        parser.finalize();
        let finals = blocks(queue.drain());
        assert_eq!(finals.len(), 1);
        let text = finals[0].as_text().unwrap();
        assert_eq!(text.text, "Hello world");
        assert!(!text.partial);
    }

    #[test]
    fn test_partial_snapshot_includes_open_param_value() {
        let (mut parser, queue) = parser_with_queue();

        parser.process_chunk("<read_file><path>fi");
        let emitted = blocks(queue.drain());
        assert_eq!(emitted.len(), 1);
        let tool = emitted[0].as_tool_use().unwrap();
        assert!(tool.partial);
        assert_eq!(tool.param("path"), Some("fi"));

        // The transient snapshot write must not have leaked into the
        // working state: the value keeps growing from where it was.
        parser.process_chunk("le.txt</path>");
        let emitted = blocks(queue.drain());
        let tool = emitted[0].as_tool_use().unwrap();
        assert_eq!(tool.param("path"), Some("file.txt"));
    }

    #[test]
    fn test_no_snapshot_when_idle() {
        let (mut parser, queue) = parser_with_queue();

        parser.process_chunk("");
        assert!(queue.drain().is_empty());

        parser.process_chunk("   ");
        // Whitespace-only text trims to nothing.
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_finalize_resets_state_for_reuse() {
        let (mut parser, queue) = parser_with_queue();

        // Abandon a stream mid-tool, then reuse the instance.
        parser.process_chunk("<read_file><path>half");
        parser.finalize();
        queue.drain();

        parser.process_chunk("<read_file><path>a.rs</path></read_file>");
        parser.finalize();
        let emitted = blocks(queue.drain());
        let finals: Vec<_> = emitted.iter().filter(|b| !b.is_partial()).collect();
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].as_tool_use().unwrap().param("path"), Some("a.rs"));
    }

    #[test]
    fn test_finalize_does_not_emit_open_tool() {
        let (mut parser, queue) = parser_with_queue();

        parser.process_chunk("<read_file><path>x</path>");
        let after_chunk = queue.drain();
        assert_eq!(blocks(after_chunk).len(), 1); // the boundary snapshot

        parser.finalize();
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_emitted_params_are_isolated() {
        let (mut parser, queue) = parser_with_queue();

        parser.process_chunk("<read_file><path>a");
        let mut emitted = blocks(queue.drain());
        if let Some(ContentBlock::ToolUse(tool)) = emitted.first_mut() {
            tool.params.insert("path".to_string(), "tampered".to_string());
        }

        parser.process_chunk("b</path></read_file>");
        let emitted = blocks(queue.drain());
        let done = emitted
            .iter()
            .find(|b| !b.is_partial())
            .and_then(ContentBlock::as_tool_use)
            .unwrap();
        assert_eq!(done.param("path"), Some("ab"));
    }

    #[test]
    fn test_debug_omits_callbacks() {
        let (parser, _queue) = parser_with_queue();
        let repr = format!("{parser:?}");
        assert!(repr.contains("Parser"));
        assert!(repr.contains("relaxed_mode"));
    }
}
