//! Event surface: block and error delivery.
//!
//! The parser publishes through two named callbacks registered with
//! [`Parser::on_block`](crate::Parser::on_block) and
//! [`Parser::on_error`](crate::Parser::on_error). That is the whole surface;
//! there is deliberately no general-purpose emitter.
//!
//! [`EventQueue`] is a small convenience for consumers that prefer pulling
//! over callbacks: it attaches to a parser and records every event into a
//! shared queue which can be drained later. The async adapter in
//! [`stream`](crate::stream) and the test suite are both built on it.

use crate::error::ParseIssue;
use crate::types::ContentBlock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Boxed block callback.
pub(crate) type BlockHandler = Box<dyn FnMut(ContentBlock) + Send>;

/// Boxed error callback.
pub(crate) type IssueHandler = Box<dyn FnMut(ParseIssue) + Send>;

/// The two named callbacks a parser publishes through.
#[derive(Default)]
pub(crate) struct EventSink {
    pub(crate) block: Option<BlockHandler>,
    pub(crate) issue: Option<IssueHandler>,
}

impl EventSink {
    pub(crate) fn emit_block(&mut self, block: ContentBlock) {
        if let Some(handler) = self.block.as_mut() {
            handler(block);
        }
    }

    pub(crate) fn emit_issue(&mut self, issue: ParseIssue) {
        if let Some(handler) = self.issue.as_mut() {
            handler(issue);
        }
    }
}

/// One delivery from the parser: a content block or an advisory diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// A text or tool-use block.
    Block(ContentBlock),
    /// A recoverable anomaly (strict mode only).
    Issue(ParseIssue),
}

impl ParseEvent {
    /// Borrow the block, if this event carries one.
    pub fn as_block(&self) -> Option<&ContentBlock> {
        match self {
            ParseEvent::Block(block) => Some(block),
            ParseEvent::Issue(_) => None,
        }
    }

    /// Consume the event into its block, if it carries one.
    pub fn into_block(self) -> Option<ContentBlock> {
        match self {
            ParseEvent::Block(block) => Some(block),
            ParseEvent::Issue(_) => None,
        }
    }

    /// Whether this event is an advisory diagnostic.
    pub fn is_issue(&self) -> bool {
        matches!(self, ParseEvent::Issue(_))
    }
}

/// Shared queue capturing parser events in emission order.
///
/// # Example
///
/// ```
/// use tooltag::{EventQueue, Parser, ParserOptions, ToolSchema};
///
/// let schema = ToolSchema::builder().tool("read_file", ["path"]).build()?;
/// let mut parser = Parser::new(schema, ParserOptions::default());
///
/// let queue = EventQueue::new();
/// queue.attach(&mut parser);
///
/// parser.process_chunk("<read_file><path>a.rs</path></read_file>");
/// parser.finalize();
///
/// let events = queue.drain();
/// assert_eq!(events.len(), 1);
/// # Ok::<(), tooltag::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<ParseEvent>>>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register this queue as both the block and error callback of `parser`.
    ///
    /// Replaces any previously registered callbacks.
    pub fn attach(&self, parser: &mut crate::Parser) {
        let blocks = Arc::clone(&self.inner);
        parser.on_block(move |block| {
            blocks
                .lock()
                .expect("event queue lock poisoned")
                .push_back(ParseEvent::Block(block));
        });

        let issues = Arc::clone(&self.inner);
        parser.on_error(move |issue| {
            issues
                .lock()
                .expect("event queue lock poisoned")
                .push_back(ParseEvent::Issue(issue));
        });
    }

    /// Remove and return every captured event, in emission order.
    pub fn drain(&self) -> Vec<ParseEvent> {
        self.inner
            .lock()
            .expect("event queue lock poisoned")
            .drain(..)
            .collect()
    }

    /// Number of captured events currently queued.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("event queue lock poisoned").len()
    }

    /// Whether the queue currently holds no events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
