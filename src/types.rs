//! Content block types emitted by the parser.
//!
//! Model output decomposes into a sequence of blocks: free-form prose becomes
//! [`TextBlock`]s and each tool invocation becomes a [`ToolUseBlock`]. Both
//! carry a `partial` flag: a partial block is a snapshot of content that may
//! still grow with further input, republished at chunk boundaries so UIs can
//! render progressively. A non-partial block is final and never re-emitted.
//!
//! # Serialization
//!
//! Blocks use serde's internally tagged format with a `"type"` field:
//!
//! ```json
//! {"type": "text", "text": "Hello", "partial": false}
//! {"type": "tool_use", "name": "read_file", "params": {"path": "a.rs"}, "partial": true}
//! ```
//!
//! # Example
//!
//! ```
//! use tooltag::{ContentBlock, TextBlock};
//!
//! let block = ContentBlock::Text(TextBlock::new("Hello", false));
//! assert!(!block.is_partial());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One emitted content item, either prose or an assembled tool invocation.
///
/// Blocks are never mutated after emission; a partial block is superseded by
/// a later emission rather than updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content block containing whitespace-trimmed prose.
    Text(TextBlock),

    /// Tool invocation assembled from `<tool><param>…</param></tool>` tags.
    ToolUse(ToolUseBlock),
}

impl ContentBlock {
    /// Whether this block may still grow with further input.
    pub fn is_partial(&self) -> bool {
        match self {
            ContentBlock::Text(text) => text.partial,
            ContentBlock::ToolUse(tool) => tool.partial,
        }
    }

    /// Borrow the inner text block, if this is one.
    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            ContentBlock::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the inner tool-use block, if this is one.
    pub fn as_tool_use(&self) -> Option<&ToolUseBlock> {
        match self {
            ContentBlock::ToolUse(tool) => Some(tool),
            _ => None,
        }
    }
}

/// Prose content between tool invocations.
///
/// The parser trims surrounding whitespace before emission; interior
/// whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// The trimmed text content.
    pub text: String,

    /// `true` while the text may still grow; `false` once finalized.
    pub partial: bool,
}

impl TextBlock {
    /// Creates a new text block.
    ///
    /// # Example
    ///
    /// ```
    /// use tooltag::TextBlock;
    ///
    /// let block = TextBlock::new("Hello", true);
    /// assert_eq!(block.text, "Hello");
    /// assert!(block.partial);
    /// ```
    pub fn new(text: impl Into<String>, partial: bool) -> Self {
        Self {
            text: text.into(),
            partial,
        }
    }
}

/// A tool invocation parsed out of the stream.
///
/// `params` maps parameter names to their raw string values, exactly as they
/// appeared between the parameter tags (whitespace preserved). A partial
/// block is a defensive copy of the parser's working state: mutating its map
/// never affects later emissions.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use tooltag::ToolUseBlock;
///
/// let mut params = HashMap::new();
/// params.insert("path".to_string(), "src/main.rs".to_string());
/// let block = ToolUseBlock::new("read_file", params, false);
/// assert_eq!(block.param("path"), Some("src/main.rs"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseBlock {
    /// Name of the tool being invoked.
    pub name: String,

    /// Parameter name → raw string value.
    pub params: HashMap<String, String>,

    /// `true` while the invocation is still being assembled.
    pub partial: bool,
}

impl ToolUseBlock {
    /// Creates a new tool-use block.
    pub fn new(name: impl Into<String>, params: HashMap<String, String>, partial: bool) -> Self {
        Self {
            name: name.into(),
            params,
            partial,
        }
    }

    /// Look up a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Render the parameter map as a JSON object.
    ///
    /// Tool handlers downstream typically want structured input; values stay
    /// strings since the mini-language has no typed scalars.
    pub fn input_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.params
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_text_block_new() {
        let block = TextBlock::new("Hello world", false);
        assert_eq!(block.text, "Hello world");
        assert!(!block.partial);
    }

    #[test]
    fn test_content_block_accessors() {
        let text = ContentBlock::Text(TextBlock::new("hi", true));
        assert!(text.is_partial());
        assert!(text.as_text().is_some());
        assert!(text.as_tool_use().is_none());

        let tool = ContentBlock::ToolUse(ToolUseBlock::new("read_file", HashMap::new(), false));
        assert!(!tool.is_partial());
        assert!(tool.as_tool_use().is_some());
        assert!(tool.as_text().is_none());
    }

    #[test]
    fn test_tool_use_param_lookup() {
        let block = ToolUseBlock::new("read_file", params(&[("path", "a.rs")]), false);
        assert_eq!(block.param("path"), Some("a.rs"));
        assert_eq!(block.param("missing"), None);
    }

    #[test]
    fn test_tool_use_input_json() {
        let block = ToolUseBlock::new("read_file", params(&[("path", "a.rs")]), false);
        let json = block.input_json();
        assert_eq!(json["path"], "a.rs");
    }

    #[test]
    fn test_serialization_tags() {
        let text = ContentBlock::Text(TextBlock::new("hi", false));
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hi");

        let tool = ContentBlock::ToolUse(ToolUseBlock::new(
            "read_file",
            params(&[("path", "a.rs")]),
            true,
        ));
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["type"], "tool_use");
        assert_eq!(json["name"], "read_file");
        assert_eq!(json["params"]["path"], "a.rs");
        assert_eq!(json["partial"], true);
    }

    #[test]
    fn test_round_trip_deserialization() {
        let original = ContentBlock::ToolUse(ToolUseBlock::new(
            "read_file",
            params(&[("path", "a.rs"), ("start_line", "1")]),
            false,
        ));
        let json = serde_json::to_string(&original).unwrap();
        let back: ContentBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
