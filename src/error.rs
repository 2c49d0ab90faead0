//! Error types for the tooltag parser
//!
//! Two distinct families live here:
//!
//! - [`Error`]: hard failures surfaced through [`Result`], produced only at
//!   construction time (schema validation). Parsing itself never fails.
//! - [`ParseIssue`]: advisory diagnostics emitted through the parser's error
//!   callback while it recovers from malformed input. These never abort a
//!   parse; the offending characters are preserved as literal content.
//!
//! Callers that need to classify a [`ParseIssue`] programmatically can match
//! on the enum variants, or on the stable message prefixes (`"Invalid tool
//! name"`, `"Mismatched closing tag"`, …) when only the rendered string is
//! available.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Hard error produced while constructing a schema or parser
#[derive(Error, Debug)]
pub enum Error {
    /// Schema definition rejected during build
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Advisory diagnostic describing malformed input the parser recovered from.
///
/// Delivered through [`Parser::on_error`](crate::Parser::on_error) in strict
/// mode; suppressed entirely in relaxed mode. Recovery behavior is identical
/// in both modes, so a `ParseIssue` is information, not a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// An opening tag at the top level that matches no configured tool.
    #[error("Invalid tool name: {name}")]
    InvalidToolName {
        /// The tag name as buffered when the mismatch was detected.
        name: String,
    },

    /// An opening tag inside a tool that matches none of its parameters.
    #[error("Invalid param name: {name} for tool {tool}")]
    InvalidParamName {
        /// The tag name as buffered when the mismatch was detected.
        name: String,
        /// The tool whose parameters were searched.
        tool: String,
    },

    /// An opening tag that is invalid in its context.
    #[error("Invalid tag name: {name}")]
    InvalidTagName {
        /// The tag name as buffered when the mismatch was detected.
        name: String,
    },

    /// A closing tag that does not match the tag currently open.
    #[error("Mismatched closing tag: expected `</{expected}>` but got `</{actual}>`")]
    MismatchedClosingTag {
        /// Name of the node that was open.
        expected: String,
        /// The closing-tag name as buffered when the mismatch was detected.
        actual: String,
    },

    /// Whitespace immediately following `<`.
    #[error("Unexpected whitespace after '<'")]
    WhitespaceAfterBracket,

    /// Whitespace inside a tag name where the buffered name already matches
    /// a valid tag, i.e. an attempt to write attributes.
    #[error("Unexpected whitespace in parameter tag")]
    WhitespaceInTag,

    /// A character outside any tool where text content is not allowed.
    #[error("Unexpected character outside of allowed text content")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
    },

    /// A character inside a tool where only parameter tags are allowed.
    #[error("Unexpected character in <{context}> context")]
    UnexpectedCharacterIn {
        /// Name of the node the character appeared in.
        context: String,
        /// The offending character.
        ch: char,
    },

    /// A `</…>` sequence while no tag was open.
    #[error("Closing tag without matching opening tag")]
    ClosingTagWithoutOpening,
}
