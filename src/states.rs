//! State machine states and per-character transition functions.
//!
//! Five states cover the mini-language: prose ([`Text`](ParseState::Text)),
//! the character right after `<` ([`TagOpening`](ParseState::TagOpening)),
//! an opening tag name ([`TagName`](ParseState::TagName)), content inside a
//! tool or parameter ([`TextContent`](ParseState::TextContent)), and a
//! closing tag name ([`ClosingTag`](ParseState::ClosingTag)).
//!
//! The states are plain enum variants; all mutable state lives in the
//! [`Parser`], and each transition function mutates it and assigns the next
//! state. An opening tag name is resolved once its terminating `>` or
//! whitespace arrives; a name unknown in the current context falls back to
//! literal text, with the full name in the diagnostic. Closing tag names
//! are checked as they accumulate, since only one name can match the node
//! being closed.

use crate::error::ParseIssue;
use crate::parser::Parser;
use crate::schema::ROOT;

/// Identifier of the current parse state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    /// Prose outside any tool.
    #[default]
    Text,
    /// Saw `<`; deciding between an opening tag, a closing tag, or literal text.
    TagOpening,
    /// Reading an opening tag name.
    TagName,
    /// Inside a tool (between parameter tags) or inside a parameter value.
    TextContent,
    /// Reading a closing tag name after `</`.
    ClosingTag,
}

impl Parser {
    /// Dispatch one character to the current state's transition function.
    pub(crate) fn step(&mut self, ch: char) {
        match self.state {
            ParseState::Text => self.text_char(ch),
            ParseState::TagOpening => self.tag_opening_char(ch),
            ParseState::TagName => self.tag_name_char(ch),
            ParseState::TextContent => self.text_content_char(ch),
            ParseState::ClosingTag => self.closing_tag_char(ch),
        }
    }

    /// `Text`: accumulate prose; `<` flushes the pending text as a final
    /// block and opens a tag.
    fn text_char(&mut self, ch: char) {
        if ch == '<' {
            self.flush_text_block();
            self.tag_buffer.clear();
            self.state = ParseState::TagOpening;
            return;
        }

        if self.schema.allows_text(self.current_node) {
            self.text_buffer.push(ch);
        } else if ch.is_whitespace() {
            // Tolerated between structural elements.
        } else {
            self.report(ParseIssue::UnexpectedCharacter { ch });
            self.text_buffer.push(ch);
        }
    }

    /// `TagOpening`: the single character after `<` decides everything.
    fn tag_opening_char(&mut self, ch: char) {
        if ch == '/' {
            if self.schema.parent(self.current_node).is_some() {
                self.closing_tag_buffer.clear();
                self.state = ParseState::ClosingTag;
            } else {
                // `</` at the root has nothing to close.
                self.report(ParseIssue::ClosingTagWithoutOpening);
                self.text_buffer.push_str("</");
                self.state = ParseState::Text;
            }
        } else if ch.is_whitespace() {
            // A lone `<` followed by whitespace is literal content, not a
            // tag; it lands in whichever buffer matches the context.
            self.report(ParseIssue::WhitespaceAfterBracket);
            if self.current_param_name.is_some() {
                self.param_value_buffer.push('<');
                self.param_value_buffer.push(ch);
                self.state = ParseState::TextContent;
            } else if self.current_node == ROOT {
                self.text_buffer.push('<');
                self.text_buffer.push(ch);
                self.state = ParseState::Text;
            } else {
                // Inside a tool with no parameter open: nowhere sensible to
                // put content, so salvage the literal as prose and start
                // over.
                self.text_buffer.push('<');
                self.text_buffer.push(ch);
                self.reset_to_root();
            }
        } else {
            self.tag_buffer.push(ch);
            self.state = ParseState::TagName;
        }
    }

    /// `TagName`: accumulate the name; it is resolved against the current
    /// node's children once the terminating `>` or whitespace arrives.
    fn tag_name_char(&mut self, ch: char) {
        if ch == '>' {
            match self.schema.child_named(self.current_node, &self.tag_buffer) {
                Some(child) if self.schema.is_tool(child) => {
                    self.open_tool(child);
                    self.tag_buffer.clear();
                    self.state = ParseState::TextContent;
                }
                Some(child) => {
                    self.open_param(child);
                    self.tag_buffer.clear();
                    self.state = ParseState::TextContent;
                }
                None => self.handle_invalid_tag('>'),
            }
        } else if ch.is_whitespace() {
            // Whitespace after a complete valid name means attributes are
            // being attempted; either way the tag is not accepted.
            if self
                .schema
                .child_named(self.current_node, &self.tag_buffer)
                .is_some()
            {
                self.report(ParseIssue::WhitespaceInTag);
            }
            self.handle_invalid_tag(ch);
        } else {
            self.tag_buffer.push(ch);
        }
    }

    /// `TextContent`: collect a parameter value, or skip the whitespace a
    /// tool interior is allowed to contain between its parameter tags.
    fn text_content_char(&mut self, ch: char) {
        if ch == '<' {
            self.tag_buffer.clear();
            self.state = ParseState::TagOpening;
            return;
        }

        if self.current_param_name.is_some() {
            self.param_value_buffer.push(ch);
        } else if self.schema.allows_text(self.current_node) {
            self.text_buffer.push(ch);
        } else if ch.is_whitespace() {
            // Tool interiors tolerate whitespace between parameter tags.
        } else {
            let context = self.schema.name(self.current_node).to_string();
            self.report(ParseIssue::UnexpectedCharacterIn { context, ch });
            self.text_buffer.push(ch);
        }
    }

    /// `ClosingTag`: accumulate the closing name, rejecting it the moment
    /// it diverges from the name of the node being closed.
    fn closing_tag_char(&mut self, ch: char) {
        if ch == '>' {
            if self.closing_tag_buffer == self.schema.name(self.current_node) {
                self.close_current_node();
            } else {
                self.handle_mismatched_closing(true);
            }
        } else {
            self.closing_tag_buffer.push(ch);
            if !self
                .schema
                .name(self.current_node)
                .starts_with(self.closing_tag_buffer.as_str())
            {
                self.handle_mismatched_closing(false);
            }
        }
    }

    /// A well-formed `</name>` matching the current node.
    fn close_current_node(&mut self) {
        self.closing_tag_buffer.clear();

        if self.schema.is_tool(self.current_node) {
            self.close_tool();
        } else {
            self.close_param();
        }

        self.state = if self.current_node == ROOT {
            ParseState::Text
        } else {
            ParseState::TextContent
        };
    }

    /// A complete opening-tag name that matches no child of the current
    /// node. The literal characters (including the `<` and the terminating
    /// character) are preserved in the buffer that matches the context,
    /// then parsing resumes as content.
    ///
    /// `terminator` is the character that ended the name (`>` or
    /// whitespace).
    pub(crate) fn handle_invalid_tag(&mut self, terminator: char) {
        let name = std::mem::take(&mut self.tag_buffer);

        let mut literal = String::with_capacity(name.len() + 2);
        literal.push('<');
        literal.push_str(&name);
        literal.push(terminator);

        if self.current_node == ROOT {
            self.report(ParseIssue::InvalidToolName { name });
            self.text_buffer.push_str(&literal);
            self.state = ParseState::Text;
        } else if self.schema.is_tool(self.current_node) {
            let tool = self.schema.name(self.current_node).to_string();
            self.report(ParseIssue::InvalidParamName { name, tool });
            self.param_value_buffer.push_str(&literal);
            self.state = ParseState::TextContent;
        } else if self.schema.allows_text(self.current_node) {
            self.report(ParseIssue::InvalidTagName { name });
            self.param_value_buffer.push_str(&literal);
            self.state = ParseState::TextContent;
        } else {
            self.report(ParseIssue::InvalidTagName { name });
            self.text_buffer.push_str(&literal);
            self.reset_to_root();
        }
    }

    /// A closing tag that does not belong to the current node. The literal
    /// `</name` (and `>` when the tag was terminated) lands in the buffer
    /// that matches the context; the one prefix-mismatch path and the
    /// `>`-final path share this routine.
    pub(crate) fn handle_mismatched_closing(&mut self, terminated: bool) {
        let actual = std::mem::take(&mut self.closing_tag_buffer);
        let expected = self.schema.name(self.current_node).to_string();
        self.report(ParseIssue::MismatchedClosingTag {
            expected,
            actual: actual.clone(),
        });

        let mut literal = String::with_capacity(actual.len() + 3);
        literal.push_str("</");
        literal.push_str(&actual);
        if terminated {
            literal.push('>');
        }

        if self.current_param_name.is_some() {
            self.param_value_buffer.push_str(&literal);
            self.state = ParseState::TextContent;
        } else if self.schema.allows_text(self.current_node) {
            self.text_buffer.push_str(&literal);
            self.state = if self.current_node == ROOT {
                ParseState::Text
            } else {
                ParseState::TextContent
            };
        } else {
            // Inside a tool with no parameter open: nowhere sensible to put
            // content, so salvage the literal as prose and start over.
            self.text_buffer.push_str(&literal);
            self.reset_to_root();
        }
    }
}
