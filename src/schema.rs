//! Schema describing the tags the parser will accept.
//!
//! The schema is a tree of depth exactly three: a synthetic root, one node
//! per tool, and one node per parameter under its tool. Tool nodes do not
//! accept text content (only parameter tags and whitespace); parameter nodes
//! accept arbitrary text and have no children.
//!
//! Nodes live in a flat arena ([`Vec`]) and refer to each other by index, so
//! the parent back-references the parser needs while ascending never form an
//! ownership cycle.
//!
//! # Example
//!
//! ```
//! use tooltag::ToolSchema;
//!
//! let schema = ToolSchema::builder()
//!     .tool("read_file", ["path", "start_line", "end_line"])
//!     .tool("execute_command", ["command"])
//!     .build()?;
//!
//! assert_eq!(schema.tool_names().count(), 2);
//! # Ok::<(), tooltag::Error>(())
//! ```

use crate::{Error, Result};

/// Index of a node in the schema arena.
pub(crate) type NodeId = usize;

/// The synthetic root node; always index 0.
pub(crate) const ROOT: NodeId = 0;

/// One node in the schema tree: the root, a tool, or a parameter.
#[derive(Debug, Clone)]
pub(crate) struct SchemaNode {
    /// Tag name; empty for the root.
    pub(crate) name: String,
    /// Whether free text may accumulate while this node is current.
    pub(crate) allows_text: bool,
    /// Parent index; `None` only for the root.
    pub(crate) parent: Option<NodeId>,
    /// Child indices in declaration order.
    pub(crate) children: Vec<NodeId>,
}

/// Immutable description of the allowed tool and parameter tags.
///
/// Built once via [`ToolSchema::builder`] and handed to
/// [`Parser::new`](crate::Parser::new). Cloning is cheap enough to share one
/// schema across many parser instances.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    nodes: Vec<SchemaNode>,
}

impl ToolSchema {
    /// Start building a schema.
    pub fn builder() -> ToolSchemaBuilder {
        ToolSchemaBuilder::default()
    }

    /// Names of the configured tools, in declaration order.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.nodes[ROOT]
            .children
            .iter()
            .map(|&id| self.nodes[id].name.as_str())
    }

    /// Names of the parameters of `tool`, in declaration order, or `None`
    /// if the tool is not part of this schema.
    pub fn param_names(&self, tool: &str) -> Option<Vec<&str>> {
        let id = self.child_named(ROOT, tool)?;
        Some(
            self.nodes[id]
                .children
                .iter()
                .map(|&child| self.nodes[child].name.as_str())
                .collect(),
        )
    }

    pub(crate) fn name(&self, id: NodeId) -> &str {
        &self.nodes[id].name
    }

    pub(crate) fn allows_text(&self, id: NodeId) -> bool {
        self.nodes[id].allows_text
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// A tool node is a direct child of the root.
    pub(crate) fn is_tool(&self, id: NodeId) -> bool {
        self.nodes[id].parent == Some(ROOT)
    }

    /// Exact-name lookup among the children of `id`.
    pub(crate) fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].name == name)
    }
}

/// Builder collecting `(tool, parameters)` declarations for a [`ToolSchema`].
#[derive(Debug, Default)]
pub struct ToolSchemaBuilder {
    tools: Vec<(String, Vec<String>)>,
}

impl ToolSchemaBuilder {
    /// Declare a tool tag and its allowed parameter tags.
    ///
    /// Declaration order is preserved; it has no effect on parsing but keeps
    /// introspection output stable.
    pub fn tool<I, P>(mut self, name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.tools.push((
            name.into(),
            params.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Validate the declarations and build the schema arena.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when a name is empty, contains whitespace or
    /// one of `<`, `>`, `/`, or when a tool or parameter name is declared
    /// twice within its scope.
    pub fn build(self) -> Result<ToolSchema> {
        let mut nodes = vec![SchemaNode {
            name: String::new(),
            allows_text: true,
            parent: None,
            children: Vec::new(),
        }];

        for (tool, params) in self.tools {
            validate_name("tool", &tool)?;

            let tool_id = nodes.len();
            if nodes[ROOT]
                .children
                .iter()
                .any(|&id| nodes[id].name == tool)
            {
                return Err(Error::schema(format!("duplicate tool name `{tool}`")));
            }
            nodes.push(SchemaNode {
                name: tool.clone(),
                allows_text: false,
                parent: Some(ROOT),
                children: Vec::new(),
            });
            nodes[ROOT].children.push(tool_id);

            for param in params {
                validate_name("param", &param)?;
                if nodes[tool_id]
                    .children
                    .iter()
                    .any(|&id| nodes[id].name == param)
                {
                    return Err(Error::schema(format!(
                        "duplicate param name `{param}` for tool `{tool}`"
                    )));
                }
                let param_id = nodes.len();
                nodes.push(SchemaNode {
                    name: param,
                    allows_text: true,
                    parent: Some(tool_id),
                    children: Vec::new(),
                });
                nodes[tool_id].children.push(param_id);
            }
        }

        Ok(ToolSchema { nodes })
    }
}

fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::schema(format!("{kind} name cannot be empty")));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/'))
    {
        return Err(Error::schema(format!(
            "{kind} name `{name}` contains illegal character {ch:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_schema() -> ToolSchema {
        ToolSchema::builder()
            .tool("read_file", ["path", "start_line", "end_line"])
            .tool("execute_command", ["command"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builds_three_level_tree() {
        let schema = demo_schema();

        let tools: Vec<_> = schema.tool_names().collect();
        assert_eq!(tools, vec!["read_file", "execute_command"]);

        let params = schema.param_names("read_file").unwrap();
        assert_eq!(params, vec!["path", "start_line", "end_line"]);
        assert!(schema.param_names("unknown").is_none());
    }

    #[test]
    fn test_node_kinds() {
        let schema = demo_schema();

        assert!(schema.allows_text(ROOT));
        assert!(schema.parent(ROOT).is_none());

        let tool = schema.child_named(ROOT, "read_file").unwrap();
        assert!(schema.is_tool(tool));
        assert!(!schema.allows_text(tool));
        assert_eq!(schema.parent(tool), Some(ROOT));

        let param = schema.child_named(tool, "path").unwrap();
        assert!(!schema.is_tool(param));
        assert!(schema.allows_text(param));
        assert_eq!(schema.parent(param), Some(tool));
    }

    #[test]
    fn test_rejects_duplicate_tool() {
        let err = ToolSchema::builder()
            .tool("read_file", ["path"])
            .tool("read_file", ["path"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate tool name"));
    }

    #[test]
    fn test_rejects_duplicate_param() {
        let err = ToolSchema::builder()
            .tool("read_file", ["path", "path"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate param name"));
    }

    #[test]
    fn test_rejects_illegal_names() {
        for bad in ["", "with space", "a<b", "a>b", "a/b"] {
            assert!(
                ToolSchema::builder().tool(bad, ["p"]).build().is_err(),
                "expected rejection of {bad:?}"
            );
        }
    }
}
