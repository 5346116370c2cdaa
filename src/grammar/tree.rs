use serde::Serialize;

use super::symbol::Symbol;

/// A node of a parse tree. Children are owned by their parent; the
/// drivers keep the parent chain on an explicit stack while building, so
/// no back-pointers are stored. The finished root belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseNode {
    pub label: Symbol,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn new(label: Symbol) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }

    pub fn with_children(label: Symbol, children: Vec<ParseNode>) -> Self {
        Self { label, children }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels, counting this node.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ParseNode::depth)
            .max()
            .unwrap_or(0)
    }
}
