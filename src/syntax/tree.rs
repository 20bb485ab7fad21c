//! Arena-backed parse tree.
//!
//! Nodes live in a flat `Vec` and reference their children by index, so the
//! tree is a strict ownership hierarchy with no sharing and no cycles. A
//! tree is built once per parse call and never mutated afterwards.
//!
//! Error nodes are ordinary nodes whose kind is `NodeKind::Error(_)`; the
//! diagnostics layer derives everything it reports from them.

use serde::{Deserialize, Serialize};

use super::span::Span;

/// Index of a node within its [`ParseTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

/// The closed set of defect kinds the pipeline can report.
///
/// Every diagnostic, whether produced by the parser or the fallback
/// checker, carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingClosingBrace,
    MissingComma,
    MissingOpenParen,
    MissingCloseParen,
    UnknownOperation,
    NumberTooLarge,
    NumberTooSmall,
    NonIntegerNumber,
    InvalidNumberChar,
    MisplacedParenOpen,
    MisplacedParenClose,
    MisplacedComma,
}

impl ErrorKind {
    /// All kinds, in taxonomy declaration order.
    pub const ALL: [ErrorKind; 12] = [
        ErrorKind::MissingClosingBrace,
        ErrorKind::MissingComma,
        ErrorKind::MissingOpenParen,
        ErrorKind::MissingCloseParen,
        ErrorKind::UnknownOperation,
        ErrorKind::NumberTooLarge,
        ErrorKind::NumberTooSmall,
        ErrorKind::NonIntegerNumber,
        ErrorKind::InvalidNumberChar,
        ErrorKind::MisplacedParenOpen,
        ErrorKind::MisplacedParenClose,
        ErrorKind::MisplacedComma,
    ];

    /// Stable machine-readable suffix, used in diagnostic codes and the
    /// tree dump.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            ErrorKind::MissingClosingBrace => "missing_closing_brace",
            ErrorKind::MissingComma => "missing_comma",
            ErrorKind::MissingOpenParen => "missing_open_paren",
            ErrorKind::MissingCloseParen => "missing_close_paren",
            ErrorKind::UnknownOperation => "unknown_operation",
            ErrorKind::NumberTooLarge => "number_too_large",
            ErrorKind::NumberTooSmall => "number_too_small",
            ErrorKind::NonIntegerNumber => "non_integer_number",
            ErrorKind::InvalidNumberChar => "invalid_number_char",
            ErrorKind::MisplacedParenOpen => "misplaced_paren_open",
            ErrorKind::MisplacedParenClose => "misplaced_paren_close",
            ErrorKind::MisplacedComma => "misplaced_comma",
        }
    }

    /// Short phrase used as the span label in rendered reports.
    pub const fn label(&self) -> &'static str {
        match self {
            ErrorKind::MissingClosingBrace
            | ErrorKind::MissingComma
            | ErrorKind::MissingOpenParen
            | ErrorKind::MissingCloseParen => "missing here",
            ErrorKind::UnknownOperation => "unknown name",
            ErrorKind::NumberTooLarge => "key too large",
            ErrorKind::NumberTooSmall => "key too small",
            ErrorKind::NonIntegerNumber => "not an integer",
            ErrorKind::InvalidNumberChar => "invalid here",
            ErrorKind::MisplacedParenOpen
            | ErrorKind::MisplacedParenClose
            | ErrorKind::MisplacedComma => "misplaced here",
        }
    }
}

/// Kind tag of a parse-tree node: either a valid production or a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Root: the braced summary plus any stray material around it.
    Summary,
    SetSink,
    Transitive,
    Sanitize,
    SwapTaint,
    /// A recovered operation application: a known name with a malformed
    /// remainder, or an unknown name with whatever followed it.
    ErrorOperation,
    /// The known operation name anchoring an `ErrorOperation`.
    OperationName,
    /// A run of malformed remainder tokens after an operation name.
    ErrorParts,
    Key,
    /// A valid digit literal inside a key.
    Number,
    Error(ErrorKind),
}

impl NodeKind {
    pub fn is_error(&self) -> bool {
        matches!(self, NodeKind::Error(_))
    }

    /// Rule-style name used by the tree dump.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Summary => "taint_summary",
            NodeKind::SetSink => "set_sink",
            NodeKind::Transitive => "transitive",
            NodeKind::Sanitize => "sanitize",
            NodeKind::SwapTaint => "swap_taint",
            NodeKind::ErrorOperation => "error_operation",
            NodeKind::OperationName => "operation_name",
            NodeKind::ErrorParts => "error_parts",
            NodeKind::Key => "key",
            NodeKind::Number => "number",
            NodeKind::Error(kind) => kind.code_suffix(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseNode {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<NodeId>,
}

impl ParseNode {
    /// The raw source slice this node covers. Zero-width synthesized nodes
    /// yield the empty string.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start.byte..self.span.end.byte]
    }
}

/// An immutable parse result: the source it was built from plus the node
/// arena. Always structurally complete, even for malformed input.
#[derive(Debug, Clone)]
pub struct ParseTree {
    source: String,
    nodes: Vec<ParseNode>,
    root: NodeId,
}

impl ParseTree {
    pub(crate) fn from_parts(source: String, nodes: Vec<ParseNode>, root: NodeId) -> Self {
        ParseTree { source, nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id.0]
    }

    pub fn text_of(&self, id: NodeId) -> &str {
        self.node(id).text(&self.source)
    }

    /// Total number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.kind.is_error())
    }

    /// Pre-order depth-first walk from the root; document order for trees
    /// built by the parser.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { tree: self, stack: vec![self.root] }
    }

    /// Parenthesized dump of the whole tree with byte ranges, for
    /// inspection and the CLI `--tree` flag.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(self.root, &mut out);
        out
    }

    fn write_sexp(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        out.push('(');
        out.push_str(node.kind.name());
        out.push_str(&format!(" {}..{}", node.span.start.byte, node.span.end.byte));
        for &child in &node.children {
            out.push(' ');
            self.write_sexp(child, out);
        }
        out.push(')');
    }
}

pub struct Preorder<'t> {
    tree: &'t ParseTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Preorder<'t> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

/// Mutable arena used while a parse is in flight.
pub(crate) struct TreeBuilder {
    nodes: Vec<ParseNode>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        TreeBuilder { nodes: Vec::new() }
    }

    pub(crate) fn push(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ParseNode { kind, span, children });
        id
    }

    /// Leaf helper.
    pub(crate) fn leaf(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.push(kind, span, Vec::new())
    }

    pub(crate) fn get(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id.0]
    }

    pub(crate) fn finish(self, source: String, root: NodeId) -> ParseTree {
        ParseTree::from_parts(source, self.nodes, root)
    }
}
