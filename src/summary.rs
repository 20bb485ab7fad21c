//! Typed model of a taint summary.
//!
//! The parse tree speaks in spans and node kinds; this module speaks in
//! operations and keys. A [`TaintSummary`] can only be recovered from a
//! tree with zero error nodes, which is exactly what makes "no diagnostics"
//! meaningful: a clean tree always denotes one valid summary.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::syntax::tree::{NodeKind, ParseTree};

/// The four side-effect operations the DSL models.
///
/// `ALL` preserves canonical declaration order, which the suggestion engine
/// uses for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    SetSink,
    Transitive,
    Sanitize,
    SwapTaint,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::SetSink,
        Operation::Transitive,
        Operation::Sanitize,
        Operation::SwapTaint,
    ];

    /// Canonical surface name.
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::SetSink => "setSink",
            Operation::Transitive => "transitive",
            Operation::Sanitize => "sanitize",
            Operation::SwapTaint => "swapTaint",
        }
    }

    /// Number of keys the operation takes.
    pub const fn arity(&self) -> usize {
        match self {
            Operation::SetSink | Operation::Sanitize => 1,
            Operation::Transitive | Operation::SwapTaint => 2,
        }
    }

    /// Exact, case-sensitive name lookup.
    pub fn from_name(name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parameter/return slot index in `[-1, 9]`.
///
/// `-1` addresses the return value; `0` through `9` address parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(i8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("key {0} is outside the valid range [-1, 9]")]
pub struct KeyOutOfRange(pub i8);

impl Key {
    pub fn new(value: i8) -> Result<Key, KeyOutOfRange> {
        if (-1..=9).contains(&value) {
            Ok(Key(value))
        } else {
            Err(KeyOutOfRange(value))
        }
    }

    pub fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// One operation application with its ordered keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffect {
    pub operation: Operation,
    pub keys: Vec<Key>,
}

impl SideEffect {
    /// Key count matches the operation's arity. Key range is enforced by
    /// construction of [`Key`].
    pub fn is_well_formed(&self) -> bool {
        self.keys.len() == self.operation.arity()
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation)?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}")?;
        }
        f.write_str(")")
    }
}

/// An ordered, possibly empty sequence of side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaintSummary {
    pub effects: Vec<SideEffect>,
}

impl TaintSummary {
    /// Recovers the typed summary from a clean parse tree. Returns `None`
    /// when the tree contains any error node; partial summaries are never
    /// produced.
    pub fn from_tree(tree: &ParseTree) -> Option<TaintSummary> {
        if tree.has_errors() {
            return None;
        }
        let root = tree.node(tree.root());
        let mut effects = Vec::with_capacity(root.children.len());
        for &child in &root.children {
            let node = tree.node(child);
            let operation = match node.kind {
                NodeKind::SetSink => Operation::SetSink,
                NodeKind::Transitive => Operation::Transitive,
                NodeKind::Sanitize => Operation::Sanitize,
                NodeKind::SwapTaint => Operation::SwapTaint,
                _ => return None,
            };
            let mut keys = Vec::with_capacity(node.children.len());
            for &key_id in &node.children {
                let number = *tree.node(key_id).children.first()?;
                let value: i8 = tree.text_of(number).parse().ok()?;
                keys.push(Key::new(value).ok()?);
            }
            effects.push(SideEffect { operation, keys });
        }
        Some(TaintSummary { effects })
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl fmt::Display for TaintSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, effect) in self.effects.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{effect}")?;
        }
        f.write_str("}")
    }
}
