//! Surface syntax: lexer, error-tolerant parser, and the arena parse tree.

pub mod parser;
pub mod span;
pub mod token;
pub mod tree;

pub use parser::parse;
pub use span::{Pos, Span};
pub use token::classify_key;
pub use tree::{ErrorKind, NodeId, NodeKind, ParseNode, ParseTree};
