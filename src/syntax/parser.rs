//! Error-tolerant recursive-descent parser.
//!
//! Ordered alternatives: at every position the well-formed production is
//! tried first; only when no well-formed alternative matches does the
//! parser fall back to a recovery production, and every recovery step
//! consumes at least one token, so parsing always terminates.
//!
//! The parser never fails. Malformed input turns into explicit error nodes
//! in the returned tree; nothing is thrown away.

use super::span::{Pos, Span};
use super::token::{classify_key, Lexer, Token, TokenKind};
use super::tree::{ErrorKind, NodeId, NodeKind, ParseTree, TreeBuilder};
use crate::summary::Operation;

/// Parses any input into a complete tree. Total and deterministic.
pub fn parse(source: &str) -> ParseTree {
    Parser::new(source).run()
}

fn effect_kind(op: Operation) -> NodeKind {
    match op {
        Operation::SetSink => NodeKind::SetSink,
        Operation::Transitive => NodeKind::Transitive,
        Operation::Sanitize => NodeKind::Sanitize,
        Operation::SwapTaint => NodeKind::SwapTaint,
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    idx: usize,
    arena: TreeBuilder,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Parser {
            source,
            tokens: Lexer::new(source).lex_all(),
            idx: 0,
            arena: TreeBuilder::new(),
        }
    }

    // ===== token cursor =====

    fn peek(&self) -> Token {
        self.tokens[self.idx.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek();
        if !matches!(tok.kind, TokenKind::Eof) {
            self.idx += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// End-of-input position, taken from the trailing `Eof` token.
    fn end_pos(&self) -> Pos {
        match self.tokens.last() {
            Some(tok) => tok.span.end,
            None => Pos::default(),
        }
    }

    fn span_of(&self, id: NodeId) -> Span {
        self.arena.get(id).span
    }

    // ===== productions =====

    fn run(mut self) -> ParseTree {
        let mut children = Vec::new();

        // Stray material before the opening brace.
        while !matches!(self.peek_kind(), TokenKind::OpenBrace) && !self.at_eof() {
            let stray = self.stray_node();
            children.push(stray);
        }

        let mut closed = false;
        if matches!(self.peek_kind(), TokenKind::OpenBrace) {
            self.bump();
            loop {
                match self.peek_kind() {
                    TokenKind::CloseBrace => {
                        self.bump();
                        closed = true;
                        break;
                    }
                    TokenKind::Eof => break,
                    TokenKind::Name => {
                        let effect = self.parse_side_effect();
                        children.push(effect);
                        self.after_side_effect(effect, &mut children);
                    }
                    _ => {
                        let stray = self.stray_node();
                        children.push(stray);
                    }
                }
            }
        }

        if !closed {
            let missing = self.arena.leaf(
                NodeKind::Error(ErrorKind::MissingClosingBrace),
                Span::point(self.end_pos()),
            );
            children.push(missing);
        }

        // Stray material after the closing brace.
        while !self.at_eof() {
            let stray = self.stray_node();
            children.push(stray);
        }

        let root_span = Span::new(Pos::default(), self.end_pos());
        let root = self.arena.push(NodeKind::Summary, root_span, children);
        self.arena.finish(self.source.to_string(), root)
    }

    /// Separator handling after a parsed side effect. A run of side effects
    /// with no comma between them resynchronizes here: exactly one
    /// `MissingComma` at the boundary, then parsing continues normally.
    fn after_side_effect(&mut self, effect: NodeId, children: &mut Vec<NodeId>) {
        match self.peek_kind() {
            TokenKind::Comma => {
                let comma = self.bump();
                // A separator with nothing after it is itself the defect.
                if matches!(self.peek_kind(), TokenKind::CloseBrace | TokenKind::Eof) {
                    let stray = self
                        .arena
                        .leaf(NodeKind::Error(ErrorKind::MisplacedComma), comma.span);
                    children.push(stray);
                }
            }
            TokenKind::Name => {
                let boundary = Span::point(self.span_of(effect).end);
                let missing = self
                    .arena
                    .leaf(NodeKind::Error(ErrorKind::MissingComma), boundary);
                children.push(missing);
            }
            _ => {}
        }
    }

    /// One stray token becomes one error leaf. The three punctuation marks
    /// keep their own kinds; alphabetic runs read as operation names gone
    /// astray; everything else falls into the lexical catch-all.
    fn stray_node(&mut self) -> NodeId {
        let tok = self.bump();
        let kind = match tok.kind {
            TokenKind::OpenParen => ErrorKind::MisplacedParenOpen,
            TokenKind::CloseParen => ErrorKind::MisplacedParenClose,
            TokenKind::Comma => ErrorKind::MisplacedComma,
            TokenKind::Name => ErrorKind::UnknownOperation,
            _ => ErrorKind::InvalidNumberChar,
        };
        self.arena.leaf(NodeKind::Error(kind), tok.span)
    }

    /// Cursor is at a `Name` token.
    fn parse_side_effect(&mut self) -> NodeId {
        let name_tok = self.bump();
        let name_text = name_tok.text(self.source);

        if let Some(op) = Operation::from_name(name_text) {
            if let Some(effect) = self.try_exact(op, name_tok) {
                return effect;
            }
            return self.recover_known(name_tok);
        }

        self.recover_unknown(name_tok)
    }

    /// The well-formed production for a known operation:
    /// `name ( key {, key} )` with exactly `arity` keys. Matched on token
    /// shapes alone; key contents are classified afterwards, so a
    /// structurally valid application with a bad key literal still parses
    /// as this production.
    fn try_exact(&mut self, op: Operation, name_tok: Token) -> Option<NodeId> {
        let save = self.idx;
        if !matches!(self.peek_kind(), TokenKind::OpenParen) {
            return None;
        }
        self.bump();

        let mut key_toks = Vec::with_capacity(op.arity());
        match self.peek_kind() {
            TokenKind::Key { .. } => key_toks.push(self.bump()),
            _ => {
                self.idx = save;
                return None;
            }
        }
        for _ in 1..op.arity() {
            if !matches!(self.peek_kind(), TokenKind::Comma) {
                self.idx = save;
                return None;
            }
            self.bump();
            match self.peek_kind() {
                TokenKind::Key { .. } => key_toks.push(self.bump()),
                _ => {
                    self.idx = save;
                    return None;
                }
            }
        }
        if !matches!(self.peek_kind(), TokenKind::CloseParen) {
            self.idx = save;
            return None;
        }
        let close = self.bump();

        let mut kids = Vec::with_capacity(key_toks.len());
        for tok in key_toks {
            if let TokenKind::Key { inner } = tok.kind {
                kids.push(self.key_node(tok.span, inner));
            }
        }
        let span = name_tok.span.join(&close.span);
        Some(self.arena.push(effect_kind(op), span, kids))
    }

    /// Recovery for a known name whose arguments did not match: anchor on
    /// the name and keep the malformed remainder as an error-parts run. A
    /// name with no `(` at all gets a zero-width `MissingOpenParen`, so a
    /// bare name is never silently well-formed.
    fn recover_known(&mut self, name_tok: Token) -> NodeId {
        let name_leaf = self.arena.leaf(NodeKind::OperationName, name_tok.span);
        let mut kids = vec![name_leaf];
        if !matches!(self.peek_kind(), TokenKind::OpenParen) {
            let missing = self.arena.leaf(
                NodeKind::Error(ErrorKind::MissingOpenParen),
                Span::point(name_tok.span.end),
            );
            kids.push(missing);
        }
        if let Some(parts) = self.parse_error_parts() {
            kids.push(parts);
        }
        self.wrap_error_operation(name_tok, kids)
    }

    /// Recovery for an unknown name. The name itself is the diagnostic; a
    /// well-formed argument list after it parses normally so the report
    /// stays focused on the misspelling.
    fn recover_unknown(&mut self, name_tok: Token) -> NodeId {
        let name_leaf = self
            .arena
            .leaf(NodeKind::Error(ErrorKind::UnknownOperation), name_tok.span);
        let mut kids = vec![name_leaf];
        if let Some(args) = self.try_flexible_args() {
            kids.extend(args);
        } else if let Some(parts) = self.parse_error_parts() {
            kids.push(parts);
        }
        self.wrap_error_operation(name_tok, kids)
    }

    fn wrap_error_operation(&mut self, name_tok: Token, kids: Vec<NodeId>) -> NodeId {
        let mut span = name_tok.span;
        for &kid in &kids {
            span = span.join(&self.span_of(kid));
        }
        self.arena.push(NodeKind::ErrorOperation, span, kids)
    }

    /// Argument list for an unknown operation: `( )` or `( key {, key} )`
    /// with any number of keys, since the arity is unknowable. All-or-
    /// nothing; on mismatch the cursor is restored untouched.
    fn try_flexible_args(&mut self) -> Option<Vec<NodeId>> {
        let save = self.idx;
        if !matches!(self.peek_kind(), TokenKind::OpenParen) {
            return None;
        }
        self.bump();

        let mut key_toks = Vec::new();
        if let TokenKind::Key { .. } = self.peek_kind() {
            key_toks.push(self.bump());
            while matches!(self.peek_kind(), TokenKind::Comma) {
                let after_comma = self.tokens.get(self.idx + 1).map(|t| t.kind);
                if !matches!(after_comma, Some(TokenKind::Key { .. })) {
                    break;
                }
                self.bump();
                key_toks.push(self.bump());
            }
        }
        if !matches!(self.peek_kind(), TokenKind::CloseParen) {
            self.idx = save;
            return None;
        }
        self.bump();

        let mut kids = Vec::with_capacity(key_toks.len());
        for tok in key_toks {
            if let TokenKind::Key { inner } = tok.kind {
                kids.push(self.key_node(tok.span, inner));
            }
        }
        Some(kids)
    }

    /// Greedy run of remainder tokens after a failed application. Stray
    /// punctuation is tagged individually; keys keep their positions and
    /// classifications. The run stops where normal parsing can plausibly
    /// resume: end of input, a brace, the next operation name, or a comma
    /// that separates us from one.
    fn parse_error_parts(&mut self) -> Option<NodeId> {
        let mut kids = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Eof
                | TokenKind::CloseBrace
                | TokenKind::OpenBrace
                | TokenKind::Name => break,
                TokenKind::Comma => {
                    let after_comma = self.tokens.get(self.idx + 1).map(|t| t.kind);
                    if matches!(after_comma, Some(TokenKind::Name)) {
                        break;
                    }
                    let tok = self.bump();
                    let leaf = self
                        .arena
                        .leaf(NodeKind::Error(ErrorKind::MisplacedComma), tok.span);
                    kids.push(leaf);
                }
                TokenKind::OpenParen => {
                    let tok = self.bump();
                    let leaf = self
                        .arena
                        .leaf(NodeKind::Error(ErrorKind::MisplacedParenOpen), tok.span);
                    kids.push(leaf);
                }
                TokenKind::CloseParen => {
                    let tok = self.bump();
                    let leaf = self
                        .arena
                        .leaf(NodeKind::Error(ErrorKind::MisplacedParenClose), tok.span);
                    kids.push(leaf);
                }
                TokenKind::Key { inner } => {
                    let tok = self.bump();
                    kids.push(self.key_node(tok.span, inner));
                }
                TokenKind::Junk => {
                    let tok = self.bump();
                    let leaf = self
                        .arena
                        .leaf(NodeKind::Error(ErrorKind::InvalidNumberChar), tok.span);
                    kids.push(leaf);
                }
            }
        }
        if kids.is_empty() {
            return None;
        }
        let mut span = self.span_of(kids[0]);
        for &kid in &kids[1..] {
            span = span.join(&self.span_of(kid));
        }
        Some(self.arena.push(NodeKind::ErrorParts, span, kids))
    }

    /// A `key` node: the angle-bracketed literal with one child, either a
    /// valid `number` leaf or the specific lexical error kind.
    fn key_node(&mut self, key_span: Span, inner: Span) -> NodeId {
        let content = &self.source[inner.start.byte..inner.end.byte];
        let child = match classify_key(content) {
            None => self.arena.leaf(NodeKind::Number, inner),
            Some(kind) => self.arena.leaf(NodeKind::Error(kind), inner),
        };
        self.arena.push(NodeKind::Key, key_span, vec![child])
    }
}
