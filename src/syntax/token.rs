//! Hand-written lexer for the taint-summary surface syntax.
//!
//! The token set is deliberately small: the four punctuation marks the
//! grammar knows, alphabetic runs (operation names), angle-bracketed key
//! literals, and `Junk` runs for everything else. The lexer never fails;
//! malformed input becomes `Junk` tokens for the parser's recovery path.

use once_cell::sync::Lazy;
use regex::Regex;

use super::span::{Pos, Span};
use super::tree::ErrorKind;

static VALID_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(-1|[0-9])$").expect("valid regex"));
static TOO_LARGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2,}$").expect("valid regex"));
static TOO_SMALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-[0-9]{2,}$").expect("valid regex"));
static NON_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("valid regex"));

/// Classifies the content of a `<`…`>` literal. `None` means the content is
/// one of the eleven valid keys `{-1, 0, ..., 9}`; otherwise the specific
/// lexical defect is named. Shared by the parser and the fallback checker
/// so both report the same kind for the same literal.
pub fn classify_key(content: &str) -> Option<ErrorKind> {
    if VALID_KEY.is_match(content) {
        None
    } else if TOO_LARGE.is_match(content) {
        Some(ErrorKind::NumberTooLarge)
    } else if TOO_SMALL.is_match(content) {
        Some(ErrorKind::NumberTooSmall)
    } else if NON_INTEGER.is_match(content) {
        Some(ErrorKind::NonIntegerNumber)
    } else {
        Some(ErrorKind::InvalidNumberChar)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Comma,
    /// An alphabetic run in operation-name position, `[a-zA-Z]+`.
    Name,
    /// A terminated `<`…`>` literal; `inner` spans the content between the
    /// angle brackets. Content validity is classified later, not here.
    Key { inner: Span },
    /// A run of characters that fits no other token. Includes an opening
    /// `<` whose literal never terminates before a structural character.
    Junk,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// The raw source slice this token covers.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start.byte..self.span.end.byte]
    }
}

/// Characters that terminate a `Junk` run or abort a key literal.
fn is_structural(c: char) -> bool {
    matches!(c, '{' | '}' | '(' | ')' | ',' | '<')
}

pub struct Lexer<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    idx: usize,
    row: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            idx: 0,
            row: 0,
            col: 0,
        }
    }

    /// Tokenizes the whole input. The result always ends with an `Eof`
    /// token whose span is empty and anchored at the end of the source.
    pub fn lex_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = matches!(tok.kind, TokenKind::Eof);
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn pos(&self) -> Pos {
        let byte = match self.chars.get(self.idx) {
            Some(&(byte, _)) => byte,
            None => self.src.len(),
        };
        Pos { byte, row: self.row, col: self.col }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).map(|&(_, c)| c)
    }

    fn advance(&mut self) {
        if let Some(&(_, c)) = self.chars.get(self.idx) {
            self.idx += 1;
            if c == '\n' {
                self.row += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.pos();
        let kind = match self.peek() {
            None => {
                return Token { kind: TokenKind::Eof, span: Span::point(start) };
            }
            Some('{') => {
                self.advance();
                TokenKind::OpenBrace
            }
            Some('}') => {
                self.advance();
                TokenKind::CloseBrace
            }
            Some('(') => {
                self.advance();
                TokenKind::OpenParen
            }
            Some(')') => {
                self.advance();
                TokenKind::CloseParen
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some(c) if c.is_ascii_alphabetic() => {
                while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
                    self.advance();
                }
                TokenKind::Name
            }
            Some('<') => return self.lex_key(start),
            Some(_) => {
                self.advance();
                while matches!(self.peek(), Some(c)
                    if !c.is_whitespace() && !c.is_ascii_alphabetic() && !is_structural(c))
                {
                    self.advance();
                }
                TokenKind::Junk
            }
        };
        Token { kind, span: Span::new(start, self.pos()) }
    }

    /// Lexes a `<`…`>` literal. A key must terminate before any structural
    /// character or newline; otherwise the scanned run is demoted to `Junk`.
    fn lex_key(&mut self, start: Pos) -> Token {
        let mut j = self.idx + 1;
        let terminated = loop {
            match self.chars.get(j) {
                None => break false,
                Some(&(_, '>')) => break true,
                Some(&(_, '\n')) => break false,
                Some(&(_, c)) if is_structural(c) => break false,
                Some(_) => j += 1,
            }
        };

        self.advance(); // consume '<'
        let inner_start = self.pos();
        while self.idx < j {
            self.advance();
        }
        if !terminated {
            return Token { kind: TokenKind::Junk, span: Span::new(start, self.pos()) };
        }
        let inner_end = self.pos();
        self.advance(); // consume '>'
        Token {
            kind: TokenKind::Key { inner: Span::new(inner_start, inner_end) },
            span: Span::new(start, self.pos()),
        }
    }
}
