//! Fix suggestions for diagnostics.
//!
//! Unknown operation names get a nearest-neighbor candidate by Levenshtein
//! distance over the four canonical names; every other kind has one fixed
//! suggestion string.

use strsim::levenshtein;

use crate::summary::Operation;
use crate::syntax::tree::ErrorKind;

/// The canonical operation name closest to `name` by edit distance
/// (insert/delete/substitute at cost 1, case-sensitive). Ties go to the
/// earlier name in canonical declaration order, which the strictly-smaller
/// comparison guarantees.
pub fn nearest_operation(name: &str) -> &'static str {
    let mut best = Operation::ALL[0].name();
    let mut best_score = usize::MAX;
    for op in Operation::ALL {
        let score = levenshtein(name, op.name());
        if score < best_score {
            best = op.name();
            best_score = score;
        }
    }
    best
}

/// The suggestion line for a diagnostic of `kind`. `text` is the captured
/// source text of the error node; only `UnknownOperation` uses it.
pub fn for_kind(kind: ErrorKind, text: &str) -> String {
    match kind {
        ErrorKind::UnknownOperation => nearest_operation(text).to_string(),
        ErrorKind::MissingClosingBrace => "add the missing closing brace \"}\"".to_string(),
        ErrorKind::MissingComma => "add a comma \",\" between operations".to_string(),
        ErrorKind::MissingOpenParen => {
            "add an opening parenthesis \"(\" after the operation name".to_string()
        }
        ErrorKind::MissingCloseParen => "add the missing closing parenthesis \")\"".to_string(),
        ErrorKind::NumberTooLarge | ErrorKind::NumberTooSmall | ErrorKind::InvalidNumberChar => {
            "key must be an integer between -1 and 9".to_string()
        }
        ErrorKind::NonIntegerNumber => {
            "key must be an integer, without a decimal point".to_string()
        }
        ErrorKind::MisplacedParenOpen => {
            "remove this \"(\" or complete the operation call around it".to_string()
        }
        ErrorKind::MisplacedParenClose => {
            "remove this \")\" or complete the operation call around it".to_string()
        }
        ErrorKind::MisplacedComma => {
            "remove this \",\" or put an operation after it".to_string()
        }
    }
}
