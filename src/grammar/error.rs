use thiserror::Error;

use super::symbol::Symbol;

/// Errors raised while reading a grammar or an input token file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("line {line}: unrecognized symbol \"{token}\"")]
    MalformedSymbol { token: String, line: usize },
    #[error("line {line}: too many \"->\"")]
    TooManyArrows { line: usize },
    #[error("line {line}: left side must be a single nonterminal")]
    BadLeftHandSide { line: usize },
    #[error("line {line}: alternation with no preceding rule")]
    DanglingAlternation { line: usize },
    #[error("line {line}: \"{token}\" is not an input token")]
    InvalidInputToken { token: String, line: usize },
    #[error("grammar has no rule ending with the end marker")]
    NoStartRule,
    #[error("grammar has more than one rule ending with the end marker")]
    MultipleStartRules,
}

/// Errors raised by the parse drivers. Each aborts the parse attempt in
/// progress; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{lookahead}: cannot find rule for nonterminal {nonterminal}")]
    NoRule {
        nonterminal: Symbol,
        lookahead: Symbol,
    },
    #[error("{found}: does not match expected terminal {expected}")]
    Mismatch { expected: Symbol, found: Symbol },
    #[error("state {state}: no action for {token}")]
    NoAction { state: usize, token: Symbol },
    #[error("input exhausted without reaching an accepting action")]
    NotAccepted,
}
