use std::fmt;

use serde::Serialize;

use super::{END_MARK, LAMBDA};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
    End,
    Lambda,
}

/// A vocabulary element of a grammar. Equality and hashing go over
/// `(token, kind)`, so two symbols built from the same text are
/// interchangeable no matter where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Symbol {
    pub token: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn terminal(token: &str) -> Self {
        Self {
            token: token.to_string(),
            kind: SymbolKind::Terminal,
        }
    }

    pub fn non_terminal(token: &str) -> Self {
        Self {
            token: token.to_string(),
            kind: SymbolKind::NonTerminal,
        }
    }

    pub fn end() -> Self {
        Self {
            token: END_MARK.to_string(),
            kind: SymbolKind::End,
        }
    }

    pub fn lambda() -> Self {
        Self {
            token: LAMBDA.to_string(),
            kind: SymbolKind::Lambda,
        }
    }

    /// Classifies a raw token: `$` and `lambda` are reserved, lowercase
    /// words are terminals, uppercase words are nonterminals. Anything
    /// else (including the `->` and `|` notation tokens, which the
    /// grammar reader strips before classification) is not a symbol.
    pub fn classify(token: &str) -> Option<Self> {
        match token {
            END_MARK => Some(Self::end()),
            LAMBDA => Some(Self::lambda()),
            _ if !token.is_empty() && token.chars().all(|c| c.is_ascii_lowercase()) => {
                Some(Self::terminal(token))
            }
            _ if !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase()) => {
                Some(Self::non_terminal(token))
            }
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    pub fn is_non_terminal(&self) -> bool {
        self.kind == SymbolKind::NonTerminal
    }

    pub fn is_end(&self) -> bool {
        self.kind == SymbolKind::End
    }

    pub fn is_lambda(&self) -> bool {
        self.kind == SymbolKind::Lambda
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_reserved() {
        assert_eq!(Symbol::classify("$"), Some(Symbol::end()));
        assert_eq!(Symbol::classify("lambda"), Some(Symbol::lambda()));
    }

    #[test]
    fn classify_terminal_and_non_terminal() {
        assert_eq!(Symbol::classify("abc"), Some(Symbol::terminal("abc")));
        assert_eq!(Symbol::classify("EXPR"), Some(Symbol::non_terminal("EXPR")));
    }

    #[test]
    fn classify_rejects_everything_else() {
        assert_eq!(Symbol::classify("->"), None);
        assert_eq!(Symbol::classify("|"), None);
        assert_eq!(Symbol::classify("Abc"), None);
        assert_eq!(Symbol::classify("a1"), None);
        assert_eq!(Symbol::classify(""), None);
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Symbol::terminal("a"), Symbol::classify("a").unwrap());
        assert_ne!(Symbol::terminal("a"), Symbol::terminal("b"));
    }
}
