use std::fmt;

use serde::Serialize;

use super::symbol::{Symbol, SymbolKind};

/// A single production. An alternation in grammar notation is stored as
/// several rules sharing the same left-hand side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    pub left: Symbol,
    pub right: Vec<Symbol>,
}

impl Rule {
    pub fn new(left: Symbol, right: Vec<Symbol>) -> Self {
        Self { left, right }
    }

    /// An empty-production: the right-hand side is the lambda marker alone.
    pub fn is_lambda(&self) -> bool {
        self.right.len() == 1 && self.right[0].kind == SymbolKind::Lambda
    }

    pub fn has_terminal(&self) -> bool {
        self.right.iter().any(|s| s.kind == SymbolKind::Terminal)
    }

    pub fn reaches_end(&self) -> bool {
        self.right.iter().any(|s| s.kind == SymbolKind::End)
    }

    /// The augmented start rule ends with the end marker.
    pub fn is_augmented(&self) -> bool {
        self.right
            .last()
            .map(|s| s.kind == SymbolKind::End)
            .unwrap_or(false)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        for symbol in &self.right {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// An ordered collection of rules plus the designated start nonterminal.
/// Immutable once constructed; the analyses never mutate it.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    start: Symbol,
}

impl Grammar {
    /// Rule order is preserved: alternatives are tried (and, on LL table
    /// collisions, overwritten) in the order given here. Undefined
    /// nonterminals on a right-hand side are a caller error and are not
    /// checked.
    pub fn new(start: Symbol, rules: Vec<Rule>) -> Self {
        Self { rules, start }
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rules_for<'a>(&'a self, left: &'a Symbol) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| &r.left == left)
    }

    /// The unique rule for the start symbol whose right-hand side ends
    /// with the end marker.
    pub fn start_rule(&self) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.left == self.start && r.is_augmented())
    }

    /// Terminals in order of first appearance on a right-hand side.
    pub fn terminals(&self) -> Vec<Symbol> {
        let mut terminals: Vec<Symbol> = Vec::new();
        for rule in &self.rules {
            for symbol in &rule.right {
                if symbol.kind == SymbolKind::Terminal && !terminals.contains(symbol) {
                    terminals.push(symbol.clone());
                }
            }
        }
        terminals
    }

    /// Nonterminals in order of their first rule.
    pub fn non_terminals(&self) -> Vec<Symbol> {
        let mut non_terminals: Vec<Symbol> = Vec::new();
        for rule in &self.rules {
            if !non_terminals.contains(&rule.left) {
                non_terminals.push(rule.left.clone());
            }
        }
        non_terminals
    }

    /// Every symbol the automaton can take a transition on: the
    /// nonterminals, the terminals, and the end marker.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols = self.non_terminals();
        symbols.extend(self.terminals());
        symbols.push(Symbol::end());
        symbols
    }
}
