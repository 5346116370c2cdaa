use std::collections::HashMap;

use super::grammar::{Grammar, Rule};
use super::symbol::Symbol;

/// The LL(1) parse table: at most one rule per `(nonterminal, lookahead)`
/// pair, queried by the top-down driver.
#[derive(Debug, Clone)]
pub struct LLTable {
    start: Symbol,
    entries: HashMap<(Symbol, Symbol), Rule>,
}

impl LLTable {
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn rule_for(&self, non_terminal: &Symbol, lookahead: &Symbol) -> Option<&Rule> {
        self.entries
            .get(&(non_terminal.clone(), lookahead.clone()))
    }

    pub fn entries(&self) -> &HashMap<(Symbol, Symbol), Rule> {
        &self.entries
    }
}

impl Grammar {
    /// Maps every symbol of every rule's predict set to that rule. On a
    /// collision a later rule overwrites an earlier one; checking
    /// disjointness beforehand is the caller's responsibility
    /// (`predict_sets_disjoint`).
    pub fn build_ll1_table(&self) -> LLTable {
        let mut entries = HashMap::new();
        for rule in self.rules() {
            for symbol in self.predict(rule) {
                entries.insert((rule.left.clone(), symbol), rule.clone());
            }
        }
        LLTable {
            start: self.start().clone(),
            entries,
        }
    }
}
