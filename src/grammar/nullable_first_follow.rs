use std::collections::HashSet;

use super::grammar::{Grammar, Rule};
use super::symbol::{Symbol, SymbolKind};

impl Grammar {
    /// True if some derivation from `symbol` yields the empty string.
    /// Defined over nonterminals; anything else never vanishes.
    pub fn derives_to_lambda(&self, symbol: &Symbol) -> bool {
        self.derives_to_lambda_guarded(symbol, &mut Vec::new())
    }

    /// The guard holds the `(rule, nonterminal)` pairs currently being
    /// expanded; re-encountering one counts as "vanishes" so that
    /// nullability cycles (`A -> B, B -> A | lambda`) resolve instead of
    /// recursing forever.
    pub fn derives_to_lambda_guarded(
        &self,
        symbol: &Symbol,
        in_progress: &mut Vec<(Rule, Symbol)>,
    ) -> bool {
        for rule in self.rules_for(symbol) {
            if rule.is_lambda() {
                return true;
            }
            // Terminals and the end marker can never vanish.
            if rule.has_terminal() || rule.reaches_end() {
                continue;
            }

            let vanishes = rule
                .right
                .iter()
                .filter(|s| s.kind == SymbolKind::NonTerminal)
                .all(|nt| {
                    let frame = (rule.clone(), nt.clone());
                    if in_progress.contains(&frame) {
                        return true;
                    }
                    in_progress.push(frame);
                    let result = self.derives_to_lambda_guarded(nt, in_progress);
                    in_progress.pop();
                    result
                });
            if vanishes {
                return true;
            }
        }
        false
    }

    /// True if every symbol of `seq` can vanish.
    pub fn sequence_derives_to_lambda(&self, seq: &[Symbol]) -> bool {
        seq.iter().all(|s| match s.kind {
            SymbolKind::Lambda => true,
            SymbolKind::NonTerminal => self.derives_to_lambda(s),
            _ => false,
        })
    }

    /// FIRST set of a symbol sequence.
    pub fn first(&self, seq: &[Symbol]) -> HashSet<Symbol> {
        self.first_guarded(seq, &mut HashSet::new())
    }

    /// `expanded` carries the nonterminals already being expanded, so
    /// left-recursive grammars terminate.
    pub fn first_guarded(&self, seq: &[Symbol], expanded: &mut HashSet<Symbol>) -> HashSet<Symbol> {
        let mut set = HashSet::new();
        if seq.is_empty() {
            return set;
        }
        let head = &seq[0];
        let rest = &seq[1..];

        match head.kind {
            SymbolKind::Terminal | SymbolKind::End => {
                set.insert(head.clone());
            }
            SymbolKind::Lambda => {
                set.extend(self.first_guarded(rest, expanded));
            }
            SymbolKind::NonTerminal => {
                if !expanded.contains(head) {
                    expanded.insert(head.clone());
                    for rule in self.rules_for(head) {
                        set.extend(self.first_guarded(&rule.right, expanded));
                    }
                }
                if self.derives_to_lambda(head) {
                    set.extend(self.first_guarded(rest, expanded));
                }
            }
        }
        set
    }

    /// FOLLOW set of a nonterminal. The start symbol's FOLLOW always
    /// contains the end marker.
    pub fn follow(&self, symbol: &Symbol) -> HashSet<Symbol> {
        self.follow_guarded(symbol, &mut HashSet::new())
    }

    /// `pending` carries the nonterminals whose FOLLOW is currently being
    /// computed; a re-entered one contributes the empty set.
    pub fn follow_guarded(
        &self,
        symbol: &Symbol,
        pending: &mut HashSet<Symbol>,
    ) -> HashSet<Symbol> {
        let mut set = HashSet::new();
        if pending.contains(symbol) {
            return set;
        }
        pending.insert(symbol.clone());

        if symbol == self.start() {
            set.insert(Symbol::end());
        }

        for rule in self.rules() {
            for (i, occurrence) in rule.right.iter().enumerate() {
                if occurrence != symbol {
                    continue;
                }
                let tail = &rule.right[i + 1..];
                if !tail.is_empty() {
                    set.extend(self.first(tail));
                }
                let tail_vanishes = tail
                    .iter()
                    .all(|s| s.kind == SymbolKind::NonTerminal && self.derives_to_lambda(s));
                if tail_vanishes {
                    set.extend(self.follow_guarded(&rule.left, pending));
                }
            }
        }

        pending.remove(symbol);
        set
    }

    /// The lookahead set selecting `rule` in LL(1) parsing: FIRST of the
    /// right-hand side, plus FOLLOW of the left-hand side when the whole
    /// right-hand side can vanish.
    pub fn predict(&self, rule: &Rule) -> HashSet<Symbol> {
        let mut set = self.first(&rule.right);
        if self.sequence_derives_to_lambda(&rule.right) {
            set.extend(self.follow(&rule.left));
        }
        set
    }

    /// LL(1) well-formedness check: no two alternatives of a nonterminal
    /// may share a predict symbol. Diagnostic only; table construction
    /// proceeds regardless.
    pub fn predict_sets_disjoint(&self) -> bool {
        for non_terminal in self.non_terminals() {
            let mut seen: HashSet<Symbol> = HashSet::new();
            for rule in self.rules_for(&non_terminal) {
                for symbol in self.predict(rule) {
                    if !seen.insert(symbol) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::symbol::Symbol;
    use super::*;

    fn balanced() -> Grammar {
        Grammar::parse("S -> A $\nA -> a A b | lambda").unwrap()
    }

    #[test]
    fn direct_and_indirect_nullability() {
        let g = Grammar::parse("S -> A $\nA -> B\nB -> lambda").unwrap();
        assert!(g.derives_to_lambda(&Symbol::non_terminal("A")));
        assert!(g.derives_to_lambda(&Symbol::non_terminal("B")));
        assert!(!g.derives_to_lambda(&Symbol::non_terminal("S")));
    }

    #[test]
    fn nullability_cycle_terminates() {
        let g = Grammar::parse("S -> A $\nA -> B\nB -> A | lambda").unwrap();
        assert!(g.derives_to_lambda(&Symbol::non_terminal("A")));
        assert!(g.derives_to_lambda(&Symbol::non_terminal("B")));
    }

    #[test]
    fn terminals_block_nullability() {
        let g = Grammar::parse("S -> A $\nA -> a").unwrap();
        assert!(!g.derives_to_lambda(&Symbol::non_terminal("A")));
    }

    #[test]
    fn first_base_cases() {
        let g = balanced();
        assert!(g.first(&[]).is_empty());
        assert_eq!(
            g.first(&[Symbol::terminal("a"), Symbol::non_terminal("A")]),
            HashSet::from([Symbol::terminal("a")])
        );
        assert_eq!(
            g.first(&[Symbol::end()]),
            HashSet::from([Symbol::end()])
        );
    }

    #[test]
    fn first_sees_through_nullable_prefix() {
        let g = balanced();
        let seq = [Symbol::non_terminal("A"), Symbol::terminal("b")];
        let first = g.first(&seq);
        assert!(first.contains(&Symbol::terminal("a")));
        assert!(first.contains(&Symbol::terminal("b")));
    }

    #[test]
    fn first_terminates_on_left_recursion() {
        let g = Grammar::parse("S -> A $\nA -> A a | b").unwrap();
        assert_eq!(
            g.first(&[Symbol::non_terminal("A")]),
            HashSet::from([Symbol::terminal("b")])
        );
    }

    #[test]
    fn follow_of_start_contains_end_marker() {
        let g = balanced();
        assert!(g.follow(&Symbol::non_terminal("S")).contains(&Symbol::end()));
    }

    #[test]
    fn follow_collects_tails_and_parents() {
        let g = balanced();
        let follow = g.follow(&Symbol::non_terminal("A"));
        assert_eq!(
            follow,
            HashSet::from([Symbol::terminal("b"), Symbol::end()])
        );
    }

    #[test]
    fn follow_cycle_terminates() {
        // A and B sit at each other's ends, so their FOLLOWs are mutually
        // recursive.
        let g = Grammar::parse("S -> A $\nA -> a B | lambda\nB -> b A | lambda").unwrap();
        let follow_a = g.follow(&Symbol::non_terminal("A"));
        assert!(follow_a.contains(&Symbol::end()));
    }

    #[test]
    fn predict_uses_follow_for_vanishing_rules() {
        let g = balanced();
        let a = Symbol::non_terminal("A");
        let rules: Vec<&Rule> = g.rules_for(&a).collect();
        assert_eq!(
            g.predict(rules[0]),
            HashSet::from([Symbol::terminal("a")])
        );
        assert_eq!(
            g.predict(rules[1]),
            HashSet::from([Symbol::terminal("b"), Symbol::end()])
        );
    }

    #[test]
    fn disjoint_predict_sets() {
        assert!(balanced().predict_sets_disjoint());
    }

    #[test]
    fn overlapping_predict_sets_detected() {
        let g = Grammar::parse("S -> A $\nA -> a b | a c").unwrap();
        assert!(!g.predict_sets_disjoint());
    }
}
