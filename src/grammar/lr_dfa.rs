use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::Serialize;

use super::error::GrammarError;
use super::grammar::{Grammar, Rule};
use super::symbol::{Symbol, SymbolKind};

/// A rule with a cursor: the parser has recognized `right[0..marker]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Item {
    pub rule: Rule,
    pub marker: usize,
}

impl Item {
    pub fn new(rule: Rule, marker: usize) -> Self {
        Self { rule, marker }
    }

    /// An empty-production item is reducible from the start: there is
    /// nothing to shift.
    pub fn is_reducible(&self) -> bool {
        self.rule.is_lambda() || self.marker == self.rule.right.len()
    }

    pub fn next(&self) -> Option<&Symbol> {
        if self.is_reducible() {
            None
        } else {
            Some(&self.rule.right[self.marker])
        }
    }

    pub fn advanced(&self) -> Self {
        Self::new(self.rule.clone(), self.marker + 1)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.rule.left)?;
        for (i, symbol) in self.rule.right.iter().enumerate() {
            if i == self.marker {
                write!(f, " .")?;
            }
            write!(f, " {}", symbol)?;
        }
        if self.marker == self.rule.right.len() {
            write!(f, " .")?;
        }
        Ok(())
    }
}

/// A deduplicated, insertion-ordered collection of items; one state of
/// the automaton. Equality compares set membership, not order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemSet {
    items: Vec<Item>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn insert(&mut self, item: Item) -> bool {
        if self.items.contains(&item) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Adds, for every item whose next symbol is a nonterminal, a fresh
    /// item for each of that nonterminal's rules, until nothing new
    /// appears. Closing an already-closed set returns an equal set.
    pub fn closure(&self, grammar: &Grammar) -> ItemSet {
        let mut closed = self.clone();
        let mut i = 0;
        while i < closed.items.len() {
            let next = closed.items[i].next().cloned();
            if let Some(symbol) = next {
                if symbol.kind == SymbolKind::NonTerminal {
                    for rule in grammar.rules_for(&symbol) {
                        closed.insert(Item::new(rule.clone(), 0));
                    }
                }
            }
            i += 1;
        }
        closed
    }

    /// Every item whose next symbol equals `symbol`, advanced by one.
    /// Reducible items have no next symbol and never contribute.
    pub fn advanced(&self, symbol: &Symbol) -> ItemSet {
        let mut advanced = ItemSet::new();
        for item in &self.items {
            if item.next() == Some(symbol) {
                advanced.insert(item.advanced());
            }
        }
        advanced
    }

    /// The accept state: a lone completed item for the augmented start
    /// rule.
    fn is_goal(&self) -> bool {
        self.items.len() == 1 && self.items[0].is_reducible() && self.items[0].rule.is_augmented()
    }

    fn all_reducible(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(Item::is_reducible)
    }

    fn lambda_rule(&self) -> Option<&Rule> {
        self.items
            .iter()
            .find(|i| i.rule.is_lambda())
            .map(|i| &i.rule)
    }
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().all(|item| other.items.contains(item))
    }
}

impl Eq for ItemSet {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Action {
    Shift(usize),
    Reduce { rule: Rule, accepting: bool },
}

/// A cell that was written more than once with differing actions. The
/// builder keeps last-write-wins but records every collision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub previous: Action,
    pub chosen: Action,
}

/// The canonical LR(0) collection plus the SLR(1) action table. Built
/// once per grammar; every build gets its own work-list and state table,
/// so repeated builds are independent.
#[derive(Debug, Clone)]
pub struct LRAutomaton {
    states: Vec<ItemSet>,
    actions: Vec<HashMap<Symbol, Action>>,
    conflicts: Vec<Conflict>,
}

impl LRAutomaton {
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    pub fn actions(&self) -> &[HashMap<Symbol, Action>] {
        &self.actions
    }

    pub fn action(&self, state: usize, symbol: &Symbol) -> Option<&Action> {
        self.actions.get(state).and_then(|row| row.get(symbol))
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }
}

fn record(
    actions: &mut [HashMap<Symbol, Action>],
    conflicts: &mut Vec<Conflict>,
    state: usize,
    symbol: Symbol,
    action: Action,
) {
    if let Some(previous) = actions[state].get(&symbol) {
        if *previous != action {
            conflicts.push(Conflict {
                state,
                symbol: symbol.clone(),
                previous: previous.clone(),
                chosen: action.clone(),
            });
        }
    }
    actions[state].insert(symbol, action);
}

impl Grammar {
    /// Builds the canonical collection from the closure of the augmented
    /// start item, then derives the SLR(1) actions: shifts from the goto
    /// relation, reduces over FOLLOW of the reduced nonterminal, and the
    /// accept action on the lone completed start item.
    pub fn build_lr_automaton(&self) -> Result<LRAutomaton, GrammarError> {
        let start_rule = self.start_rule().ok_or(GrammarError::NoStartRule)?.clone();

        let mut seed = ItemSet::new();
        seed.insert(Item::new(start_rule, 0));
        let mut states = vec![seed.closure(self)];
        let mut actions: Vec<HashMap<Symbol, Action>> = vec![HashMap::new()];
        let mut conflicts: Vec<Conflict> = Vec::new();
        let symbols = self.symbols();

        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(0);
        while let Some(from) = queue.pop_front() {
            for symbol in &symbols {
                let moved = states[from].advanced(symbol);
                if moved.is_empty() {
                    continue;
                }
                let closed = moved.closure(self);
                let to = match states.iter().position(|state| *state == closed) {
                    Some(index) => index,
                    None => {
                        states.push(closed);
                        actions.push(HashMap::new());
                        queue.push_back(states.len() - 1);
                        states.len() - 1
                    }
                };
                record(
                    &mut actions,
                    &mut conflicts,
                    from,
                    symbol.clone(),
                    Action::Shift(to),
                );
            }
        }

        for index in 0..states.len() {
            let state = &states[index];
            if state.is_goal() {
                let rule = state.items()[0].rule.clone();
                for symbol in &symbols {
                    record(
                        &mut actions,
                        &mut conflicts,
                        index,
                        symbol.clone(),
                        Action::Reduce {
                            rule: rule.clone(),
                            accepting: true,
                        },
                    );
                }
            } else if state.all_reducible() || state.lambda_rule().is_some() {
                let rule = match state.lambda_rule() {
                    Some(rule) => rule.clone(),
                    None => state.items()[0].rule.clone(),
                };
                for symbol in self.follow(&rule.left) {
                    record(
                        &mut actions,
                        &mut conflicts,
                        index,
                        symbol,
                        Action::Reduce {
                            rule: rule.clone(),
                            accepting: false,
                        },
                    );
                }
            }
        }

        Ok(LRAutomaton {
            states,
            actions,
            conflicts,
        })
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
    fn item_cursor_and_reducibility() {
        let g = balanced();
        let a = Symbol::non_terminal("A");
        let rules: Vec<&Rule> = g.rules_for(&a).collect();

        let fresh = Item::new(rules[0].clone(), 0);
        assert!(!fresh.is_reducible());
        assert_eq!(fresh.next(), Some(&Symbol::terminal("a")));
        let done = Item::new(rules[0].clone(), 3);
        assert!(done.is_reducible());
        assert_eq!(done.next(), None);

        // Empty-productions are reducible with the cursor still at zero.
        let lambda = Item::new(rules[1].clone(), 0);
        assert!(lambda.is_reducible());
        assert_eq!(lambda.next(), None);
    }

    #[test]
    fn item_set_equality_ignores_order() {
        let g = balanced();
        let a = Symbol::non_terminal("A");
        let rules: Vec<&Rule> = g.rules_for(&a).collect();

        let mut forward = ItemSet::new();
        forward.insert(Item::new(rules[0].clone(), 0));
        forward.insert(Item::new(rules[1].clone(), 0));
        let mut backward = ItemSet::new();
        backward.insert(Item::new(rules[1].clone(), 0));
        backward.insert(Item::new(rules[0].clone(), 0));
        assert_eq!(forward, backward);
    }

    #[test]
    fn closure_is_idempotent() {
        let g = balanced();
        let automaton = g.build_lr_automaton().unwrap();
        for state in automaton.states() {
            assert_eq!(&state.closure(&g), state);
        }
    }

    #[test]
    fn canonical_collection_is_deduplicated() {
        let g = balanced();
        let automaton = g.build_lr_automaton().unwrap();
        // I0 = {S -> . A $, A -> . a A b, A -> . lambda}, then goto over
        // A, a, $, A again, b: six distinct states, with goto(I2, a)
        // folding back into I2.
        assert_eq!(automaton.states().len(), 6);
        for (i, state) in automaton.states().iter().enumerate() {
            for (j, other) in automaton.states().iter().enumerate() {
                if i != j {
                    assert_ne!(state, other);
                }
            }
        }
    }

    #[test]
    fn accept_state_reduces_on_every_symbol() {
        let g = balanced();
        let automaton = g.build_lr_automaton().unwrap();
        let goal = automaton
            .states()
            .iter()
            .position(|s| s.items().len() == 1 && s.items()[0].rule.is_augmented() && s.items()[0].is_reducible())
            .unwrap();
        for symbol in g.symbols() {
            match automaton.action(goal, &symbol) {
                Some(Action::Reduce { accepting, .. }) => assert!(accepting),
                other => panic!("expected accepting reduce, got {:?}", other),
            }
        }
    }

    #[test]
    fn lambda_state_reduces_only_on_follow() {
        let g = balanced();
        let automaton = g.build_lr_automaton().unwrap();
        // I0 permits the empty production, so it reduces on FOLLOW(A) =
        // {b, $} and shifts elsewhere.
        match automaton.action(0, &Symbol::terminal("b")) {
            Some(Action::Reduce { rule, accepting }) => {
                assert!(rule.is_lambda());
                assert!(!accepting);
            }
            other => panic!("expected lambda reduce, got {:?}", other),
        }
        assert!(matches!(
            automaton.action(0, &Symbol::terminal("a")),
            Some(Action::Shift(_))
        ));
        assert!(matches!(
            automaton.action(0, &Symbol::non_terminal("A")),
            Some(Action::Shift(_))
        ));
    }

    #[test]
    fn conflict_free_grammar_reports_no_conflicts() {
        let automaton = balanced().build_lr_automaton().unwrap();
        assert!(automaton.conflicts().is_empty());
    }

    #[test]
    fn shift_reduce_collision_is_recorded_and_last_write_wins() {
        // FOLLOW(A) contains a, so I0 both shifts a and reduces the
        // empty production on a.
        let g = Grammar::parse("S -> A a $\nA -> a | lambda").unwrap();
        let automaton = g.build_lr_automaton().unwrap();
        assert!(!automaton.conflicts().is_empty());
        let conflict = &automaton.conflicts()[0];
        assert_eq!(conflict.symbol, Symbol::terminal("a"));
        assert!(matches!(conflict.previous, Action::Shift(_)));
        // The later reduce registration overwrote the shift.
        assert_eq!(
            automaton.action(conflict.state, &conflict.symbol),
            Some(&conflict.chosen)
        );
        assert!(matches!(
            conflict.chosen,
            Action::Reduce { accepting: false, .. }
        ));
    }

    #[test]
    fn missing_start_rule_is_an_error() {
        let g = Grammar::new(
            Symbol::non_terminal("S"),
            vec![Rule::new(
                Symbol::non_terminal("S"),
                vec![Symbol::terminal("a")],
            )],
        );
        assert_eq!(g.build_lr_automaton().unwrap_err(), GrammarError::NoStartRule);
    }
}
