use std::collections::VecDeque;

use super::error::ParseError;
use super::ll1_table::LLTable;
use super::symbol::{Symbol, SymbolKind};
use super::tree::ParseNode;

/// Token queue for the drivers: once the real tokens run out, `peek`
/// keeps answering the end marker, so input never has to carry one.
pub struct InputQueue {
    tokens: VecDeque<Symbol>,
    end: Symbol,
}

impl InputQueue {
    pub fn new(tokens: &[Symbol]) -> Self {
        Self {
            tokens: tokens.iter().cloned().collect(),
            end: Symbol::end(),
        }
    }

    pub fn peek(&self) -> &Symbol {
        self.tokens.front().unwrap_or(&self.end)
    }

    pub fn poll(&mut self) -> Symbol {
        self.tokens.pop_front().unwrap_or_else(|| self.end.clone())
    }
}

enum Entry {
    Symbol(Symbol),
    Ascend,
}

impl LLTable {
    /// Table-driven top-down parse. The symbol stack starts with the
    /// start symbol; expanding a nonterminal pushes an ascend marker and
    /// the rule's right-hand side in reverse, so the symbols pop in
    /// order. Terminals must match the input exactly; the end marker
    /// matches without being consumed.
    pub fn parse(&self, input: &[Symbol]) -> Result<ParseNode, ParseError> {
        let mut input = InputQueue::new(input);
        let mut stack = vec![Entry::Symbol(self.start().clone())];
        let mut nodes: Vec<ParseNode> = Vec::new();
        let mut finished: Option<ParseNode> = None;

        while let Some(entry) = stack.pop() {
            match entry {
                Entry::Symbol(symbol) => match symbol.kind {
                    SymbolKind::NonTerminal => {
                        let rule = match self.rule_for(&symbol, input.peek()) {
                            Some(rule) => rule,
                            None => {
                                return Err(ParseError::NoRule {
                                    nonterminal: symbol,
                                    lookahead: input.peek().clone(),
                                })
                            }
                        };
                        stack.push(Entry::Ascend);
                        for s in rule.right.iter().rev() {
                            stack.push(Entry::Symbol(s.clone()));
                        }
                        nodes.push(ParseNode::new(symbol));
                    }
                    SymbolKind::Terminal | SymbolKind::End => {
                        if input.peek() != &symbol {
                            return Err(ParseError::Mismatch {
                                expected: symbol,
                                found: input.peek().clone(),
                            });
                        }
                        if symbol.kind != SymbolKind::End {
                            input.poll();
                        }
                        nodes
                            .last_mut()
                            .unwrap()
                            .children
                            .push(ParseNode::new(symbol));
                    }
                    SymbolKind::Lambda => {
                        nodes
                            .last_mut()
                            .unwrap()
                            .children
                            .push(ParseNode::new(symbol));
                    }
                },
                Entry::Ascend => {
                    let done = nodes.pop().unwrap();
                    match nodes.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => finished = Some(done),
                    }
                }
            }
        }

        Ok(finished.unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::super::grammar::Grammar;
    use super::super::symbol::Symbol;
    use super::*;

    fn balanced_table() -> LLTable {
        Grammar::parse("S -> A $\nA -> a A b | lambda")
            .unwrap()
            .build_ll1_table()
    }

    fn tokens(text: &str) -> Vec<Symbol> {
        text.split_whitespace()
            .map(|t| Symbol::classify(t).unwrap())
            .collect()
    }

    #[test]
    fn input_queue_synthesizes_end_marker() {
        let mut queue = InputQueue::new(&tokens("a"));
        assert_eq!(queue.peek(), &Symbol::terminal("a"));
        assert_eq!(queue.poll(), Symbol::terminal("a"));
        assert_eq!(queue.peek(), &Symbol::end());
        assert_eq!(queue.poll(), Symbol::end());
        assert_eq!(queue.peek(), &Symbol::end());
    }

    #[test]
    fn parses_nested_pairs() {
        let table = balanced_table();
        let tree = table.parse(&tokens("a a b b $")).unwrap();

        assert_eq!(tree.label, Symbol::non_terminal("S"));
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[1].label, Symbol::end());

        let outer = &tree.children[0];
        assert_eq!(outer.label, Symbol::non_terminal("A"));
        assert_eq!(outer.children.len(), 3);
        assert_eq!(outer.children[0].label, Symbol::terminal("a"));
        assert_eq!(outer.children[2].label, Symbol::terminal("b"));

        let inner = &outer.children[1];
        assert_eq!(inner.children.len(), 3);
        let innermost = &inner.children[1];
        assert_eq!(innermost.children.len(), 1);
        assert_eq!(innermost.children[0].label, Symbol::lambda());

        // S, two nested As, the vanishing A, and its lambda leaf.
        assert_eq!(tree.depth(), 5);
    }

    #[test]
    fn end_marker_is_implicit() {
        let table = balanced_table();
        let explicit = table.parse(&tokens("a b $")).unwrap();
        let implicit = table.parse(&tokens("a b")).unwrap();
        assert_eq!(explicit, implicit);
    }

    #[test]
    fn unbalanced_input_mismatches() {
        let table = balanced_table();
        match table.parse(&tokens("a b b $")) {
            Err(ParseError::Mismatch { expected, found }) => {
                assert_eq!(expected, Symbol::end());
                assert_eq!(found, Symbol::terminal("b"));
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn missing_table_entry_reports_no_rule() {
        let table = balanced_table();
        match table.parse(&tokens("b")) {
            Err(ParseError::NoRule {
                nonterminal,
                lookahead,
            }) => {
                assert_eq!(nonterminal, Symbol::non_terminal("S"));
                assert_eq!(lookahead, Symbol::terminal("b"));
            }
            other => panic!("expected no-rule error, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_uses_the_empty_production() {
        let table = balanced_table();
        let tree = table.parse(&[]).unwrap();
        assert_eq!(tree.children.len(), 2);
        let a = &tree.children[0];
        assert_eq!(a.children.len(), 1);
        assert_eq!(a.children[0].label, Symbol::lambda());
    }
}
