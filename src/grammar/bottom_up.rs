use std::collections::VecDeque;

use super::error::ParseError;
use super::lr_dfa::{Action, LRAutomaton};
use super::symbol::{Symbol, SymbolKind};
use super::tree::ParseNode;

impl LRAutomaton {
    /// Shift-reduce parse. The queue holds tree nodes: raw tokens start
    /// as leaves, and every reduction collapses `|rule.right|` stack
    /// entries (none for an empty production) into one node that is
    /// pushed back onto the front of the queue and re-driven as if it
    /// were freshly scanned input. The end marker is inspected but never
    /// dequeued.
    pub fn parse(&self, input: &[Symbol]) -> Result<ParseNode, ParseError> {
        let end = Symbol::end();
        let mut queue: VecDeque<ParseNode> = input.iter().cloned().map(ParseNode::new).collect();
        if queue.back().map(|n| n.label != end).unwrap_or(true) {
            queue.push_back(ParseNode::new(end.clone()));
        }

        let mut stack: Vec<(usize, Option<ParseNode>)> = vec![(0, None)];
        loop {
            let state = stack.last().unwrap().0;
            let front = queue.front().unwrap().label.clone();

            match self.action(state, &front).cloned() {
                None => {
                    // Real input still waiting past the front means the
                    // parse died early; otherwise the work ran dry
                    // without ever accepting.
                    let pending = queue.iter().skip(1).any(|n| n.label != end);
                    return Err(if pending {
                        ParseError::NoAction {
                            state,
                            token: front,
                        }
                    } else {
                        ParseError::NotAccepted
                    });
                }
                Some(Action::Shift(target)) => {
                    let node = if front.kind == SymbolKind::End {
                        ParseNode::new(end.clone())
                    } else {
                        queue.pop_front().unwrap()
                    };
                    stack.push((target, Some(node)));
                }
                Some(Action::Reduce {
                    rule,
                    accepting: false,
                }) => {
                    let arity = if rule.is_lambda() { 0 } else { rule.right.len() };
                    if stack.len() <= arity {
                        return Err(ParseError::NotAccepted);
                    }
                    let mut children: Vec<ParseNode> = stack
                        .drain(stack.len() - arity..)
                        .filter_map(|(_, node)| node)
                        .collect();
                    if rule.is_lambda() {
                        children.push(ParseNode::new(Symbol::lambda()));
                    }
                    queue.push_front(ParseNode::with_children(rule.left.clone(), children));
                }
                Some(Action::Reduce {
                    rule,
                    accepting: true,
                }) => {
                    let children = stack.drain(1..).filter_map(|(_, node)| node).collect();
                    return Ok(ParseNode::with_children(rule.left.clone(), children));
                }
            }
        }
    }
}
