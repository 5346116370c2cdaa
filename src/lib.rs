extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

mod grammar;
pub use grammar::{
    Action, Conflict, Grammar, GrammarError, InputQueue, Item, ItemSet, LLTable, LRAutomaton,
    ParseError, ParseNode, Rule, Symbol, SymbolKind,
};

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => g.to_non_terminal_output_vec().to_json(),
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => serde_json::to_string(&g.build_ll1_table().to_output(&g)).unwrap(),
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn slr_table_to_json(grammar: &str) -> String {
    let g = match Grammar::parse(grammar) {
        Ok(g) => g,
        Err(e) => return format!("{{\"error\":\"{}\"}}", e),
    };
    match g.build_lr_automaton() {
        Ok(automaton) => serde_json::to_string(&automaton.to_table_output(&g)).unwrap(),
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn parse_tree_to_json(grammar: &str, input: &str, bottom_up: bool) -> String {
    let g = match Grammar::parse(grammar) {
        Ok(g) => g,
        Err(e) => return format!("{{\"error\":\"{}\"}}", e),
    };
    let tokens = match crate::grammar::parse::tokenize_input(input) {
        Ok(tokens) => tokens,
        Err(e) => return format!("{{\"error\":\"{}\"}}", e),
    };
    let tree = if bottom_up {
        match g.build_lr_automaton() {
            Ok(automaton) => automaton.parse(&tokens),
            Err(e) => return format!("{{\"error\":\"{}\"}}", e),
        }
    } else {
        g.build_ll1_table().parse(&tokens)
    };
    match tree {
        Ok(tree) => serde_json::to_string(&tree).unwrap(),
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[cfg(test)]
mod parse_tests {
    use crate::{Grammar, GrammarError, Symbol};

    #[test]
    fn simple_parse() {
        let g = Grammar::parse("S -> a $").unwrap();

        assert_eq!(g.start(), &Symbol::non_terminal("S"));
        assert_eq!(g.rules().len(), 1);
        assert_eq!(
            g.rules()[0].right,
            vec![Symbol::terminal("a"), Symbol::end()]
        );
    }

    #[test]
    fn simple_parse_with_space() {
        let g = Grammar::parse("  S -> a $ ").unwrap();
        assert_eq!(g.start(), &Symbol::non_terminal("S"));
    }

    #[test]
    fn alternation_on_continuation_line() {
        let g = Grammar::parse("S -> A $\nA -> a \n | b c").unwrap();

        let a = Symbol::non_terminal("A");
        let rules: Vec<_> = g.rules_for(&a).collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].right, vec![Symbol::terminal("a")]);
        assert_eq!(
            rules[1].right,
            vec![Symbol::terminal("b"), Symbol::terminal("c")]
        );
    }

    #[test]
    fn two_rightarrows_parse() {
        assert_eq!(
            Grammar::parse("S -> a -> b").unwrap_err(),
            GrammarError::TooManyArrows { line: 1 }
        );
    }

    #[test]
    fn no_left_parse() {
        assert!(matches!(
            Grammar::parse("| a b\n S -> a $").unwrap_err(),
            GrammarError::DanglingAlternation { line: 1 }
        ));
    }

    #[test]
    fn left_contains_space() {
        assert_eq!(
            Grammar::parse("S a S -> x $").unwrap_err(),
            GrammarError::BadLeftHandSide { line: 1 }
        );
    }

    #[test]
    fn malformed_symbol_carries_line() {
        assert_eq!(
            Grammar::parse("S -> a $\nA -> aBc").unwrap_err(),
            GrammarError::MalformedSymbol {
                token: "aBc".to_string(),
                line: 2
            }
        );
    }

    #[test]
    fn grammar_without_end_marker_has_no_start() {
        assert_eq!(
            Grammar::parse("S -> a").unwrap_err(),
            GrammarError::NoStartRule
        );
    }

    #[test]
    fn two_augmented_rules_are_rejected() {
        assert_eq!(
            Grammar::parse("S -> a $\nT -> b $").unwrap_err(),
            GrammarError::MultipleStartRules
        );
    }

    #[test]
    fn input_tokens_must_be_terminals() {
        assert!(crate::grammar::parse::tokenize_input("a b $").is_ok());
        assert!(matches!(
            crate::grammar::parse::tokenize_input("a B").unwrap_err(),
            GrammarError::InvalidInputToken { .. }
        ));
    }
}
