use super::error::GrammarError;
use super::grammar::{Grammar, Rule};
use super::symbol::{Symbol, SymbolKind};
use super::{ALTERNATION, ARROW};

impl Grammar {
    /// Reads a grammar from `A -> x y | z` notation. A line starting with
    /// `|` continues the previous rule. The rule whose right-hand side
    /// ends with the end marker designates the start nonterminal; there
    /// must be exactly one such rule.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let mut rules: Vec<Rule> = Vec::new();
        let mut previous_left: Option<Symbol> = None;

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }

            let parts: Vec<&str> = line.split(ARROW).collect();
            if parts.len() > 2 {
                return Err(GrammarError::TooManyArrows { line: line_no });
            }

            let (left, rights) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.split_whitespace().count() != 1 {
                    return Err(GrammarError::BadLeftHandSide { line: line_no });
                }
                let left =
                    Symbol::classify(left_str).ok_or_else(|| GrammarError::MalformedSymbol {
                        token: left_str.to_string(),
                        line: line_no,
                    })?;
                if !left.is_non_terminal() {
                    return Err(GrammarError::BadLeftHandSide { line: line_no });
                }
                (left, parts[1])
            } else {
                let rest = parts[0].trim_start();
                let rest = rest
                    .strip_prefix(ALTERNATION)
                    .ok_or(GrammarError::DanglingAlternation { line: line_no })?;
                let left = previous_left
                    .clone()
                    .ok_or(GrammarError::DanglingAlternation { line: line_no })?;
                (left, rest)
            };
            previous_left = Some(left.clone());

            for alternative in rights.split(ALTERNATION) {
                let right = alternative
                    .split_whitespace()
                    .map(|token| {
                        Symbol::classify(token).ok_or_else(|| GrammarError::MalformedSymbol {
                            token: token.to_string(),
                            line: line_no,
                        })
                    })
                    .collect::<Result<Vec<Symbol>, GrammarError>>()?;
                rules.push(Rule::new(left.clone(), right));
            }
        }

        let mut augmented = rules.iter().filter(|r| r.is_augmented());
        let start = match augmented.next() {
            Some(rule) => rule.left.clone(),
            None => return Err(GrammarError::NoStartRule),
        };
        if augmented.next().is_some() {
            return Err(GrammarError::MultipleStartRules);
        }

        Ok(Grammar::new(start, rules))
    }
}

/// Reads a whitespace-separated token sequence for the parse drivers.
/// Only terminals and the end marker are valid driver input.
pub fn tokenize_input(text: &str) -> Result<Vec<Symbol>, GrammarError> {
    let mut tokens = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        for raw in line.split_whitespace() {
            let symbol = Symbol::classify(raw).ok_or_else(|| GrammarError::MalformedSymbol {
                token: raw.to_string(),
                line: line_no,
            })?;
            match symbol.kind {
                SymbolKind::Terminal | SymbolKind::End => tokens.push(symbol),
                _ => {
                    return Err(GrammarError::InvalidInputToken {
                        token: raw.to_string(),
                        line: line_no,
                    })
                }
            }
        }
    }
    Ok(tokens)
}
