use crowbook_text_processing::escape;
use serde::Serialize;

use super::grammar::Grammar;
use super::ll1_table::LLTable;
use super::lr_dfa::{Action, Item, LRAutomaton};
use super::symbol::Symbol;
use super::tree::ParseNode;
use super::LAMBDA;

fn sorted_tokens(symbols: impl IntoIterator<Item = Symbol>) -> Vec<String> {
    let mut tokens: Vec<String> = symbols.into_iter().map(|s| s.token).collect();
    tokens.sort();
    tokens
}

/// Right-aligns every column of `grid` and joins the cells with ` | `.
fn render_grid(grid: &[Vec<String>]) -> String {
    let columns = grid.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut width = vec![0; columns];
    for row in grid {
        for (i, cell) in row.iter().enumerate() {
            width[i] = width[i].max(cell.len());
        }
    }
    grid.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| format!("{:>width$}", cell, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn latex_symbols(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| escape::tex(t.as_str()).to_string())
        .collect::<Vec<_>>()
        .join(" \\ ")
        .replace(LAMBDA, "\\lambda")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s).to_string())
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        format!("{} & \\rightarrow & {}", escape::tex(self.left), right).replace(LAMBDA, "\\lambda")
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|p| p.to_plaintext(left_max_len))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|p| p.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<_>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let mut productions: Vec<ProductionOutput> = Vec::new();
        for rule in self.rules() {
            let right: Vec<&str> = rule.right.iter().map(|s| s.token.as_str()).collect();
            match productions
                .iter_mut()
                .find(|p| p.left == rule.left.token.as_str())
            {
                Some(p) => p.rights.push(right),
                None => productions.push(ProductionOutput {
                    left: rule.left.token.as_str(),
                    rights: vec![right],
                }),
            }
        }
        ProductionOutputVec { productions }
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutput {
    name: String,
    nullable: bool,
    first: Vec<String>,
    follow: Vec<String>,
}

impl NonTerminalOutput {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name.as_str()),
            self.nullable,
            latex_symbols(&self.first),
            latex_symbols(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec {
    data: Vec<NonTerminalOutput>,
}

impl NonTerminalOutputVec {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|row| row.to_plaintext())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|row| row.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let data = self
            .non_terminals()
            .into_iter()
            .map(|nt| NonTerminalOutput {
                nullable: self.derives_to_lambda(&nt),
                first: sorted_tokens(self.first(std::slice::from_ref(&nt))),
                follow: sorted_tokens(self.follow(&nt)),
                name: nt.token,
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}

#[derive(Serialize)]
pub struct PredictOutput {
    rule: String,
    predict: Vec<String>,
}

#[derive(Serialize)]
pub struct PredictOutputVec {
    data: Vec<PredictOutput>,
    disjoint: bool,
}

impl PredictOutputVec {
    pub fn to_plaintext(&self) -> String {
        let mut lines: Vec<String> = self
            .data
            .iter()
            .map(|p| format!("Predict({}): {}", p.rule, p.predict.join(", ")))
            .collect();
        lines.push(format!(
            "Predict sets disjoint: {}",
            if self.disjoint { "yes" } else { "no" }
        ));
        lines.join("\n")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|p| {
                format!(
                    "{} & {}",
                    escape::tex(p.rule.as_str()).replace(LAMBDA, "\\lambda"),
                    latex_symbols(&p.predict)
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\begin{tabular}{c|c}\nRule & Predict\\\\\\hline\n".to_string()
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_predict_output_vec(&self) -> PredictOutputVec {
        let data = self
            .rules()
            .iter()
            .map(|rule| PredictOutput {
                rule: rule.to_string(),
                predict: sorted_tokens(self.predict(rule)),
            })
            .collect();
        PredictOutputVec {
            data,
            disjoint: self.predict_sets_disjoint(),
        }
    }
}

#[derive(Serialize)]
pub struct LL1TableOutput {
    columns: Vec<String>,
    rows: Vec<LL1RowOutput>,
}

#[derive(Serialize)]
pub struct LL1RowOutput {
    left: String,
    cells: Vec<String>,
}

impl LL1TableOutput {
    pub fn to_plaintext(&self) -> String {
        let mut grid: Vec<Vec<String>> = vec![std::iter::once(String::new())
            .chain(self.columns.iter().cloned())
            .collect()];
        for row in &self.rows {
            grid.push(
                std::iter::once(row.left.clone())
                    .chain(row.cells.iter().cloned())
                    .collect(),
            );
        }
        render_grid(&grid)
    }

    pub fn to_latex(&self) -> String {
        let header = std::iter::once(String::new())
            .chain(
                self.columns
                    .iter()
                    .map(|c| format!("\\text{{{}}}", escape::tex(c.as_str()))),
            )
            .collect::<Vec<_>>()
            .join(" & ");

        let content = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(escape::tex(row.left.as_str()).to_string())
                    .chain(
                        row.cells
                            .iter()
                            .map(|c| escape::tex(c.as_str()).replace(LAMBDA, "\\lambda")),
                    )
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        format!(
            "\\[\\begin{{array}}{{c{}}}\n{}\\\\\\hline\n{}\n\\end{{array}}\\]",
            "|l".repeat(self.columns.len()),
            header,
            content
        )
    }
}

impl LLTable {
    pub fn to_output(&self, grammar: &Grammar) -> LL1TableOutput {
        let mut columns: Vec<Symbol> = grammar.terminals();
        columns.push(Symbol::end());

        let rows = grammar
            .non_terminals()
            .into_iter()
            .map(|nt| {
                let cells = columns
                    .iter()
                    .map(|lookahead| match self.rule_for(&nt, lookahead) {
                        Some(rule) => rule.to_string(),
                        None => String::new(),
                    })
                    .collect();
                LL1RowOutput {
                    left: nt.token,
                    cells,
                }
            })
            .collect();

        LL1TableOutput {
            columns: columns.into_iter().map(|s| s.token).collect(),
            rows,
        }
    }
}

impl Item {
    pub fn to_latex(&self) -> String {
        let mut right: Vec<String> = Vec::new();
        for (i, symbol) in self.rule.right.iter().enumerate() {
            if i == self.marker {
                right.push(".".to_string());
            }
            right.push(escape::tex(symbol.token.as_str()).to_string());
        }
        if self.marker == self.rule.right.len() {
            right.push(".".to_string());
        }
        format!(
            "${} \\rightarrow {}$",
            escape::tex(self.rule.left.token.as_str()),
            right.join(" ").replace(LAMBDA, "\\lambda")
        )
    }
}

impl Action {
    pub fn to_plaintext(&self) -> String {
        match self {
            Action::Shift(target) => format!("s{}", target),
            Action::Reduce {
                accepting: true, ..
            } => "acc".to_string(),
            Action::Reduce { rule, .. } => format!("r({})", rule),
        }
    }
}

#[derive(Serialize)]
pub struct LRStateOutput {
    index: usize,
    items: Vec<String>,
    edges: Vec<(String, usize)>,
}

impl LRStateOutput {
    fn to_plaintext(&self) -> String {
        let items = self.items.join("\n");
        let edges = if self.edges.is_empty() {
            String::new()
        } else {
            format!(
                "\n===\n{}",
                self.edges
                    .iter()
                    .map(|(symbol, target)| format!("- {} -> {}", symbol, target))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        };
        format!("I{}\n{}{}", self.index, items, edges)
    }

    fn node_to_latex(&self, automaton: &LRAutomaton) -> String {
        let content = automaton.states()[self.index]
            .items()
            .iter()
            .map(|item| item.to_latex())
            .collect::<Vec<_>>()
            .join(" \\\\ \n");
        format!(
            "\\node [block] (I_{}){}\n{{\n$I_{}$\\\\\n{}\n}};",
            self.index,
            if self.index > 0 {
                if self.index % 2 == 0 {
                    format!(" [below of = I_{}] ", self.index - 2)
                } else {
                    format!(" [right of = I_{}] ", self.index - 1)
                }
            } else {
                String::new()
            },
            self.index,
            content
        )
    }

    fn edges_to_latex(&self) -> String {
        self.edges
            .iter()
            .map(|(symbol, target)| {
                format!(
                    "\\path [->] (I_{}) edge {} node [above]{{{}}} (I_{});",
                    self.index,
                    if self.index == *target {
                        "[loop left]"
                    } else {
                        "[right]"
                    },
                    escape::tex(symbol.as_str()).replace(LAMBDA, "\\lambda"),
                    target
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Serialize)]
pub struct LRAutomatonOutput {
    states: Vec<LRStateOutput>,
}

impl LRAutomatonOutput {
    pub fn to_plaintext(&self) -> String {
        self.states
            .iter()
            .map(|state| state.to_plaintext())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn to_latex(&self, automaton: &LRAutomaton) -> String {
        format!(
            "\\begin{{tikzpicture}}[node distance=5cm,block/.style={{state, rectangle, text width=6em}}]\n{}\n\\end{{tikzpicture}}",
            self.states
                .iter()
                .map(|s| s.node_to_latex(automaton))
                .chain(self.states.iter().map(|s| s.edges_to_latex()))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

impl LRAutomaton {
    pub fn to_automaton_output(&self) -> LRAutomatonOutput {
        let states = self
            .states()
            .iter()
            .enumerate()
            .map(|(index, state)| {
                let items = state.items().iter().map(|item| item.to_string()).collect();
                let mut edges: Vec<(String, usize)> = self.actions()[index]
                    .iter()
                    .filter_map(|(symbol, action)| match action {
                        Action::Shift(target) => Some((symbol.token.clone(), *target)),
                        _ => None,
                    })
                    .collect();
                edges.sort();
                LRStateOutput {
                    index,
                    items,
                    edges,
                }
            })
            .collect();
        LRAutomatonOutput { states }
    }
}

#[derive(Serialize)]
pub struct LRTableOutput {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    conflicts: Vec<String>,
}

impl LRTableOutput {
    pub fn to_plaintext(&self) -> String {
        let mut grid: Vec<Vec<String>> = vec![std::iter::once(String::new())
            .chain(self.columns.iter().cloned())
            .collect()];
        for (i, row) in self.rows.iter().enumerate() {
            grid.push(
                std::iter::once(i.to_string())
                    .chain(row.iter().cloned())
                    .collect(),
            );
        }
        let table = render_grid(&grid);
        if self.conflicts.is_empty() {
            table
        } else {
            format!("{}\n\nConflicts:\n{}", table, self.conflicts.join("\n"))
        }
    }

    pub fn to_latex(&self) -> String {
        let header = std::iter::once(String::new())
            .chain(
                self.columns
                    .iter()
                    .map(|c| format!("\\text{{{}}}", escape::tex(c.as_str()))),
            )
            .collect::<Vec<_>>()
            .join(" & ");

        let content = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                std::iter::once(i.to_string())
                    .chain(
                        row.iter()
                            .map(|c| escape::tex(c.as_str()).replace(LAMBDA, "\\lambda")),
                    )
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        format!(
            "\\begin{{tabular}}{{c{}}}\n{}\\\\\\hline\n{}\\\\\n\\end{{tabular}}",
            "|l".repeat(self.columns.len()),
            header,
            content
        )
    }
}

impl LRAutomaton {
    pub fn to_table_output(&self, grammar: &Grammar) -> LRTableOutput {
        let mut columns: Vec<Symbol> = grammar.terminals();
        columns.push(Symbol::end());
        columns.extend(grammar.non_terminals());

        let rows = (0..self.states().len())
            .map(|state| {
                columns
                    .iter()
                    .map(|symbol| match self.action(state, symbol) {
                        Some(action) => action.to_plaintext(),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect();

        let conflicts = self
            .conflicts()
            .iter()
            .map(|c| {
                format!(
                    "state {}, symbol {}: {} overridden by {}",
                    c.state,
                    c.symbol,
                    c.previous.to_plaintext(),
                    c.chosen.to_plaintext()
                )
            })
            .collect();

        LRTableOutput {
            columns: columns.into_iter().map(|s| s.token).collect(),
            rows,
            conflicts,
        }
    }
}

impl ParseNode {
    pub fn to_plaintext(&self) -> String {
        let mut out = String::new();
        self.write_plaintext(0, &mut out);
        out.pop();
        out
    }

    fn write_plaintext(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.label.token);
        out.push('\n');
        for child in &self.children {
            child.write_plaintext(depth + 1, out);
        }
    }

    /// qtree notation: `\Tree [.S [.A a ] b ]`.
    pub fn to_latex(&self) -> String {
        let mut out = String::from("\\Tree ");
        self.write_latex(&mut out);
        out
    }

    fn write_latex(&self, out: &mut String) {
        let label = escape::tex(self.label.token.as_str()).replace(LAMBDA, "\\lambda");
        if self.is_leaf() {
            out.push_str(&label);
        } else {
            out.push_str("[.");
            out.push_str(&label);
            for child in &self.children {
                out.push(' ');
                child.write_latex(out);
            }
            out.push_str(" ]");
        }
    }
}
