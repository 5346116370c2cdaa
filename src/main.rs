pub mod grammar;

use std::{fs, io::BufRead};

pub use grammar::Grammar;

fn print_help() {
    println!("Usage: cfg-analyzer outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  nff: Nullable, first and follow");
    println!("  predict: Predict sets and LL(1) disjointness");
    println!("  ll1: LL(1) parse table");
    println!("  lrfsm: SLR(1) automaton states");
    println!("  lrtable: SLR(1) action table");
    println!("  lltree: Parse tree of the input file, top-down driver");
    println!("  lrtree: Parse tree of the input file, bottom-up driver");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -i <file>: Token input file for lltree/lrtree");
}

enum OutputFormat {
    Plain,
    LaTeX,
    Json,
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn main() {
    let mut outputs: Vec<String> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len()
        && [
            "prod", "nff", "predict", "ll1", "lrfsm", "lrtable", "lltree", "lrtree",
        ]
        .contains(&args[i].as_str())
    {
        outputs.push(args[i].clone());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    let mut input_path: Option<String> = None;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-i"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::Json;
        } else if args[i] == "-i" {
            i += 1;
            if i == args.len() {
                fail("-i needs a file argument".to_string());
            }
            input_path = Some(args[i].clone());
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return;
    }

    let text: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .map(|l| l.unwrap())
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        match fs::read_to_string(args[i].as_str()) {
            Ok(text) => text,
            Err(e) => fail(format!("{}: {}", args[i], e)),
        }
    };

    let g = match Grammar::parse(&text) {
        Ok(g) => g,
        Err(e) => fail(e.to_string()),
    };

    let input_tokens = input_path.map(|path| {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => fail(format!("{}: {}", path, e)),
        };
        match grammar::parse::tokenize_input(&text) {
            Ok(tokens) => tokens,
            Err(e) => fail(e.to_string()),
        }
    });

    for output in outputs {
        if output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                }
            );
        }
        if output == "nff" {
            let t = g.to_non_terminal_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "predict" {
            let t = g.to_predict_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                }
            );
        }
        if output == "ll1" {
            let t = g.build_ll1_table().to_output(&g);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                }
            );
        }
        if output == "lrfsm" {
            let automaton = match g.build_lr_automaton() {
                Ok(automaton) => automaton,
                Err(e) => fail(e.to_string()),
            };
            let t = automaton.to_automaton_output();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(&automaton),
                    OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                }
            );
        }
        if output == "lrtable" {
            let automaton = match g.build_lr_automaton() {
                Ok(automaton) => automaton,
                Err(e) => fail(e.to_string()),
            };
            let t = automaton.to_table_output(&g);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t).unwrap(),
                }
            );
        }
        if output == "lltree" || output == "lrtree" {
            let tokens = match &input_tokens {
                Some(tokens) => tokens,
                None => fail(format!("{} needs an input file, pass -i <file>", output)),
            };
            let tree = if output == "lltree" {
                g.build_ll1_table().parse(tokens)
            } else {
                match g.build_lr_automaton() {
                    Ok(automaton) => automaton.parse(tokens),
                    Err(e) => fail(e.to_string()),
                }
            };
            match tree {
                Ok(tree) => println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => tree.to_plaintext(),
                        OutputFormat::LaTeX => tree.to_latex(),
                        OutputFormat::Json => serde_json::to_string(&tree).unwrap(),
                    }
                ),
                Err(e) => fail(e.to_string()),
            }
        }
    }
}
