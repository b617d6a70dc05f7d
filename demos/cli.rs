use numgraph::{Builtins, Expression, Graph, NodeKind};
use std::io::{BufRead, BufReader};

const USAGE: &str = "Usage: cli [--builtins | EQUATION]

With no arguments, equations are read from stdin, one per line.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    match std::env::args().nth(1).as_deref() {
        Some("--help") | Some("-h") => println!("{}", USAGE),
        Some("--builtins") => list_builtins(&Builtins::default()),
        Some(equation) => {
            if !visualize(equation) {
                std::process::exit(1);
            }
        },
        None => {
            let stdin = std::io::stdin();

            for line in BufReader::new(stdin.lock()).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }

                visualize(&line);
            }
        },
    }

    Ok(())
}

fn list_builtins(builtins: &Builtins<'_>) {
    println!("Functions:");
    for function in builtins.functions() {
        println!("  {} ({})", function.name, function.arity);
    }

    println!("Constants: {}", builtins.constants().join(", "));
}

fn visualize(equation: &str) -> bool {
    match equation.parse::<Expression>() {
        Ok(expr) => {
            let kind = if expr.is_equation() {
                "Equation"
            } else {
                "Expression"
            };
            println!("{}: {}", kind, expr);

            describe(&numgraph::build(expr));
            true
        },
        Err(e) => {
            eprintln!("Unable to parse \"{}\": {}", equation, e);
            false
        },
    }
}

fn describe(graph: &Graph) {
    let stats = graph.statistics();

    print!("{}", graph);

    let variables: Vec<_> = graph.variables().into_iter().collect();
    println!("  Variables: {}", variables.join(", "));
    println!(
        "  Nodes: {}, Edges: {}, Depth: {}",
        stats.nodes, stats.edges, stats.depth
    );

    for kind in &NodeKind::ALL {
        let count = stats.count_of(*kind);
        if count > 0 {
            println!("    {}: {}", kind, count);
        }
    }
}
