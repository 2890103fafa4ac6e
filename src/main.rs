use btsat::formula::dimacs::{parse, DimacsParseError, Header};
use btsat::formula::Formula;
use btsat::*;
use clap::{App, Arg};
use log::info;
use std::fs::File;
use std::time::Instant;

fn main() {
    env_logger::init();

    let matches = App::new("btsat")
        .about("Decides a DIMACS CNF formula by chronological backtracking")
        .arg(
            Arg::with_name("INPUT")
                .help("input file (in CNF)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("recursive")
                .long("recursive")
                .help("use the recursive search driver (one native stack frame per variable)"),
        )
        .arg(
            Arg::with_name("model")
                .long("model")
                .help("print the satisfying assignment as a 'v' line"),
        )
        .arg(
            Arg::with_name("verify")
                .long("verify")
                .help("check the satisfying assignment against the formula"),
        )
        .get_matches();

    let path = matches.value_of("INPUT").unwrap_or_default();
    let (header, f) = match parse_from_file(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!("# of vars (from input): {}", header.num_variables);
    println!("# of clauses (from input): {}", header.num_clauses);

    let config = SolverConfig {
        strategy: if matches.is_present("recursive") {
            Strategy::Recursive
        } else {
            Strategy::Iterative
        },
    };
    let mut solver = Solver::with_config(f, config);

    let start = Instant::now();
    let result = solver.solve();
    let stats = solver.stats();
    info!(
        "{:?} in {:.3}s ({} decisions, {} consistency checks, {} backtracks)",
        result,
        start.elapsed().as_secs_f64(),
        stats.decisions,
        stats.consistency_checks,
        stats.backtracks
    );

    let verify = matches.is_present("verify");
    match result_line(&result, solver.model(), verify) {
        Ok(line) => println!("{}", line),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
    if result == SatResult::Satisfiable && matches.is_present("model") {
        println!("{}", solver.assignment());
    }
}

/// The line to print for `result`. With `verify`, a satisfiable result without a checked model
/// is an error and nothing is printed.
fn result_line(result: &SatResult, model: Option<&Assignment>, verify: bool) -> Result<&'static str, String> {
    match result {
        SatResult::Satisfiable if verify && model.is_none() => {
            Err("assignment does not satisfy the formula".to_string())
        }
        SatResult::Satisfiable => Ok("SAT"),
        SatResult::Unsatisfiable => Ok("UNSAT"),
    }
}

fn parse_from_file(path: &str) -> Result<(Header, Formula), DimacsParseError> {
    let file = File::open(path)?;
    parse(file)
}
