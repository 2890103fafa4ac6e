use btsat::formula::{dimacs, pigeonhole};
use clap::{App, Arg};
use std::io::{self, BufWriter};

fn main() {
    env_logger::init();

    let matches = App::new("btsat-pigeonhole")
        .about("Prints the pigeonhole formula for N pigeons and N-1 holes in DIMACS CNF")
        .arg(
            Arg::with_name("PIGEONS")
                .help("number of pigeons")
                .required(true)
                .index(1),
        )
        .get_matches();

    let pigeons = match matches.value_of("PIGEONS").unwrap_or_default().parse::<usize>() {
        Ok(pigeons) => pigeons,
        Err(e) => {
            eprintln!("error: invalid number of pigeons: {}", e);
            std::process::exit(1);
        }
    };

    let formula = pigeonhole(pigeons);
    log::info!(
        "pigeonhole({}): {} variables, {} clauses",
        pigeons,
        formula.num_variables(),
        formula.num_clauses()
    );

    let stdout = io::stdout();
    if let Err(e) = dimacs::write(&formula, BufWriter::new(stdout.lock())) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
