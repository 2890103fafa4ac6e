use clap::{App, Arg};
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Average wall-clock seconds, one row per input file and one column per command.
#[derive(Debug)]
struct BenchResults {
    commands: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
}

impl BenchResults {
    fn new(commands: Vec<String>) -> Self {
        Self { commands, rows: vec![] }
    }

    fn push_row(&mut self, input: String, times: Vec<f64>) {
        assert_eq!(times.len(), self.commands.len());
        self.rows.push((input, times));
    }

    fn render_table(&self) -> String {
        let header: Vec<&str> = std::iter::once("").chain(self.commands.iter().map(|c| c.as_str())).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|(input, times)| {
                std::iter::once(input.clone())
                    .chain(times.iter().map(|t| format!("{:.3}", t)))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for row in &body {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let rule = widths.iter().fold(String::from("+"), |mut acc, w| {
            acc.push_str(&"-".repeat(w + 2));
            acc.push('+');
            acc
        });
        let line = |cells: &[&str]| {
            let mut out = String::from("|");
            for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
                if i == 0 {
                    out.push_str(&format!(" {:<width$} |", cell, width = width));
                } else {
                    out.push_str(&format!(" {:>width$} |", cell, width = width));
                }
            }
            out
        };

        let mut table = vec![rule.clone(), line(&header), rule.clone()];
        for row in &body {
            let cells: Vec<&str> = row.iter().map(|c| c.as_str()).collect();
            table.push(line(&cells));
        }
        table.push(rule);
        table.join("\n") + "\n"
    }

    fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let commands: Vec<String> = self.commands.iter().map(|c| csv_field(c)).collect();
        writeln!(writer, ",{}", commands.join(","))?;
        for (input, times) in &self.rows {
            let times: Vec<String> = times.iter().map(|t| t.to_string()).collect();
            writeln!(writer, "{},{}", csv_field(input), times.join(","))?;
        }
        writer.flush()
    }
}

/// Quotes a field holding a separator, quote or line break, doubling embedded quotes.
fn csv_field(field: &str) -> String {
    if field.contains(|c: char| c == ',' || c == '"' || c == '\n' || c == '\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Runs `command` with `input` appended as its last argument and returns the elapsed seconds.
/// A command that fails to start or exits unsuccessfully is reported, and its time still counts.
fn run_command(command: &str, input: &str) -> f64 {
    let mut words = command.split_whitespace();
    let program = words.next().unwrap_or_default();

    let start = Instant::now();
    let status = Command::new(program)
        .args(words)
        .arg(input)
        .stdout(Stdio::null())
        .status();
    let elapsed = start.elapsed().as_secs_f64();

    match status {
        Ok(status) if status.success() => {}
        Ok(status) => eprintln!("Error: '{} {}' exited with {}", command, input, status),
        Err(e) => eprintln!("Error: could not run '{} {}': {}", command, input, e),
    }
    elapsed
}

fn measure_average_time(command: &str, input: &str, runs: usize) -> f64 {
    info!("running: {} {}", command, input);
    let mut total = 0.0;
    for run in 0..runs {
        let elapsed = run_command(command, input);
        debug!("run {}: {:.4} seconds", run + 1, elapsed);
        total += elapsed;
    }
    let average = total / runs as f64;
    info!("average execution time: {:.4} seconds", average);
    average
}

fn default_commands() -> Vec<String> {
    let solver = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("btsat")))
        .unwrap_or_else(|| PathBuf::from("btsat"));
    let solver = solver.display().to_string();
    vec![solver.clone(), format!("{} --recursive", solver)]
}

fn main() {
    env_logger::init();

    let matches = App::new("btsat-bench")
        .about("Times solver commands over DIMACS inputs and tabulates the average run time")
        .arg(
            Arg::with_name("INPUT")
                .help("DIMACS CNF files to solve")
                .required(true)
                .multiple(true),
        )
        .arg(
            Arg::with_name("command")
                .long("command")
                .short("c")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("solver command to time; the input path is appended as its last argument"),
        )
        .arg(
            Arg::with_name("runs")
                .long("runs")
                .short("n")
                .takes_value(true)
                .default_value("3")
                .help("invocations per command and input"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .default_value("result.csv")
                .help("CSV file to write"),
        )
        .get_matches();

    let runs = match matches.value_of("runs").unwrap_or_default().parse::<usize>() {
        Ok(runs) if runs > 0 => runs,
        _ => {
            eprintln!("error: --runs must be a positive integer");
            std::process::exit(1);
        }
    };
    let commands: Vec<String> = match matches.values_of("command") {
        Some(commands) => commands.map(String::from).collect(),
        None => default_commands(),
    };
    let inputs: Vec<&str> = matches.values_of("INPUT").map(|v| v.collect()).unwrap_or_default();

    let mut results = BenchResults::new(commands.clone());
    for input in inputs {
        let times = commands
            .iter()
            .map(|command| measure_average_time(command, input, runs))
            .collect();
        results.push_row(input.to_string(), times);
    }

    print!("{}", results.render_table());

    let output = Path::new(matches.value_of("output").unwrap_or("result.csv"));
    if let Err(e) = File::create(output).and_then(|file| results.write_csv(BufWriter::new(file))) {
        eprintln!("error: {}: {}", output.display(), e);
        std::process::exit(1);
    }
}
