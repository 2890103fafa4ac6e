use crate::formula::{Clause, Formula, Literal};
use std::fmt::{self, Display, Formatter};
use std::io::{BufRead, BufReader, Read, Write};

/// The counts declared on a `p cnf` line. The clause count is informational only.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Header {
    pub num_variables: usize,
    pub num_clauses: usize,
}

/// Parses a DIMACS CNF problem. Each non-blank line after the header is one clause, read up to
/// its `0` terminator; a bare `0` line is the empty clause. `c` lines are comments and a `%`
/// line ends the input.
pub fn parse<R: Read>(reader: R) -> Result<(Header, Formula), DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut clauses = vec![];
    let mut header = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let mut tokens = line.split_whitespace().peekable();

        match tokens.peek() {
            Some(&"c") | None => continue,
            Some(&"%") => break,
            Some(&"p") => {
                if header.is_some() {
                    return Err(DimacsParseError::Header(line_no, "duplicate 'p' line".into()));
                }
                header = Some(parse_header(line_no, tokens)?);
            }
            Some(_) => {
                let header = header
                    .as_ref()
                    .ok_or_else(|| DimacsParseError::Header(line_no, "missing 'p' line before clauses".into()))?;

                let mut clause = vec![];
                for token in tokens {
                    match parse_literal(line_no, token)? {
                        Some(l) if l.idx() > header.num_variables => {
                            return Err(DimacsParseError::LiteralOutOfRange {
                                line: line_no,
                                literal: l.to_dimacs(),
                                num_variables: header.num_variables,
                            })
                        }
                        Some(l) => clause.push(l),
                        None => break,
                    }
                }
                clauses.push(Clause::new(clause));
            }
        }
    }

    let header = header.ok_or_else(|| DimacsParseError::Header(0, "missing 'p' line".into()))?;
    log::debug!(
        "parsed {} clauses over {} variables (header declares {} clauses)",
        clauses.len(),
        header.num_variables,
        header.num_clauses
    );

    Ok((header, Formula::new(header.num_variables, clauses)))
}

fn parse_header<'a>(line: usize, mut tokens: impl Iterator<Item = &'a str>) -> Result<Header, DimacsParseError> {
    let _ = tokens.next();

    if tokens.next() != Some("cnf") {
        return Err(DimacsParseError::Header(line, "missing 'cnf'".into()));
    }

    let num_variables = tokens
        .next()
        .and_then(|c| c.parse::<usize>().ok())
        .filter(|n| n.checked_add(1).is_some())
        .ok_or_else(|| DimacsParseError::Header(line, "invalid num_variables".into()))?;

    let num_clauses = tokens
        .next()
        .and_then(|c| c.parse::<usize>().ok())
        .ok_or_else(|| DimacsParseError::Header(line, "invalid num_clauses".into()))?;

    if tokens.next().is_some() {
        return Err(DimacsParseError::Header(line, "trailing tokens".into()));
    }

    Ok(Header {
        num_variables,
        num_clauses,
    })
}

fn parse_literal(line: usize, s: &str) -> Result<Option<Literal>, DimacsParseError> {
    let l = s.parse::<i64>().map_err(|_| DimacsParseError::Literal {
        line,
        token: s.to_string(),
    })?;
    Ok(Literal::from_dimacs(l))
}

/// Writes `formula` in DIMACS CNF, one clause per line.
pub fn write<W: Write>(formula: &Formula, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "p cnf {} {}", formula.num_variables(), formula.num_clauses())?;
    for clause in formula.clauses() {
        for literal in clause.literals() {
            write!(writer, "{} ", literal.to_dimacs())?;
        }
        writeln!(writer, "0")?;
    }
    writer.flush()
}

#[derive(Debug)]
pub enum DimacsParseError {
    Io(std::io::Error),
    /// A missing or malformed `p cnf` line, with the line number (0 if the line is missing).
    Header(usize, String),
    Literal {
        line: usize,
        token: String,
    },
    LiteralOutOfRange {
        line: usize,
        literal: i64,
        num_variables: usize,
    },
}

impl From<std::io::Error> for DimacsParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Display for DimacsParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DimacsParseError::Io(e) => write!(f, "{}", e),
            DimacsParseError::Header(0, msg) => write!(f, "invalid header: {}", msg),
            DimacsParseError::Header(line, msg) => write!(f, "line {}: invalid header: {}", line, msg),
            DimacsParseError::Literal { line, token } => write!(f, "line {}: invalid literal '{}'", line, token),
            DimacsParseError::LiteralOutOfRange {
                line,
                literal,
                num_variables,
            } => write!(
                f,
                "line {}: literal {} out of range for {} variables",
                line, literal, num_variables
            ),
        }
    }
}

impl std::error::Error for DimacsParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DimacsParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}
