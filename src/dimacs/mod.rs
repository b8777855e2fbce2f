// src/dimacs/mod.rs

//! Reads and writes the plain-text DIMACS CNF format:
//!
//! ```text
//! c comment
//! p cnf 5 3
//! 1 2 0
//! -3 -4 0
//! -5 1 0
//! ```

use crate::core::{Clause, Formula, GroverError, Literal};

/// Parses a DIMACS CNF document.
///
/// Comment (`c ...`) and blank lines are skipped, `%` ends the body, and a
/// clause may span several lines until its terminating `0`. Without a
/// `p cnf` header the variable count is the highest literal magnitude.
pub fn parse(input: &str) -> Result<Formula, GroverError> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses = Vec::new();
    let mut pending: Vec<Literal> = Vec::new();

    for (line_no, raw) in input.lines().enumerate() {
        let line = raw.trim();
        let line_no = line_no + 1;
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('%') {
            break;
        }
        if line.starts_with('p') {
            if header.is_some() {
                return Err(GroverError::malformed(format!("line {}: duplicate problem line", line_no)));
            }
            if !clauses.is_empty() || !pending.is_empty() {
                return Err(GroverError::malformed(format!("line {}: problem line after clauses", line_no)));
            }
            header = Some(parse_header(line, line_no)?);
            continue;
        }
        for token in line.split_whitespace() {
            let value: i64 = token.parse().map_err(|_| {
                GroverError::malformed(format!("line {}: `{}` is not an integer literal", line_no, token))
            })?;
            if value == 0 {
                if pending.is_empty() {
                    return Err(GroverError::malformed(format!("line {}: empty clause", line_no)));
                }
                clauses.push(Clause::new(std::mem::take(&mut pending))?);
            } else {
                pending.push(Literal::new(value)?);
            }
        }
    }
    if !pending.is_empty() {
        // tolerate a missing final terminator
        clauses.push(Clause::new(pending)?);
    }

    match header {
        Some((num_vars, num_clauses)) => {
            if clauses.len() != num_clauses {
                return Err(GroverError::malformed(format!(
                    "problem line declares {} clause(s) but {} were found",
                    num_clauses,
                    clauses.len()
                )));
            }
            Formula::with_num_vars(num_vars, clauses)
        }
        None => Formula::new(clauses),
    }
}

fn parse_header(line: &str, line_no: usize) -> Result<(usize, usize), GroverError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let parse = |s: &str| {
                s.parse::<usize>().map_err(|_| {
                    GroverError::malformed(format!("line {}: `{}` is not a valid count", line_no, s))
                })
            };
            Ok((parse(vars)?, parse(clauses)?))
        }
        _ => Err(GroverError::malformed(format!(
            "line {}: expected `p cnf <variables> <clauses>`, found `{}`",
            line_no, line
        ))),
    }
}

/// Writes `formula` in DIMACS CNF form.
pub fn write(formula: &Formula) -> String {
    let mut out = format!("p cnf {} {}\n", formula.num_vars(), formula.num_clauses());
    for clause in formula.clauses() {
        for lit in clause.literals() {
            out.push_str(&lit.value().to_string());
            out.push(' ');
        }
        out.push_str("0\n");
    }
    out
}
