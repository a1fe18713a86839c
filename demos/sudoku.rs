//! Sudoku solved as an exact cover problem.
//!
//! The encoding follows the textbook DLX reduction: a solved grid picks exactly
//! one `(row, column, number)` triple per cell, per row, per column and per box.
//! Each of those four requirements becomes a column; each candidate placement
//! becomes a subset covering the four columns it satisfies.
//!
//! Run with a single 81-character argument (row-major, `.` or `0` for blanks)
//! or with no arguments to solve the bundled 17-clue puzzle.

use std::cell::RefCell;
use std::env;
use std::fmt::Write as _;
use std::rc::Rc;

use exact_cover::Matrix;

/// The 17-clue minimal puzzle used as the reduction's original test case.
const DEFAULT_PUZZLE: &str = "\
...8.1...\
.......43\
5........\
....7.8..\
......1..\
.2..3....\
6......75\
..34.....\
...2..6..";

fn box_of(row: usize, col: usize) -> usize {
    3 * ((row - 1) / 3) + (col - 1) / 3 + 1
}

fn build_universe() -> Matrix {
    let mut columns = Vec::with_capacity(324);
    for i in 1..=9 {
        for j in 1..=9 {
            columns.push(format!("R{i}C{j}"));
            columns.push(format!("R{i}#{j}"));
            columns.push(format!("C{i}#{j}"));
            columns.push(format!("B{i}#{j}"));
        }
    }

    let mut mat = Matrix::from_elements(columns);

    for row in 1..=9 {
        for col in 1..=9 {
            for num in 1..=9 {
                let name = format!("R{row}C{col}#{num}");
                let b = box_of(row, col);
                mat.define_subset(
                    &name,
                    [
                        format!("R{row}C{col}"),
                        format!("R{row}#{num}"),
                        format!("C{col}#{num}"),
                        format!("B{b}#{num}"),
                    ],
                );
            }
        }
    }

    mat
}

/// Parses a subset name of the form `R{row}C{col}#{num}` back into its triple.
fn parse_placement(name: &str) -> Option<(usize, usize, usize)> {
    let rest = name.strip_prefix('R')?;
    let (row, rest) = rest.split_once('C')?;
    let (col, num) = rest.split_once('#')?;
    Some((row.parse().ok()?, col.parse().ok()?, num.parse().ok()?))
}

fn require_givens(mat: &mut Matrix, puzzle: &str) -> Result<(), String> {
    if puzzle.len() != 81 {
        return Err(format!("puzzle must have 81 cells, got {}", puzzle.len()));
    }

    for (i, ch) in puzzle.chars().enumerate() {
        if ch == '.' || ch == '0' {
            continue;
        }
        let digit = ch
            .to_digit(10)
            .filter(|&d| (1..=9).contains(&d))
            .ok_or_else(|| format!("invalid cell character {ch:?} at position {i}"))?;
        let row = i / 9 + 1;
        let col = i % 9 + 1;
        let name = format!("R{row}C{col}#{digit}");
        if !mat.require_in_solution(&name) {
            return Err(format!("given {name} conflicts with an earlier given"));
        }
    }

    Ok(())
}

fn render(names: &[String]) -> String {
    let mut grid = [[0u8; 9]; 9];
    for name in names {
        if let Some((row, col, num)) = parse_placement(name) {
            grid[row - 1][col - 1] = num as u8;
        }
    }

    let mut out = String::new();
    for (r, line) in grid.iter().enumerate() {
        if r > 0 && r % 3 == 0 {
            out.push_str("------+-------+------\n");
        }
        for (c, &n) in line.iter().enumerate() {
            if c > 0 && c % 3 == 0 {
                out.push_str("| ");
            }
            let _ = write!(out, "{} ", n);
        }
        out.push('\n');
    }
    out
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let puzzle = env::args().nth(1).unwrap_or_else(|| DEFAULT_PUZZLE.to_string());

    let mut mat = build_universe();
    if let Err(e) = require_givens(&mut mat, &puzzle) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let found_names = Rc::new(RefCell::new(None));
    let sink_names = found_names.clone();
    mat.set_solution_sink(Some(Box::new(move |_: &Matrix, names: &[String]| {
        if !names.is_empty() {
            sink_names.borrow_mut().get_or_insert_with(|| names.to_vec());
        }
    })));

    let found = mat.search(false);
    log::info!("search finished, {found} solution(s) found");

    let found_names_ref = found_names.borrow();
    match found_names_ref.as_ref() {
        Some(names) => print!("{}", render(names)),
        None => println!("no solution"),
    }
}
