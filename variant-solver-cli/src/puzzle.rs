//! JSON puzzle descriptions and solver assembly.

use serde::Deserialize;
use std::path::Path;
use variant_solver_lib::prelude::*;

/// On-disk puzzle format:
///
/// ```json
/// {
///   "size": 9,
///   "givens": "530070000...",
///   "regions": [0, 0, 0, 1, ...],
///   "constraints": [
///     { "name": "killer", "options": "10;r1c1r1c2" },
///     { "name": "nonconsecutive" }
///   ]
/// }
/// ```
///
/// `givens`, `regions`, and `constraints` are all optional.
#[derive(Debug, Deserialize)]
pub struct PuzzleFile {
    pub size: usize,
    #[serde(default)]
    pub givens: String,
    #[serde(default)]
    pub regions: Vec<usize>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ConstraintSpec {
    pub name: String,
    #[serde(default)]
    pub options: String,
}

impl PuzzleFile {
    pub fn load(path: &Path) -> Result<PuzzleFile, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|error| format!("cannot read {}: {}", path.display(), error))?;
        serde_json::from_str(&text)
            .map_err(|error| format!("cannot parse {}: {}", path.display(), error))
    }
}

/// Builds a finalized solver from a puzzle file and/or command-line pieces.
/// Inline givens and constraints are applied on top of the file's.
pub fn build_solver(
    file: Option<&Path>,
    size: usize,
    givens: Option<&str>,
    constraint_args: &[String],
) -> Result<Solver, String> {
    let factories = variant_constraints::standard_factories();

    let mut builder;
    match file {
        Some(path) => {
            let puzzle = PuzzleFile::load(path)?;
            builder = SolverBuilder::new(puzzle.size);
            if !puzzle.regions.is_empty() {
                builder = builder.with_regions(puzzle.regions);
            }
            if !puzzle.givens.is_empty() {
                builder = builder.with_givens_string(&puzzle.givens);
            }
            for spec in &puzzle.constraints {
                builder = builder.with_named_constraint(&factories, &spec.name, &spec.options);
            }
        }
        None => {
            builder = SolverBuilder::new(size);
        }
    }

    if let Some(givens) = givens {
        builder = builder.with_givens_string(givens);
    }
    for arg in constraint_args {
        let (name, options) = match arg.split_once(':') {
            Some((name, options)) => (name, options),
            None => (arg.as_str(), ""),
        };
        builder = builder.with_named_constraint(&factories, name, options);
    }

    builder.build()
}

/// Renders a solved (or partial) board as one row per line.
pub fn render_grid(board: &Board) -> String {
    let lay = board.layout();
    let mut text = String::new();
    for row in 0..board.size() {
        if row > 0 {
            text.push('\n');
        }
        for col in 0..board.size() {
            if col > 0 && board.size() > 9 {
                text.push(' ');
            }
            let cell = lay.cell(row, col);
            let mask = board.candidates(cell);
            if mask.is_single() {
                text.push_str(&mask.sole().to_string());
            } else {
                text.push('.');
            }
        }
    }
    text
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn inline_constraint_args() {
        let solver = build_solver(
            None,
            9,
            None,
            &["killer:10;r1c1r1c2".to_owned(), "antiknight".to_owned()],
        )
        .unwrap();
        assert_eq!(solver.board().registry().len(), 2);
    }

    #[test]
    fn parses_a_puzzle_document() {
        let text = r#"{
            "size": 4,
            "givens": "1000000000000000",
            "constraints": [{ "name": "nonconsecutive" }]
        }"#;
        let puzzle: PuzzleFile = serde_json::from_str(text).unwrap();
        assert_eq!(puzzle.size, 4);
        assert_eq!(puzzle.constraints.len(), 1);
        assert!(puzzle.regions.is_empty());
    }

    #[test]
    fn renders_partial_grids() {
        let solver = build_solver(None, 4, Some("1234000000000000"), &[]).unwrap();
        let text = render_grid(solver.board());
        assert!(text.starts_with("1234\n"));
    }
}
