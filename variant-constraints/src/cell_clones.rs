//! Clones: two regions forced to hold identical digits cell for cell.

use itertools::Itertools;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// Pairs up two equally sized cell lists; the i-th cells of each list
/// always hold the same digit. Declared as clone links, so the propagator
/// copies commits and eliminations across automatically.
pub struct CellClones {
    specific_name: String,
    first: Vec<CellId>,
    second: Vec<CellId>,
}

/// Factory for option strings of the form `<cells>;<cells>`, equal lengths.
pub fn factory(size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    let (first_text, second_text) = options
        .split_once(';')
        .ok_or_else(|| format!("clone options need '<cells>;<cells>': {}", options))?;
    let lay = Layout::new(size);
    let first = lay.parse_cells(first_text)?;
    let second = lay.parse_cells(second_text)?;
    Ok(Arc::new(CellClones::new(first, second)?))
}

impl CellClones {
    pub fn new(first: Vec<CellId>, second: Vec<CellId>) -> Result<Self, String> {
        if first.len() != second.len() {
            return Err(format!(
                "clone regions differ in size: {} vs {}",
                first.len(),
                second.len()
            ));
        }
        if first.is_empty() {
            return Err("clone regions cannot be empty".to_owned());
        }
        if first
            .iter()
            .zip(second.iter())
            .any(|(a, b)| a == b)
        {
            return Err("a cell cannot be cloned onto itself".to_owned());
        }

        let specific_name = format!("Clone at {}", first[0]);
        Ok(Self {
            specific_name,
            first,
            second,
        })
    }
}

impl Constraint for CellClones {
    fn name(&self) -> &str {
        "Clone"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn enforced_by_links(&self) -> bool {
        true
    }

    fn init_candidates(&self, board: &mut Board) -> LogicResult {
        // Paired cells can only keep candidates both sides still have.
        let mut result = LogicResult::None;
        for (&a, &b) in self.first.iter().zip(self.second.iter()) {
            let shared = board.candidates(a) & board.candidates(b);
            result = result.combine(board.keep_mask(a, shared));
            if result.is_terminal() {
                return result;
            }
            result = result.combine(board.keep_mask(b, shared));
            if result.is_terminal() {
                return result;
            }
        }
        result
    }

    fn init_links(&self, board: &Board, _initializing: bool) -> ConstraintLinks {
        let mut clones = Vec::new();
        for (&a, &b) in self.first.iter().zip(self.second.iter()) {
            for digit in 1..=board.size() {
                clones.push((a.candidate(digit), b.candidate(digit)));
            }
        }
        ConstraintLinks {
            clones,
            ..ConstraintLinks::default()
        }
    }

    fn signature(&self) -> String {
        format!(
            "Clone:{};{}",
            self.first.iter().map(|c| c.to_string()).join(""),
            self.second.iter().map(|c| c.to_string()).join("")
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn commits_copy_across_the_clone() {
        let lay = Layout::new(9);
        let solver = SolverBuilder::new(9)
            .with_constraint(factory(9, "r1c1r1c2;r8c8r8c9").unwrap())
            .with_given(lay.cell(0, 0), 3)
            .build()
            .unwrap();

        let board = solver.board();
        assert!(board.is_committed(lay.cell(7, 7)));
        assert_eq!(board.value(lay.cell(7, 7)), 3);
    }

    #[test]
    fn eliminations_copy_across_the_clone() {
        let lay = Layout::new(9);
        let solver = SolverBuilder::new(9)
            .with_constraint(factory(9, "r1c1r1c2;r8c8r8c9").unwrap())
            // 7 in r5c2 knocks 7 out of r1c2 by column, so out of the
            // partner r8c9 too; r1c1 and its partner keep theirs.
            .with_given(lay.cell(4, 1), 7)
            .build()
            .unwrap();

        let board = solver.board();
        assert!(!board.candidates(lay.cell(0, 1)).has(7));
        assert!(!board.candidates(lay.cell(7, 8)).has(7));
        assert!(board.candidates(lay.cell(0, 0)).has(7));
        assert!(board.candidates(lay.cell(7, 7)).has(7));
    }

    #[test]
    fn overlapping_regions_are_rejected() {
        assert!(factory(9, "r1c1;r1c1").is_err());
        assert!(factory(9, "r1c1;r2c1r2c2").is_err());
        assert!(factory(9, "r1c1;").is_err());
    }
}
