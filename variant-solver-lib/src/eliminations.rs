//! An ordered collection of candidates to eliminate.

use crate::board::Board;
use crate::candidate_id::CandidateId;
use crate::cell_id::CellId;
use crate::layout::Layout;
use crate::logic_result::LogicResult;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Candidates slated for elimination, deduplicated and kept in candidate
/// index order so descriptions and application order are deterministic.
///
/// The `Display` form is the compact notation used throughout step traces:
/// one `-<digit><cells>` term per digit, `;`-separated.
///
/// ```
/// # use variant_solver_lib::prelude::*;
/// let lay = Layout::new(9);
/// let mut elims = Eliminations::new();
/// elims.add_cell_digit(lay.cell(0, 0), 1);
/// elims.add_cell_digit(lay.cell(0, 1), 1);
/// elims.add_cell_digit(lay.cell(3, 4), 2);
/// assert_eq!(elims.to_string(), "-1r1c12;-2r4c5");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Eliminations {
    candidates: BTreeSet<CandidateId>,
}

impl Eliminations {
    pub fn new() -> Eliminations {
        Eliminations {
            candidates: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn contains(&self, candidate: CandidateId) -> bool {
        self.candidates.contains(&candidate)
    }

    pub fn add(&mut self, candidate: CandidateId) {
        self.candidates.insert(candidate);
    }

    pub fn add_cell_digit(&mut self, cell: CellId, digit: usize) {
        self.add(cell.candidate(digit));
    }

    pub fn iter(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.candidates.iter().copied()
    }

    /// Removes every listed candidate from the board. Candidates already
    /// gone are skipped; an emptied cell makes the whole application
    /// `Invalid`.
    pub fn apply(&self, board: &mut Board) -> LogicResult {
        let mut result = LogicResult::None;
        for candidate in self.iter() {
            if !board.has_candidate(candidate) {
                continue;
            }
            match board.clear_candidate(candidate) {
                LogicResult::Changed => result = LogicResult::Changed,
                LogicResult::None => {}
                other => return other,
            }
        }
        result
    }
}

impl FromIterator<CandidateId> for Eliminations {
    fn from_iter<I: IntoIterator<Item = CandidateId>>(iter: I) -> Eliminations {
        Eliminations {
            candidates: iter.into_iter().collect(),
        }
    }
}

impl Extend<CandidateId> for Eliminations {
    fn extend<I: IntoIterator<Item = CandidateId>>(&mut self, iter: I) {
        self.candidates.extend(iter);
    }
}

impl std::fmt::Display for Eliminations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.candidates.is_empty() {
            return write!(f, "no eliminations");
        }

        let size = self.candidates.iter().next().unwrap().size();
        let lay = Layout::new(size);
        let mut cells_by_digit: Vec<Vec<CellId>> = vec![Vec::new(); size];
        for candidate in self.iter() {
            let (cell, digit) = candidate.parts();
            cells_by_digit[digit - 1].push(cell);
        }

        let desc = (1..=size)
            .filter(|&digit| !cells_by_digit[digit - 1].is_empty())
            .map(|digit| format!("-{}{}", digit, lay.compact_name(&cells_by_digit[digit - 1])))
            .join(";");
        write!(f, "{}", desc)
    }
}
