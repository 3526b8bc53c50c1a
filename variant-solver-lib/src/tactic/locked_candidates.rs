//! Locked candidates: pointing and claiming, in one tactic.

use crate::board::Board;
use crate::cell_id::CellId;
use crate::deduction::{Deduction, StepTrace};
use crate::eliminations::Eliminations;
use crate::logic_result::LogicResult;
use crate::tactic::Tactic;

/// If all of a digit's homes within one group fall inside a second group,
/// the digit is locked there: it can be removed from the rest of the second
/// group. Pointing (region into line) and claiming (line into region) are
/// the two directions of the same statement, so a single scan over ordered
/// group pairs covers both.
#[derive(Debug)]
pub struct LockedCandidates;

impl Tactic for LockedCandidates {
    fn name(&self) -> &'static str {
        "Locked Candidates"
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();

        for group in core.groups() {
            if group.len() != board.size() {
                continue;
            }
            for digit in 1..=board.size() {
                let homes: Vec<CellId> = group
                    .cells()
                    .iter()
                    .copied()
                    .filter(|&cell| {
                        !board.mask(cell).is_committed() && board.mask(cell).has(digit)
                    })
                    .collect();
                if homes.len() < 2 {
                    // Zero homes is a contradiction hidden singles report;
                    // one home is a hidden single.
                    continue;
                }

                // Any group containing every home must contain the first.
                for other in core.groups_for(homes[0]) {
                    if std::ptr::eq(other.as_ref(), group.as_ref())
                        || !homes.iter().all(|&cell| other.contains(cell))
                    {
                        continue;
                    }

                    let elims: Eliminations = other
                        .cells()
                        .iter()
                        .filter(|&&cell| {
                            !group.contains(cell)
                                && !board.mask(cell).is_committed()
                                && board.mask(cell).has(digit)
                        })
                        .map(|&cell| cell.candidate(digit))
                        .collect();
                    if elims.is_empty() {
                        continue;
                    }

                    let desc = trace.map(|t| {
                        let desc = format!(
                            "Locked Candidates: {} in {} locked into {}",
                            digit, group, other
                        );
                        (t, desc)
                    });
                    let sources: Vec<_> =
                        homes.iter().map(|&cell| cell.candidate(digit)).collect();
                    let result = elims.apply(board);
                    if let Some((trace, desc)) = desc {
                        trace.push(Deduction::from_elims(&desc, &elims).with_sources(sources));
                    }
                    return result;
                }
            }
        }

        LogicResult::None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn pointing_pair_clears_the_rest_of_the_row() {
        let mut board = Board::new(9, &[], Vec::new(), CancelFlag::new());
        let lay = board.layout();

        // Confine 5 within box 1 to r1c1 and r1c2.
        for (row, col) in [(0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)] {
            board.clear_mask(lay.cell(row, col), DigitMask::single(5));
        }

        let mut trace = StepTrace::new();
        let result = LockedCandidates.apply(&mut board, Some(&mut trace));
        assert!(result.is_changed());
        for col in 3..9 {
            assert!(!board.candidates(lay.cell(0, col)).has(5));
        }
        // Box peers outside row 1 were already cleared by the setup.
        assert_eq!(
            trace.to_string(),
            "Locked Candidates: 5 in Region 1 locked into Row 1 => -5r1c456789"
        );
    }

    #[test]
    fn claiming_clears_the_rest_of_the_box() {
        let mut board = Board::new(9, &[], Vec::new(), CancelFlag::new());
        let lay = board.layout();

        // Confine 7 within row 1 to c1..c3, i.e. inside box 1.
        for col in 3..9 {
            board.clear_mask(lay.cell(0, col), DigitMask::single(7));
        }

        let result = LockedCandidates.apply(&mut board, None);
        assert!(result.is_changed());
        for (row, col) in [(1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(!board.candidates(lay.cell(row, col)).has(7));
        }
    }

    #[test]
    fn quiet_when_nothing_is_locked() {
        let mut board = Board::new(9, &[], Vec::new(), CancelFlag::new());
        assert!(LockedCandidates.apply(&mut board, None).is_none());
    }
}
