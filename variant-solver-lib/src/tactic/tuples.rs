//! Naked and hidden tuples up to a configurable degree.

use crate::board::Board;
use crate::cell_id::CellId;
use crate::deduction::{Deduction, StepTrace};
use crate::digit_mask::DigitMask;
use crate::eliminations::Eliminations;
use crate::logic_result::LogicResult;
use crate::tactic::Tactic;
use itertools::Itertools;

fn tuple_word(len: usize) -> String {
    match len {
        2 => "Pair".to_owned(),
        3 => "Triple".to_owned(),
        4 => "Quad".to_owned(),
        n => format!("{}-Tuple", n),
    }
}

/// K cells of a group sharing K candidates between them exclude those
/// candidates from the rest of the group.
#[derive(Debug)]
pub struct NakedTuples {
    max_size: usize,
}

impl NakedTuples {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

impl Tactic for NakedTuples {
    fn name(&self) -> &'static str {
        "Naked Tuples"
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();

        for group in core.groups() {
            let open: Vec<CellId> = group
                .cells()
                .iter()
                .copied()
                .filter(|&cell| !board.mask(cell).is_committed())
                .collect();
            if open.len() < 3 {
                continue;
            }

            for k in 2..=self.max_size.min(open.len() - 1) {
                for cells in open.iter().copied().combinations(k) {
                    let union = cells
                        .iter()
                        .fold(DigitMask::empty(), |acc, &cell| acc | board.candidates(cell));
                    if union.count() != k {
                        continue;
                    }

                    let elims: Eliminations = open
                        .iter()
                        .filter(|cell| !cells.contains(*cell))
                        .flat_map(|&cell| {
                            (board.candidates(cell) & union)
                                .into_iter()
                                .map(move |digit| cell.candidate(digit))
                        })
                        .collect();
                    if elims.is_empty() {
                        continue;
                    }

                    let desc = trace.map(|t| {
                        let desc = format!(
                            "Naked {}: {} in {} within {}",
                            tuple_word(k),
                            union,
                            board.layout().compact_name(&cells),
                            group
                        );
                        (t, desc)
                    });
                    let sources: Vec<_> = cells
                        .iter()
                        .flat_map(|&cell| {
                            board
                                .candidates(cell)
                                .into_iter()
                                .map(move |digit| cell.candidate(digit))
                        })
                        .collect();
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

/// K digits of a full group confined to K cells exclude every other digit
/// from those cells.
#[derive(Debug)]
pub struct HiddenTuples {
    max_size: usize,
}

impl HiddenTuples {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

impl Tactic for HiddenTuples {
    fn name(&self) -> &'static str {
        "Hidden Tuples"
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();
        let size = board.size();

        for group in core.groups() {
            // Short groups do not need to contain every digit, so digits
            // cannot be pinned to their homes there.
            if group.len() != size {
                continue;
            }

            let open: Vec<CellId> = group
                .cells()
                .iter()
                .copied()
                .filter(|&cell| !board.mask(cell).is_committed())
                .collect();
            if open.len() < 3 {
                continue;
            }

            let unplaced: Vec<usize> = (1..=size)
                .filter(|&digit| open.iter().any(|&cell| board.candidates(cell).has(digit)))
                .collect();

            for k in 2..=self.max_size.min(open.len().saturating_sub(1)) {
                for digits in unplaced.iter().copied().combinations(k) {
                    let tuple_mask: DigitMask = digits.iter().copied().collect();
                    let homes: Vec<CellId> = open
                        .iter()
                        .copied()
                        .filter(|&cell| (board.candidates(cell) & tuple_mask).is_valid())
                        .collect();
                    if homes.len() != k {
                        continue;
                    }

                    let elims: Eliminations = homes
                        .iter()
                        .flat_map(|&cell| {
                            (board.candidates(cell) & !tuple_mask)
                                .into_iter()
                                .map(move |digit| cell.candidate(digit))
                        })
                        .collect();
                    if elims.is_empty() {
                        continue;
                    }

                    let desc = trace.map(|t| {
                        let desc = format!(
                            "Hidden {}: {} confined to {} in {}",
                            tuple_word(k),
                            tuple_mask,
                            board.layout().compact_name(&homes),
                            group
                        );
                        (t, desc)
                    });
                    let sources: Vec<_> = homes
                        .iter()
                        .flat_map(|&cell| {
                            (board.candidates(cell) & tuple_mask)
                                .into_iter()
                                .map(move |digit| cell.candidate(digit))
                        })
                        .collect();
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

    fn board() -> Board {
        Board::new(9, &[], Vec::new(), CancelFlag::new())
    }

    #[test]
    fn naked_pair_excludes_its_digits() {
        let mut board = board();
        let lay = board.layout();
        let pair = DigitMask::from_digits(&[1, 2]);
        board.keep_mask(lay.cell(0, 0), pair);
        board.keep_mask(lay.cell(0, 1), pair);

        let mut trace = StepTrace::new();
        let result = NakedTuples::new(4).apply(&mut board, Some(&mut trace));
        assert!(result.is_changed());
        for col in 2..9 {
            let mask = board.candidates(lay.cell(0, col));
            assert!(!mask.has(1) && !mask.has(2));
        }
        assert!(trace
            .to_string()
            .starts_with("Naked Pair: 1,2 in r1c12 within Row 1"));
    }

    #[test]
    fn hidden_pair_strips_other_digits() {
        let mut board = board();
        let lay = board.layout();
        // 8 and 9 fit only in r1c1 and r1c2 within row 1.
        for col in 2..9 {
            board.clear_mask(lay.cell(0, col), DigitMask::from_digits(&[8, 9]));
        }

        let result = HiddenTuples::new(4).apply(&mut board, None);
        assert!(result.is_changed());
        assert_eq!(board.candidates(lay.cell(0, 0)), DigitMask::from_digits(&[8, 9]));
        assert_eq!(board.candidates(lay.cell(0, 1)), DigitMask::from_digits(&[8, 9]));
    }

    #[test]
    fn no_tuples_on_a_fresh_board() {
        let mut board = board();
        assert!(NakedTuples::new(4).apply(&mut board, None).is_none());
        assert!(HiddenTuples::new(4).apply(&mut board, None).is_none());
    }
}
