//! Naked and hidden singles, plus the batched sweep used by brute force.

use crate::board::Board;
use crate::deduction::{Deduction, StepTrace};
use crate::digit_mask::DigitMask;
use crate::logic_result::LogicResult;
use crate::tactic::Tactic;

/// Commits every naked single it can find, looping until quiescent.
///
/// This is the propagator's recursive-commit step in tactic form: after a
/// cascade leaves cells with a lone candidate, the sweep commits them all.
/// It runs only during brute force and never writes descriptions.
#[derive(Debug)]
pub struct SinglesSweep;

impl SinglesSweep {
    pub const NAME: &'static str = "Singles Sweep";
}

impl Tactic for SinglesSweep {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn in_logical_solves(&self) -> bool {
        false
    }

    fn in_brute_force(&self) -> bool {
        true
    }

    fn apply(&self, board: &mut Board, _trace: Option<&mut StepTrace>) -> LogicResult {
        let mut result = LogicResult::None;
        loop {
            if board.is_solved() {
                return result;
            }

            let mut changed = false;
            for cell in board.all_cells() {
                let mask = board.mask(cell);
                if mask.is_committed() {
                    continue;
                }
                if mask.is_empty() {
                    return LogicResult::Invalid;
                }
                if mask.is_single() {
                    match board.set_value(cell, mask.sole()) {
                        LogicResult::Changed => changed = true,
                        LogicResult::None => {}
                        other => return other,
                    }
                }
            }

            if !changed {
                return result;
            }
            result = LogicResult::Changed;
        }
    }
}

/// A cell whose candidates have been whittled down to one.
#[derive(Debug)]
pub struct NakedSingle;

impl Tactic for NakedSingle {
    fn name(&self) -> &'static str {
        "Naked Single"
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        for cell in board.all_cells() {
            let mask = board.mask(cell);
            if mask.is_committed() {
                continue;
            }

            if mask.is_empty() {
                if let Some(trace) = trace {
                    trace.push(Deduction::new(format!("{} has no candidates", cell)));
                }
                return LogicResult::Invalid;
            }

            if mask.is_single() {
                let digit = mask.sole();
                let result = board.set_value(cell, digit);
                match result {
                    LogicResult::Changed => {
                        if let Some(trace) = trace {
                            trace.push(
                                Deduction::new(format!("Naked Single: {}={}", cell, digit))
                                    .with_sources(vec![cell.candidate(digit)]),
                            );
                        }
                        return LogicResult::Changed;
                    }
                    LogicResult::Invalid => {
                        if let Some(trace) = trace {
                            trace.push(Deduction::new(format!(
                                "Naked Single: {} cannot be {}",
                                cell, digit
                            )));
                        }
                        return LogicResult::Invalid;
                    }
                    other => return other,
                }
            }
        }

        LogicResult::None
    }
}

/// A digit with exactly one home left in a group.
#[derive(Debug)]
pub struct HiddenSingle;

impl Tactic for HiddenSingle {
    fn name(&self) -> &'static str {
        "Hidden Single"
    }

    fn in_brute_force(&self) -> bool {
        true
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();
        let all_digits = board.all_digits();

        for group in core.groups() {
            // One pass over the group: digits seen once, seen twice, placed.
            let mut at_least_once = DigitMask::empty();
            let mut more_than_once = DigitMask::empty();
            let mut placed = DigitMask::empty();
            for &cell in group.cells() {
                let mask = board.mask(cell);
                if mask.is_committed() {
                    placed = placed | mask.uncommitted();
                } else {
                    more_than_once = more_than_once | (at_least_once & mask);
                    at_least_once = at_least_once | mask;
                }
            }

            if group.len() == board.size() {
                let homeless = all_digits & !(at_least_once | placed);
                if homeless.is_valid() {
                    if let Some(trace) = trace {
                        trace.push(Deduction::new(format!(
                            "{} has nowhere to place {}",
                            group, homeless
                        )));
                    }
                    return LogicResult::Invalid;
                }
            }

            let exactly_once = at_least_once & !more_than_once;
            if exactly_once.is_empty() || group.len() < board.size() {
                // A short group does not have to contain every digit.
                continue;
            }

            let digit = exactly_once.lowest();
            for &cell in group.cells() {
                if !board.mask(cell).is_committed() && board.mask(cell).has(digit) {
                    let result = board.set_value(cell, digit);
                    match result {
                        LogicResult::Changed => {
                            if let Some(trace) = trace {
                                trace.push(
                                    Deduction::new(format!(
                                        "Hidden Single: in {}, {}={}",
                                        group, cell, digit
                                    ))
                                    .with_sources(vec![cell.candidate(digit)]),
                                );
                            }
                            return LogicResult::Changed;
                        }
                        LogicResult::Invalid => {
                            if let Some(trace) = trace {
                                trace.push(Deduction::new(format!(
                                    "Hidden Single: in {}, {} cannot be {}",
                                    group, cell, digit
                                )));
                            }
                            return LogicResult::Invalid;
                        }
                        other => return other,
                    }
                }
            }
        }

        LogicResult::None
    }
}
