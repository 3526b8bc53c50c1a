//! Driving the constraints' own step logic from the tactic loop.

use crate::board::Board;
use crate::deduction::StepTrace;
use crate::logic_result::LogicResult;
use crate::tactic::Tactic;

/// Gives each live constraint one shot at a deduction, in registration
/// order, stopping at the first that reports anything. Subsumed constraints
/// are skipped. The absence of a trace doubles as the brute-force signal,
/// so constraints can skip work that only pays off for human output.
#[derive(Debug)]
pub struct ConstraintLogic;

impl ConstraintLogic {
    pub const NAME: &'static str = "Constraint Logic";
}

impl Tactic for ConstraintLogic {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn in_brute_force(&self) -> bool {
        true
    }

    fn apply(&self, board: &mut Board, mut trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();
        let brute_forcing = trace.is_none();

        for (_, constraint) in core.registry().active() {
            let result = constraint.step_logic(board, trace.as_deref_mut(), brute_forcing);
            if !result.is_none() {
                return result;
            }
        }

        LogicResult::None
    }
}

/// Walks the constraints' `cells_must_contain` reports: when a digit has a
/// single remaining home inside a constraint, that home is committed. The
/// constraint-scoped analogue of a hidden single.
#[derive(Debug)]
pub struct ConstraintForcing;

impl Tactic for ConstraintForcing {
    fn name(&self) -> &'static str {
        "Constraint Forcing"
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();

        for (_, constraint) in core.registry().active() {
            for digit in 1..=board.size() {
                let homes = constraint.cells_must_contain(board, digit);
                if let [cell] = homes[..] {
                    if board.mask(cell).is_committed() {
                        continue;
                    }
                    let result = board.set_value(cell, digit);
                    match result {
                        LogicResult::Changed => {
                            if let Some(trace) = trace {
                                trace.push(
                                    crate::deduction::Deduction::new(format!(
                                        "{}: {} must hold {}",
                                        constraint.specific_name(),
                                        cell,
                                        digit
                                    ))
                                    .with_sources(vec![cell.candidate(digit)]),
                                );
                            }
                            return LogicResult::Changed;
                        }
                        LogicResult::Invalid => {
                            if let Some(trace) = trace {
                                trace.push(crate::deduction::Deduction::new(format!(
                                    "{}: {} cannot hold its forced {}",
                                    constraint.specific_name(),
                                    cell,
                                    digit
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::constraint::Constraint;
    use crate::deduction::Deduction;
    use crate::prelude::*;
    use std::sync::Arc;

    // Removes one fixed candidate the first time it steps.
    struct OneShot {
        candidate: CandidateId,
    }

    impl Constraint for OneShot {
        fn name(&self) -> &str {
            "One Shot"
        }

        fn step_logic(
            &self,
            board: &mut Board,
            trace: Option<&mut StepTrace>,
            _brute_forcing: bool,
        ) -> LogicResult {
            if !board.has_candidate(self.candidate) {
                return LogicResult::None;
            }
            let result = board.clear_candidate(self.candidate);
            if let Some(trace) = trace {
                trace.push(Deduction::new(format!("One Shot: removed {}", self.candidate)));
            }
            result
        }

        fn signature(&self) -> String {
            format!("OneShot:{}", self.candidate.index())
        }
    }

    #[test]
    fn constraints_step_in_registration_order() {
        let lay = Layout::new(9);
        let first = lay.cell(0, 0).candidate(1);
        let second = lay.cell(0, 1).candidate(1);
        let mut board = Board::new(
            9,
            &[],
            vec![
                Arc::new(OneShot { candidate: first }),
                Arc::new(OneShot { candidate: second }),
            ],
            CancelFlag::new(),
        );

        let mut trace = StepTrace::new();
        assert!(ConstraintLogic
            .apply(&mut board, Some(&mut trace))
            .is_changed());
        assert!(!board.has_candidate(first));
        assert!(board.has_candidate(second));
        assert_eq!(trace.to_string(), "One Shot: removed 1r1c1");

        assert!(ConstraintLogic.apply(&mut board, None).is_changed());
        assert!(!board.has_candidate(second));

        assert!(ConstraintLogic.apply(&mut board, None).is_none());
    }

    // Requires 5 somewhere within its two cells.
    struct FiveSomewhere {
        cells: Vec<CellId>,
    }

    impl Constraint for FiveSomewhere {
        fn name(&self) -> &str {
            "Five Somewhere"
        }

        fn cells(&self) -> &[CellId] {
            &self.cells
        }

        fn cells_must_contain(&self, board: &Board, digit: usize) -> Vec<CellId> {
            if digit != 5 {
                return Vec::new();
            }
            self.cells
                .iter()
                .copied()
                .filter(|&cell| board.candidates(cell).has(5))
                .collect()
        }

        fn signature(&self) -> String {
            "FiveSomewhere".to_owned()
        }
    }

    #[test]
    fn forcing_commits_the_last_home() {
        let lay = Layout::new(9);
        let cells = vec![lay.cell(0, 0), lay.cell(0, 1)];
        let mut board = Board::new(
            9,
            &[],
            vec![Arc::new(FiveSomewhere { cells })],
            CancelFlag::new(),
        );

        assert!(ConstraintForcing.apply(&mut board, None).is_none());

        board.clear_mask(lay.cell(0, 0), DigitMask::single(5));
        let mut trace = StepTrace::new();
        assert!(ConstraintForcing
            .apply(&mut board, Some(&mut trace))
            .is_changed());
        assert!(board.is_committed(lay.cell(0, 1)));
        assert_eq!(board.value(lay.cell(0, 1)), 5);
        assert_eq!(trace.to_string(), "Five Somewhere: r1c2 must hold 5");
    }
}
