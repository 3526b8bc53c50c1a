//! Cell forcing: eliminations every candidate of a cell agrees on.

use crate::board::Board;
use crate::deduction::{Deduction, StepTrace};
use crate::eliminations::Eliminations;
use crate::logic_result::LogicResult;
use crate::tactic::Tactic;

/// If every remaining candidate of a cell carries a weak link to the same
/// target candidate, the target is false no matter which digit the cell
/// takes.
///
/// With row/column/region links alone this never fires beyond what singles
/// already cover; it earns its keep once constraints contribute links
/// (nonconsecutive markers, clones, chess moves and the like).
#[derive(Debug)]
pub struct CellForcing;

impl Tactic for CellForcing {
    fn name(&self) -> &'static str {
        "Cell Forcing"
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();

        for cell in board.all_cells() {
            let mask = board.mask(cell);
            if mask.is_committed() {
                continue;
            }

            let mut shared = None;
            for digit in mask {
                let links = core.links().weak_for(cell.candidate(digit));
                match shared.as_mut() {
                    None => shared = Some(links.clone()),
                    Some(set) => set.intersect_with(links),
                }
            }
            let shared = match shared {
                Some(set) if !set.is_empty() => set,
                _ => continue,
            };

            let elims: Eliminations = shared
                .iter()
                .filter(|&candidate| board.has_candidate(candidate))
                .collect();
            if elims.is_empty() {
                continue;
            }

            let desc = trace.map(|t| (t, format!("Cell Forcing: {}", cell)));
            let sources: Vec<_> = mask.into_iter().map(|d| cell.candidate(d)).collect();
            let result = elims.apply(board);
            if let Some((trace, desc)) = desc {
                trace.push(Deduction::from_elims(&desc, &elims).with_sources(sources));
            }
            return match result {
                LogicResult::None => LogicResult::None,
                other => other,
            };
        }

        LogicResult::None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constraint::{Constraint, ConstraintLinks};
    use crate::prelude::*;
    use std::sync::Arc;

    // Links digits 2..=8 of r1c1 against 1r1c2, so dropping 9 from r1c1
    // forces 1 out of r1c2.
    struct FannedLinks;

    impl Constraint for FannedLinks {
        fn name(&self) -> &str {
            "Fanned Links"
        }

        fn init_links(&self, board: &Board, _initializing: bool) -> ConstraintLinks {
            let lay = board.layout();
            let target = lay.cell(0, 1).candidate(1);
            ConstraintLinks {
                weak: (2..=8)
                    .map(|digit| (lay.cell(0, 0).candidate(digit), target))
                    .collect(),
                ..ConstraintLinks::default()
            }
        }

        fn signature(&self) -> String {
            "FannedLinks".to_owned()
        }
    }

    #[test]
    fn shared_weak_target_is_eliminated() {
        let mut board = Board::new(9, &[], vec![Arc::new(FannedLinks)], CancelFlag::new());
        let links = FannedLinks.init_links(&board, true);
        board.install_links(&links).unwrap();
        let lay = board.layout();

        assert!(CellForcing.apply(&mut board, None).is_none());

        board.clear_mask(lay.cell(0, 0), DigitMask::single(9));
        let mut trace = StepTrace::new();
        let result = CellForcing.apply(&mut board, Some(&mut trace));
        assert!(result.is_changed());
        assert!(!board.candidates(lay.cell(0, 1)).has(1));
        assert_eq!(trace.to_string(), "Cell Forcing: r1c1 => -1r1c2");
    }
}
