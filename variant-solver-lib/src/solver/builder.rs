//! Assembling and finalizing a [`Solver`].

use crate::board::Board;
use crate::cell_id::CellId;
use crate::constraint::Constraint;
use crate::eliminations::Eliminations;
use crate::layout::Layout;
use crate::logic_result::LogicResult;
use crate::registry::FactoryRegistry;
use crate::solver::cancel::CancelFlag;
use crate::solver::Solver;
use crate::tactic::constraint_logic::ConstraintLogic;
use crate::tactic::singles::SinglesSweep;
use crate::tactic::Tactic;
use itertools::Itertools;
use std::sync::Arc;

/// Collects board shape, givens, constraints, and tactics, then runs the
/// initialization pipeline in [`SolverBuilder::build`].
///
/// Configuration problems (bad regions, malformed givens, failed constraint
/// factories) accumulate and surface together from `build`, which is also
/// the only place an unsatisfiable starting position is reported.
///
/// `build` consumes the builder, so finalization cannot run twice.
#[derive(Clone)]
pub struct SolverBuilder {
    size: usize,
    regions: Vec<usize>,
    givens: Vec<(CellId, usize)>,
    constraints: Vec<Arc<dyn Constraint>>,
    tactics: Vec<Arc<dyn Tactic>>,
    tuple_limit: usize,
    chain_limit: usize,
    errors: Vec<String>,
}

impl SolverBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            regions: Vec::new(),
            givens: Vec::new(),
            constraints: Vec::new(),
            tactics: Vec::new(),
            tuple_limit: 4,
            chain_limit: 12,
            errors: Vec::new(),
        }
    }

    /// Region index per cell, row-major. An empty vector selects the
    /// standard boxes; a vector of one repeated index selects no regions.
    #[must_use]
    pub fn with_regions(mut self, regions: Vec<usize>) -> Self {
        let cell_count = self.size * self.size;
        if regions.is_empty() || regions.len() == cell_count && regions.iter().all_equal() {
            return self.with_no_regions();
        }

        if regions.len() != cell_count {
            self.errors.push(format!(
                "region vector has {} entries, expected {}",
                regions.len(),
                cell_count
            ));
            return self;
        }
        for region in 0..self.size {
            let count = regions.iter().filter(|&&r| r == region).count();
            if count != self.size {
                self.errors.push(format!(
                    "region {} covers {} cells, expected {}",
                    region, count, self.size
                ));
                return self;
            }
        }
        self.regions = regions;
        self
    }

    /// Region membership as explicit cell lists, each of exactly N cells.
    #[must_use]
    pub fn with_region_cells(mut self, regions: Vec<Vec<CellId>>) -> Self {
        let cell_count = self.size * self.size;
        let mut assignment = vec![usize::MAX; cell_count];
        for (index, cells) in regions.iter().enumerate() {
            if cells.len() != self.size {
                self.errors.push(format!(
                    "region {} has {} cells, expected {}",
                    index,
                    cells.len(),
                    self.size
                ));
                return self;
            }
            for cell in cells {
                if assignment[cell.index()] != usize::MAX {
                    self.errors
                        .push(format!("cell {} appears in two regions", cell));
                    return self;
                }
                assignment[cell.index()] = index;
            }
        }
        if assignment.iter().any(|&r| r == usize::MAX) {
            self.errors
                .push("region lists do not cover the whole grid".to_owned());
            return self;
        }
        self.regions = assignment;
        self
    }

    /// Rows and columns only, no region groups.
    #[must_use]
    pub fn with_no_regions(mut self) -> Self {
        self.regions = vec![0; self.size * self.size];
        self
    }

    #[must_use]
    pub fn with_given(mut self, cell: CellId, digit: usize) -> Self {
        self.givens.push((cell, digit));
        self
    }

    #[must_use]
    pub fn with_givens(mut self, givens: &[(CellId, usize)]) -> Self {
        self.givens.extend_from_slice(givens);
        self
    }

    /// Givens as a row-major digit string; `0` or any non-digit is an empty
    /// cell. Grids larger than 9 use fixed-width chunks (`01` for 1).
    #[must_use]
    pub fn with_givens_string(mut self, givens: &str) -> Self {
        let lay = Layout::new(self.size);
        if self.size <= 9 {
            if givens.len() != lay.cell_count() {
                self.errors.push(format!(
                    "givens string has {} characters, expected {}",
                    givens.len(),
                    lay.cell_count()
                ));
                return self;
            }
            self.givens
                .extend(givens.chars().enumerate().filter_map(|(i, c)| {
                    let digit = c.to_digit(10)? as usize;
                    (digit != 0).then(|| (lay.at(i), digit))
                }));
        } else {
            let width = self.size.to_string().len();
            if givens.len() != lay.cell_count() * width {
                self.errors.push(format!(
                    "givens string has {} characters, expected {}",
                    givens.len(),
                    lay.cell_count() * width
                ));
                return self;
            }
            let chars: Vec<char> = givens.chars().collect();
            self.givens.extend(
                chars
                    .chunks(width)
                    .enumerate()
                    .filter_map(|(i, chunk)| {
                        let digit: usize = chunk.iter().collect::<String>().parse().ok()?;
                        (digit != 0).then(|| (lay.at(i), digit))
                    }),
            );
        }
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Arc<dyn Constraint>) -> Self {
        self.constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: Vec<Arc<dyn Constraint>>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Adds a constraint through a factory registry. Factory errors are
    /// deferred to `build`.
    #[must_use]
    pub fn with_named_constraint(
        mut self,
        factories: &FactoryRegistry,
        name: &str,
        options: &str,
    ) -> Self {
        match factories.create(name, self.size, options) {
            Ok(constraint) => self.constraints.push(constraint),
            Err(error) => self.errors.push(error),
        }
        self
    }

    /// Replaces the tactic list. The required tactics (the singles sweep
    /// that drives brute force, and the constraint stepper) are re-inserted
    /// if missing.
    #[must_use]
    pub fn with_tactics(mut self, tactics: Vec<Arc<dyn Tactic>>) -> Self {
        self.tactics = tactics;
        self
    }

    #[must_use]
    pub fn with_tactic(mut self, tactic: Arc<dyn Tactic>) -> Self {
        self.tactics.push(tactic);
        self
    }

    /// Caps the degree of naked/hidden tuple search (default 4).
    #[must_use]
    pub fn with_tuple_limit(mut self, limit: usize) -> Self {
        self.tuple_limit = limit;
        self
    }

    /// Caps alternating-chain length in nodes (default 12).
    #[must_use]
    pub fn with_chain_limit(mut self, limit: usize) -> Self {
        self.chain_limit = limit;
        self
    }

    /// Runs the initialization pipeline: board and group construction, base
    /// and constraint links, givens, the `init_candidates` fixed point, and
    /// subsumption detection.
    pub fn build(mut self) -> Result<Solver, String> {
        if !self.errors.is_empty() {
            return Err(self.errors.join(", "));
        }

        let cancel = CancelFlag::new();
        let mut board = Board::new(
            self.size,
            &self.regions,
            self.constraints.clone(),
            cancel.clone(),
        );

        // Constraint links, declared once with initializing = true. Weak
        // self-pairs become immediate eliminations.
        let mut startup_elims = Eliminations::new();
        for index in 0..board.registry().len() {
            let constraint = board.registry().get(index).clone();
            let links = constraint.init_links(&board, true);
            let self_elims = board.install_links(&links)?;
            startup_elims.extend(self_elims.iter());
        }
        if startup_elims.apply(&mut board).is_invalid() {
            return Err("constraint links leave a cell without candidates".to_owned());
        }

        // Givens commit through the full propagator.
        for (cell, digit) in std::mem::take(&mut self.givens) {
            if board.is_committed(cell) {
                if board.value(cell) != digit {
                    return Err(format!("conflicting given {}{}", digit, cell));
                }
                continue;
            }
            if board.set_value(cell, digit).is_invalid() {
                return Err(format!("failed to set given {}{}", digit, cell));
            }
        }

        // Constraint initialization to quiescence, so constraints can react
        // to each other's trims.
        loop {
            let mut changed = false;
            for index in 0..board.registry().len() {
                let constraint = board.registry().get(index).clone();
                match constraint.init_candidates(&mut board) {
                    LogicResult::Changed => changed = true,
                    LogicResult::Invalid => {
                        return Err(format!(
                            "{} finds the board unsolvable",
                            constraint.specific_name()
                        ));
                    }
                    _ => {}
                }
            }
            if !changed {
                break;
            }
        }

        board.detect_subsumption()?;

        let mut tactics = if self.tactics.is_empty() {
            Solver::standard_tactics(self.tuple_limit, self.chain_limit)
        } else {
            self.tactics
        };
        if !tactics.iter().any(|t| t.name() == SinglesSweep::NAME) {
            tactics.insert(0, Arc::new(SinglesSweep));
        }
        if !tactics.iter().any(|t| t.name() == ConstraintLogic::NAME) {
            tactics.push(Arc::new(ConstraintLogic));
        }

        Ok(Solver::assemble(board, tactics, cancel))
    }
}

impl Default for SolverBuilder {
    fn default() -> Self {
        Self::new(9)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tactic::singles::{HiddenSingle, NakedSingle};

    #[test]
    fn default_shape() {
        let solver = SolverBuilder::default().build().unwrap();
        let board = solver.board();
        assert_eq!(board.size(), 9);
        assert_eq!(board.groups().len(), 27);
        assert_eq!(board.committed_count(), 0);
    }

    #[test]
    fn no_regions_drops_the_box_groups() {
        let solver = SolverBuilder::default().with_no_regions().build().unwrap();
        assert_eq!(solver.board().groups().len(), 18);
    }

    #[test]
    fn bad_region_vectors_are_rejected() {
        assert!(SolverBuilder::new(9)
            .with_regions(vec![0; 80])
            .build()
            .is_err());

        let mut skewed = vec![0; 81];
        skewed[80] = 1;
        assert!(SolverBuilder::new(9).with_regions(skewed).build().is_err());
    }

    #[test]
    fn region_cells_round_trip() {
        let lay = Layout::new(4);
        let regions: Vec<Vec<CellId>> = (0..4)
            .map(|r| (0..4).map(|c| lay.cell(r, c)).collect())
            .collect();
        // Regions equal to the rows: groups collapse to rows + columns.
        let solver = SolverBuilder::new(4)
            .with_region_cells(regions)
            .build()
            .unwrap();
        assert_eq!(solver.board().groups().len(), 8);
    }

    #[test]
    fn givens_string_bad_length() {
        assert!(SolverBuilder::new(9)
            .with_givens_string("123")
            .build()
            .is_err());
    }

    #[test]
    fn required_tactics_are_inserted() {
        let solver = SolverBuilder::new(9)
            .with_tactics(vec![
                Arc::new(NakedSingle) as Arc<dyn Tactic>,
                Arc::new(HiddenSingle),
            ])
            .build()
            .unwrap();
        let brute: Vec<&str> = solver.brute_tactics().iter().map(|t| t.name()).collect();
        assert!(brute.contains(&"Singles Sweep"));
        assert!(brute.contains(&"Constraint Logic"));
        let logical: Vec<&str> = solver.logical_tactics().iter().map(|t| t.name()).collect();
        assert!(!logical.contains(&"Singles Sweep"));
    }
}
