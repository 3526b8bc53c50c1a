//! The solver: tactic fixed points on top of backtracking search.

pub mod builder;
pub mod cancel;
pub mod outcomes;
pub mod sink;

use crate::board::Board;
use crate::cell_id::CellId;
use crate::deduction::{Deduction, StepTrace};
use crate::logic_result::LogicResult;
use crate::solver::cancel::CancelFlag;
use crate::solver::outcomes::{CountOutcome, LogicalOutcome, SolveOutcome, UniquenessOutcome};
use crate::solver::sink::{CollectSink, CountSink, FirstSink, SolutionSink};
use crate::tactic::cell_forcing::CellForcing;
use crate::tactic::chain_engine::ChainEngine;
use crate::tactic::constraint_logic::{ConstraintForcing, ConstraintLogic};
use crate::tactic::locked_candidates::LockedCandidates;
use crate::tactic::singles::{HiddenSingle, NakedSingle, SinglesSweep};
use crate::tactic::tuples::{HiddenTuples, NakedTuples};
use crate::tactic::Tactic;
use rand::RngCore;
use std::sync::Arc;

/// How a search subtree ended.
enum SearchFlow {
    /// No solution anywhere below; the tried candidate can be eliminated.
    Dead,
    /// At least one solution was reported and the sink wants more.
    Found,
    /// The sink asked to stop.
    Stop,
    /// The cancel flag fired.
    Cancelled,
}

/// A finalized puzzle, ready to answer solve queries.
///
/// Built by [`builder::SolverBuilder`]; once built, the board shape, groups,
/// constraints, and link graph are fixed. The solve methods taking `&self`
/// work on internal clones, so a solver can serve several queries in turn
/// (or, since clones are cheap, concurrently from independent clones).
#[derive(Clone)]
pub struct Solver {
    board: Board,
    logical_tactics: Vec<Arc<dyn Tactic>>,
    brute_tactics: Vec<Arc<dyn Tactic>>,
    cancel: CancelFlag,
}

impl Solver {
    pub(crate) fn assemble(
        board: Board,
        tactics: Vec<Arc<dyn Tactic>>,
        cancel: CancelFlag,
    ) -> Solver {
        let logical_tactics = tactics
            .iter()
            .filter(|t| t.in_logical_solves())
            .cloned()
            .collect();
        let brute_tactics = tactics
            .iter()
            .filter(|t| t.in_brute_force())
            .cloned()
            .collect();
        Solver {
            board,
            logical_tactics,
            brute_tactics,
            cancel,
        }
    }

    /// The default tactic ladder, cheapest first.
    pub fn standard_tactics(tuple_limit: usize, chain_limit: usize) -> Vec<Arc<dyn Tactic>> {
        vec![
            Arc::new(SinglesSweep),
            Arc::new(NakedSingle),
            Arc::new(HiddenSingle),
            Arc::new(ConstraintLogic),
            Arc::new(ConstraintForcing),
            Arc::new(CellForcing),
            Arc::new(LockedCandidates),
            Arc::new(NakedTuples::new(tuple_limit)),
            Arc::new(HiddenTuples::new(tuple_limit)),
            Arc::new(ChainEngine::new(chain_limit)),
        ]
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn logical_tactics(&self) -> &[Arc<dyn Tactic>] {
        &self.logical_tactics
    }

    pub fn brute_tactics(&self) -> &[Arc<dyn Tactic>] {
        &self.brute_tactics
    }

    /// Requests cancellation of any solve in flight on this solver or its
    /// clones. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Opportunistic link refresh: asks every constraint for links again
    /// (with `initializing` false) and appends anything new. Once search
    /// clones share the board core the graph is frozen and the refresh
    /// quietly stops, per the append-only sharing rule.
    pub fn refresh_links(&mut self) -> LogicResult {
        let mut result = LogicResult::None;
        for index in 0..self.board.registry().len() {
            let constraint = self.board.registry().get(index).clone();
            let links = constraint.init_links(&self.board, false);
            if links.is_empty() {
                continue;
            }
            match self.board.install_links(&links) {
                Ok(self_elims) => {
                    result = result.combine(self_elims.apply(&mut self.board));
                    if result.is_terminal() {
                        return result;
                    }
                }
                Err(_) => return result,
            }
        }
        result
    }

    fn run_one_logical_step(&mut self, trace: &mut StepTrace) -> LogicResult {
        if self.cancel.is_cancelled() {
            return LogicResult::Cancelled;
        }
        for tactic in self.logical_tactics.clone() {
            let result = tactic.apply(&mut self.board, Some(&mut *trace));
            if !result.is_none() {
                return result;
            }
        }
        LogicResult::None
    }

    /// Solves by deductions alone, mutating this solver's board and
    /// appending every step to `trace`.
    pub fn logical_solve(&mut self, trace: &mut StepTrace) -> LogicalOutcome {
        loop {
            if self.board.is_solved() {
                trace.push(Deduction::new("Solved"));
                return LogicalOutcome::Solved;
            }

            match self.run_one_logical_step(trace) {
                LogicResult::None => return LogicalOutcome::Unsolved,
                LogicResult::Changed => continue,
                LogicResult::Invalid => return LogicalOutcome::Invalid,
                LogicResult::Cancelled => return LogicalOutcome::Cancelled,
                LogicResult::PuzzleComplete => {
                    trace.push(Deduction::new("Solved"));
                    return LogicalOutcome::Solved;
                }
            }
        }
    }

    /// Runs the brute-force tactics to a fixed point.
    fn propagate(&self, board: &mut Board) -> LogicResult {
        let mut overall = LogicResult::None;
        loop {
            let mut round = LogicResult::None;
            for tactic in &self.brute_tactics {
                round = tactic.apply(board, None);
                if !round.is_none() {
                    break;
                }
            }
            match round {
                LogicResult::None => return overall,
                LogicResult::Changed => overall = LogicResult::Changed,
                other => return other,
            }
        }
    }

    /// The cell to branch on: fewest candidates, ties to the earliest cell
    /// in row-major order.
    fn pick_branch_cell(&self, board: &Board) -> Option<CellId> {
        let mut best: Option<(usize, CellId)> = None;
        for cell in board.all_cells() {
            let mask = board.mask(cell);
            if mask.is_committed() {
                continue;
            }
            let count = mask.count();
            if best.map_or(true, |(best_count, _)| count < best_count) {
                if count == 2 {
                    return Some(cell);
                }
                best = Some((count, cell));
            }
        }
        best.map(|(_, cell)| cell)
    }

    /// Depth-first search. Candidates are tried in ascending digit order
    /// (shuffled when `rng` is supplied); a branch that dies proves its
    /// candidate wrong, which is recorded on this frame's board before the
    /// next candidate runs.
    fn search<'a>(
        &self,
        board: &mut Board,
        sink: &mut dyn SolutionSink,
        mut rng: Option<&'a mut dyn RngCore>,
    ) -> (SearchFlow, Option<&'a mut dyn RngCore>) {
        if self.cancel.is_cancelled() {
            return (SearchFlow::Cancelled, rng);
        }

        match self.propagate(board) {
            LogicResult::Invalid => return (SearchFlow::Dead, rng),
            LogicResult::Cancelled => return (SearchFlow::Cancelled, rng),
            _ => {}
        }

        if board.is_solved() {
            let flow = if sink.receive(board) {
                SearchFlow::Found
            } else {
                SearchFlow::Stop
            };
            return (flow, rng);
        }

        let cell = match self.pick_branch_cell(board) {
            Some(cell) => cell,
            None => return (SearchFlow::Dead, rng),
        };

        let mut digits: Vec<usize> = board.candidates(cell).to_vec();
        if let Some(rng) = rng.as_deref_mut() {
            use rand::seq::SliceRandom;
            digits.shuffle(rng);
        }

        let mut found = false;
        for digit in digits {
            let mut child = board.clone();
            let flow = match child.set_value(cell, digit) {
                LogicResult::Invalid => SearchFlow::Dead,
                LogicResult::Cancelled => return (SearchFlow::Cancelled, rng),
                _ => {
                    let (flow, returned_rng) = self.search(&mut child, sink, rng);
                    rng = returned_rng;
                    flow
                }
            };

            match flow {
                SearchFlow::Dead => {
                    // Learned elimination: nothing below wanted this digit.
                    board.clear_candidate(cell.candidate(digit));
                }
                SearchFlow::Found => found = true,
                SearchFlow::Stop => return (SearchFlow::Stop, rng),
                SearchFlow::Cancelled => return (SearchFlow::Cancelled, rng),
            }
        }

        let flow = if found {
            SearchFlow::Found
        } else {
            SearchFlow::Dead
        };
        (flow, rng)
    }

    /// Finds some solution. Deterministic: candidates ascending, cells in
    /// the most-constrained-first order with row-major ties.
    pub fn solve_any(&self) -> SolveOutcome {
        let mut board = self.board.clone();
        let mut sink = FirstSink::new();
        match self.search(&mut board, &mut sink, None).0 {
            SearchFlow::Cancelled => SolveOutcome::Cancelled,
            _ => match sink.into_solution() {
                Some(solution) => SolveOutcome::Solved(solution),
                None => SolveOutcome::None,
            },
        }
    }

    /// Finds a solution with the candidate order shuffled at every branch.
    /// Useful for generation; exempt from the determinism guarantee.
    pub fn find_random_solution(&self) -> SolveOutcome {
        let mut board = self.board.clone();
        let mut sink = FirstSink::new();
        let mut rng = rand::thread_rng();
        let rng: &mut dyn RngCore = &mut rng;
        match self.search(&mut board, &mut sink, Some(rng)).0 {
            SearchFlow::Cancelled => SolveOutcome::Cancelled,
            _ => match sink.into_solution() {
                Some(solution) => SolveOutcome::Solved(solution),
                None => SolveOutcome::None,
            },
        }
    }

    /// Decides whether the puzzle has zero, one, or several solutions,
    /// stopping as soon as a second one is seen.
    pub fn solve_unique(&self) -> UniquenessOutcome {
        let mut board = self.board.clone();
        let mut sink = CollectSink::new(2);
        match self.search(&mut board, &mut sink, None).0 {
            SearchFlow::Cancelled => UniquenessOutcome::Cancelled,
            _ => {
                let mut solutions = sink.into_solutions();
                match solutions.len() {
                    0 => UniquenessOutcome::None,
                    1 => UniquenessOutcome::Unique(Box::new(solutions.remove(0))),
                    _ => UniquenessOutcome::Multiple,
                }
            }
        }
    }

    /// Counts solutions, stopping at `limit` (zero for unbounded).
    pub fn count_solutions(&self, limit: usize) -> CountOutcome {
        let mut board = self.board.clone();
        let mut sink = CountSink::new(limit);
        match self.search(&mut board, &mut sink, None).0 {
            SearchFlow::Cancelled => CountOutcome::Cancelled(sink.count()),
            SearchFlow::Stop => CountOutcome::AtLeast(sink.count()),
            _ => CountOutcome::Exact(sink.count()),
        }
    }
}
