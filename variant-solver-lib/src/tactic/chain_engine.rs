//! Bounded alternating-inference chains over the link graph.

use crate::board::Board;
use crate::candidate_id::CandidateId;
use crate::deduction::{Deduction, StepTrace};
use crate::eliminations::Eliminations;
use crate::logic_result::LogicResult;
use crate::tactic::Tactic;
use std::collections::{HashSet, VecDeque};

/// Searches for chains that alternate strong and weak links, starting and
/// ending on a strong link. For such a chain at least one endpoint is true,
/// so every candidate weak-linked to both endpoints is false.
///
/// Strong links come from three sources: links constraints declared into
/// the graph, conjugate pairs (a digit down to two homes in a full group),
/// and bivalue cells. Weak links are read straight from the graph, which
/// already carries group peers, cell-internal pairs, and everything the
/// constraints added.
///
/// The breadth-first walk is bounded by `max_length` chain nodes; raising
/// the bound trades time for deductive power.
#[derive(Debug)]
pub struct ChainEngine {
    max_length: usize,
}

impl ChainEngine {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    fn strong_adjacency(&self, board: &Board) -> Vec<Vec<CandidateId>> {
        let core = board.core();
        let lay = board.layout();
        let size = board.size();
        let mut strong: Vec<Vec<CandidateId>> = vec![Vec::new(); board.candidate_count()];

        // Constraint-declared strong links, filtered to live candidates.
        for a in lay.all_candidates() {
            if !board.has_candidate(a) || board.mask(a.cell()).is_committed() {
                continue;
            }
            for b in core.links().strong_for(a).iter() {
                if board.has_candidate(b) && !board.mask(b.cell()).is_committed() {
                    strong[a.index()].push(b);
                }
            }
        }

        // Conjugate pairs: a digit with exactly two homes in a full group.
        for group in core.groups() {
            if group.len() != size {
                continue;
            }
            for digit in 1..=size {
                let homes: Vec<CandidateId> = group
                    .cells()
                    .iter()
                    .filter(|&&cell| {
                        !board.mask(cell).is_committed() && board.mask(cell).has(digit)
                    })
                    .map(|&cell| cell.candidate(digit))
                    .collect();
                if let [a, b] = homes[..] {
                    strong[a.index()].push(b);
                    strong[b.index()].push(a);
                }
            }
        }

        // Bivalue cells: one of the two candidates must be true.
        for cell in board.all_cells() {
            let mask = board.mask(cell);
            if !mask.is_committed() && mask.count() == 2 {
                let a = cell.candidate(mask.lowest());
                let b = cell.candidate(mask.highest());
                strong[a.index()].push(b);
                strong[b.index()].push(a);
            }
        }

        for list in strong.iter_mut() {
            list.sort();
            list.dedup();
        }
        strong
    }

    fn describe(chain: &[CandidateId]) -> String {
        let mut text = String::new();
        for (i, node) in chain.iter().enumerate() {
            if i > 0 {
                // Links alternate, strong first.
                text.push_str(if i % 2 == 1 { "=" } else { "-" });
            }
            text.push_str(&node.to_string());
        }
        text
    }
}

impl Tactic for ChainEngine {
    fn name(&self) -> &'static str {
        "Alternating Chains"
    }

    fn apply(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let core = board.core();
        let strong = self.strong_adjacency(board);
        let lay = board.layout();

        for start in lay.all_candidates() {
            if strong[start.index()].is_empty() {
                continue;
            }

            let mut queue: VecDeque<(CandidateId, bool, Vec<CandidateId>)> = VecDeque::new();
            let mut visited: HashSet<(usize, bool)> = HashSet::new();
            for &next in &strong[start.index()] {
                queue.push_back((next, true, vec![start, next]));
            }

            while let Some((node, arrived_strong, chain)) = queue.pop_front() {
                if chain.len() > self.max_length {
                    continue;
                }
                if !visited.insert((node.index(), arrived_strong)) {
                    continue;
                }

                // Both endpoints sit on strong links once the chain has at
                // least three links, so at least one endpoint is true.
                if arrived_strong && chain.len() >= 4 {
                    let mut common = core.links().weak_for(start).clone();
                    common.intersect_with(core.links().weak_for(node));

                    let elims: Eliminations = common
                        .iter()
                        .filter(|&candidate| {
                            board.has_candidate(candidate) && !chain.contains(&candidate)
                        })
                        .collect();
                    if !elims.is_empty() {
                        let desc = trace.map(|t| {
                            (t, format!("Alternating Chain: {}", Self::describe(&chain)))
                        });
                        let result = elims.apply(board);
                        if let Some((trace, desc)) = desc {
                            trace.push(
                                Deduction::from_elims(&desc, &elims).with_sources(chain.clone()),
                            );
                        }
                        return result;
                    }
                }

                if arrived_strong {
                    for target in core.links().weak_for(node).iter() {
                        if !board.has_candidate(target)
                            || board.mask(target.cell()).is_committed()
                            || chain.contains(&target)
                        {
                            continue;
                        }
                        let mut extended = chain.clone();
                        extended.push(target);
                        queue.push_back((target, false, extended));
                    }
                } else {
                    for &target in &strong[node.index()] {
                        if chain.contains(&target) {
                            continue;
                        }
                        let mut extended = chain.clone();
                        extended.push(target);
                        queue.push_back((target, true, extended));
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
    use crate::digit_mask::DigitMask;
    use crate::prelude::*;

    #[test]
    fn quiet_on_a_fresh_board() {
        let mut board = Board::new(9, &[], Vec::new(), CancelFlag::new());
        assert!(ChainEngine::new(12).apply(&mut board, None).is_none());
    }

    #[test]
    fn finds_a_remote_pair() {
        // Two {1,2} cells in row 1: the chain
        // 1r1c1 = 2r1c1 - 2r1c9 = 1r1c9 proves one endpoint holds a 1, so
        // every other 1 in the row goes.
        let mut board = Board::new(9, &[0; 81], Vec::new(), CancelFlag::new());
        let lay = board.layout();
        let pair = DigitMask::from_digits(&[1, 2]);
        board.keep_mask(lay.cell(0, 0), pair);
        board.keep_mask(lay.cell(0, 8), pair);

        let mut trace = StepTrace::new();
        let result = ChainEngine::new(12).apply(&mut board, Some(&mut trace));
        assert!(result.is_changed());
        for col in 1..8 {
            assert!(!board.candidates(lay.cell(0, col)).has(1));
        }
        assert!(trace.to_string().starts_with("Alternating Chain: "));
    }
}
