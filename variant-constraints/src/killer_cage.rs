//! Killer cage: distinct digits in a region summing to a target.

use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// A cage of pairwise distinct cells whose digits sum to `sum`.
pub struct KillerCage {
    specific_name: String,
    cells: Vec<CellId>,
    sum: usize,
    size: usize,
}

/// Factory for option strings of the form `<sum>;<cells>`.
pub fn factory(size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    let (sum_text, cell_text) = options
        .split_once(';')
        .ok_or_else(|| format!("killer cage options need '<sum>;<cells>': {}", options))?;
    let sum: usize = sum_text
        .trim()
        .parse()
        .map_err(|_| format!("bad cage sum: {}", sum_text))?;
    let cells = Layout::new(size).parse_cells(cell_text)?;
    Ok(Arc::new(KillerCage::new(cells, sum, size)?))
}

impl KillerCage {
    pub fn new(cells: Vec<CellId>, sum: usize, size: usize) -> Result<Self, String> {
        if cells.is_empty() {
            return Err("a killer cage needs at least one cell".to_owned());
        }
        if cells.len() > size {
            return Err(format!(
                "a killer cage of {} cells cannot hold distinct digits on a {}x{} grid",
                cells.len(),
                size,
                size
            ));
        }
        let max_possible: usize = (size + 1 - cells.len()..=size).sum();
        let min_possible: usize = (1..=cells.len()).sum();
        if sum < min_possible || sum > max_possible {
            return Err(format!("cage sum {} is impossible for {} cells", sum, cells.len()));
        }

        let specific_name = format!("Killer Cage at {}", cells[0]);
        Ok(Self {
            specific_name,
            cells,
            sum,
            size,
        })
    }

    // Splits the cage into placed digits, open cells, and what is left of
    // the sum. `None` when the placed digits already overshoot.
    fn split(&self, board: &Board) -> Option<(Vec<CellId>, usize)> {
        let mut placed = 0;
        let mut open = Vec::new();
        for &cell in &self.cells {
            if board.is_committed(cell) {
                placed += board.value(cell);
            } else {
                open.push(cell);
            }
        }
        if placed > self.sum || (placed == self.sum && !open.is_empty()) {
            return None;
        }
        Some((open, self.sum - placed))
    }

    // Enumerates distinct-digit assignments of `remaining` over the open
    // cells, returning the per-cell union of workable digits and the set of
    // digits common to every assignment.
    fn feasible(
        &self,
        board: &Board,
        open: &[CellId],
        remaining: usize,
    ) -> (Vec<DigitMask>, DigitMask) {
        let masks: Vec<DigitMask> = open.iter().map(|&c| board.candidates(c)).collect();
        let mut usable = vec![DigitMask::empty(); open.len()];
        let mut in_every = DigitMask::all(self.size);
        let mut any = false;

        // Digits already used by committed cage cells stay off limits.
        let mut used = DigitMask::empty();
        for &cell in &self.cells {
            if board.is_committed(cell) {
                used = used.with(board.value(cell));
            }
        }

        let mut chosen = vec![0usize; open.len()];
        self.descend(
            &masks,
            used,
            remaining,
            0,
            &mut chosen,
            &mut usable,
            &mut in_every,
            &mut any,
        );

        if !any {
            in_every = DigitMask::empty();
        }
        (usable, in_every)
    }

    #[allow(clippy::too_many_arguments)]
    fn descend(
        &self,
        masks: &[DigitMask],
        used: DigitMask,
        remaining: usize,
        depth: usize,
        chosen: &mut Vec<usize>,
        usable: &mut [DigitMask],
        in_every: &mut DigitMask,
        any: &mut bool,
    ) {
        if depth == masks.len() {
            if remaining == 0 {
                *any = true;
                let assignment: DigitMask = chosen.iter().copied().collect();
                for (i, &digit) in chosen.iter().enumerate() {
                    usable[i] = usable[i].with(digit);
                }
                *in_every = *in_every & assignment;
            }
            return;
        }

        let cells_left = masks.len() - depth - 1;
        for digit in masks[depth] & !used {
            if digit > remaining {
                break;
            }
            // The other open cells must still be able to reach the rest.
            let rest = remaining - digit;
            let rest_min: usize = (1..=cells_left).sum();
            let rest_max: usize = (self.size + 1 - cells_left..=self.size).sum();
            if rest < rest_min || rest > rest_max {
                continue;
            }
            chosen[depth] = digit;
            self.descend(
                masks,
                used.with(digit),
                rest,
                depth + 1,
                chosen,
                usable,
                in_every,
                any,
            );
        }
    }

    // Shared by init_candidates and step_logic: keep each open cell to the
    // digits some valid assignment uses.
    fn narrow(&self, board: &mut Board, mut trace: Option<&mut StepTrace>) -> LogicResult {
        let (open, remaining) = match self.split(board) {
            Some(split) => split,
            None => {
                if let Some(trace) = trace.as_deref_mut() {
                    trace.push(Deduction::new(format!(
                        "{}: placed digits break the sum",
                        self.specific_name
                    )));
                }
                return LogicResult::Invalid;
            }
        };
        if open.is_empty() {
            return LogicResult::None;
        }

        let (usable, _) = self.feasible(board, &open, remaining);

        let mut elims = Eliminations::new();
        for (&cell, &mask) in open.iter().zip(usable.iter()) {
            for digit in board.candidates(cell) & !mask {
                elims.add_cell_digit(cell, digit);
            }
        }
        if elims.is_empty() {
            return LogicResult::None;
        }

        let result = elims.apply(board);
        if let Some(trace) = trace {
            trace.push(Deduction::from_elims(
                &format!("{}: sum {} leaves", self.specific_name, self.sum),
                &elims,
            ));
        }
        result
    }
}

impl Constraint for KillerCage {
    fn name(&self) -> &str {
        "Killer Cage"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellId] {
        &self.cells
    }

    fn init_candidates(&self, board: &mut Board) -> LogicResult {
        self.narrow(board, None)
    }

    fn enforce(&self, board: &mut Board, _cell: CellId, _digit: usize) -> LogicResult {
        let (open, remaining) = match self.split(board) {
            Some(split) => split,
            None => return LogicResult::Invalid,
        };

        match open.len() {
            0 => {
                if remaining == 0 {
                    LogicResult::None
                } else {
                    LogicResult::Invalid
                }
            }
            1 => {
                if remaining == 0 || remaining > self.size {
                    return LogicResult::Invalid;
                }
                board.keep_mask(open[0], DigitMask::single(remaining))
            }
            _ => {
                let low: usize = open
                    .iter()
                    .map(|&c| board.candidates(c).lowest())
                    .sum();
                let high: usize = open
                    .iter()
                    .map(|&c| board.candidates(c).highest())
                    .sum();
                if remaining < low || remaining > high {
                    LogicResult::Invalid
                } else {
                    LogicResult::None
                }
            }
        }
    }

    fn step_logic(
        &self,
        board: &mut Board,
        trace: Option<&mut StepTrace>,
        _brute_forcing: bool,
    ) -> LogicResult {
        self.narrow(board, trace)
    }

    fn init_links(&self, board: &Board, _initializing: bool) -> ConstraintLinks {
        ConstraintLinks {
            weak: nonrepeat_weak_links(&self.cells, board.size()),
            ..ConstraintLinks::default()
        }
    }

    fn seen_cells(&self, cell: CellId) -> Vec<CellId> {
        if self.cells.contains(&cell) {
            self.cells.iter().copied().filter(|&c| c != cell).collect()
        } else {
            Vec::new()
        }
    }

    fn groups(&self, size: usize) -> Vec<Group> {
        if self.cells.len() == size {
            vec![Group::new(GroupKind::Other, &self.specific_name, &self.cells)]
        } else {
            Vec::new()
        }
    }

    fn cells_must_contain(&self, board: &Board, digit: usize) -> Vec<CellId> {
        let (open, remaining) = match self.split(board) {
            Some(split) => split,
            None => return Vec::new(),
        };
        if open.is_empty() {
            return Vec::new();
        }
        let (_, in_every) = self.feasible(board, &open, remaining);
        if in_every.has(digit) {
            open.into_iter()
                .filter(|&cell| board.candidates(cell).has(digit))
                .collect()
        } else {
            Vec::new()
        }
    }

    fn signature(&self) -> String {
        format!(
            "KillerCage:{}:{}",
            self.sum,
            Layout::new(self.size).compact_name(&self.cells)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn two_cell_cage_narrows_on_commit() {
        // Cage r1c1+r1c2 = 10; committing 3 narrows the partner to 7 during
        // propagation, before any search.
        let lay = Layout::new(9);
        let cage = factory(9, "10;r1c1r1c2").unwrap();
        let solver = SolverBuilder::new(9)
            .with_constraint(cage)
            .with_given(lay.cell(0, 0), 3)
            .build()
            .unwrap();

        let partner = solver.board().candidates(lay.cell(0, 1));
        assert_eq!(partner.to_vec(), vec![7]);
    }

    #[test]
    fn cage_trims_impossible_digits_up_front() {
        // Two cells summing to 4 can only be {1,3}.
        let lay = Layout::new(9);
        let cage = factory(9, "4;r1c1r1c2").unwrap();
        let solver = SolverBuilder::new(9)
            .with_constraint(cage)
            .build()
            .unwrap();
        assert_eq!(
            solver.board().candidates(lay.cell(0, 0)).to_vec(),
            vec![1, 3]
        );
        assert_eq!(
            solver.board().candidates(lay.cell(0, 1)).to_vec(),
            vec![1, 3]
        );
    }

    #[test]
    fn must_contain_reports_forced_digits() {
        // Three cells in a row summing to 24: {7,8,9} exactly.
        let lay = Layout::new(9);
        let cage = KillerCage::new(
            vec![lay.cell(0, 0), lay.cell(0, 1), lay.cell(0, 2)],
            24,
            9,
        )
        .unwrap();
        let solver = SolverBuilder::new(9).build().unwrap();
        let mut board = solver.board().clone();

        for digit in [7, 8, 9] {
            assert_eq!(cage.cells_must_contain(&board, digit).len(), 3);
        }
        assert!(cage.cells_must_contain(&board, 6).is_empty());

        // After narrowing, enforcing a wrong total is rejected.
        assert!(cage.init_candidates(&mut board).is_changed());
        assert_eq!(
            board.candidates(lay.cell(0, 0)).to_vec(),
            vec![7, 8, 9]
        );
    }

    #[test]
    fn overfull_cage_is_rejected_at_construction() {
        assert!(factory(9, "50;r1c1r1c2").is_err());
        assert!(factory(9, "1;r1c1r1c2").is_err());
        assert!(factory(9, "10;").is_err());
        assert!(factory(9, "ten;r1c1r1c2").is_err());
    }

    #[test]
    fn completed_cage_rejects_a_bad_sum() {
        let lay = Layout::new(9);
        let result = SolverBuilder::new(9)
            .with_constraint(factory(9, "5;r1c1r1c2").unwrap())
            .with_given(lay.cell(0, 0), 1)
            .with_given(lay.cell(0, 1), 2)
            .build();
        assert!(result.is_err());
    }
}
