//! Thermometer: strictly increasing digits from the bulb outward.

use itertools::Itertools;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// An ordered line of cells whose digits strictly increase, bulb first.
pub struct Thermometer {
    specific_name: String,
    cells: Vec<CellId>,
    size: usize,
}

/// Factory for option strings holding the cell line, bulb first.
pub fn factory(size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    let cells = Layout::new(size).parse_cells(options)?;
    Ok(Arc::new(Thermometer::new(cells, size)?))
}

impl Thermometer {
    pub fn new(cells: Vec<CellId>, size: usize) -> Result<Self, String> {
        if cells.len() < 2 {
            return Err("a thermometer needs at least two cells".to_owned());
        }
        if cells.len() > size {
            return Err(format!(
                "a thermometer of {} cells cannot increase within 1..={}",
                cells.len(),
                size
            ));
        }
        if cells.iter().duplicates().next().is_some() {
            return Err("a thermometer cannot revisit a cell".to_owned());
        }

        let specific_name = format!("Thermometer at {}", cells[0]);
        Ok(Self {
            specific_name,
            cells,
            size,
        })
    }

    // Tightens every cell against its neighbors in both directions,
    // collecting the removals.
    fn tighten(&self, board: &mut Board, mut trace: Option<&mut StepTrace>) -> LogicResult {
        let mut elims = Eliminations::new();
        let mut floor = 0;
        for &cell in &self.cells {
            let mask = board.candidates(cell);
            if mask.is_empty() {
                return LogicResult::Invalid;
            }
            for digit in mask & DigitMask::at_most(floor.min(self.size)) {
                elims.add_cell_digit(cell, digit);
            }
            let reachable = mask & !DigitMask::at_most(floor.min(self.size));
            floor = if reachable.is_empty() {
                self.size + 1
            } else {
                reachable.lowest()
            };
            if floor > self.size {
                if let Some(trace) = trace.as_deref_mut() {
                    trace.push(Deduction::new(format!(
                        "{}: no room left above {}",
                        self.specific_name, cell
                    )));
                }
                return LogicResult::Invalid;
            }
        }

        let mut ceiling = self.size + 1;
        for &cell in self.cells.iter().rev() {
            let mask = board.candidates(cell);
            for digit in mask & DigitMask::at_least(ceiling.min(self.size + 1), self.size) {
                elims.add_cell_digit(cell, digit);
            }
            let reachable = mask & DigitMask::below(ceiling);
            ceiling = if reachable.is_empty() {
                0
            } else {
                reachable.highest()
            };
            if ceiling == 0 {
                if let Some(trace) = trace.as_deref_mut() {
                    trace.push(Deduction::new(format!(
                        "{}: no room left below {}",
                        self.specific_name, cell
                    )));
                }
                return LogicResult::Invalid;
            }
        }

        if elims.is_empty() {
            return LogicResult::None;
        }
        let result = elims.apply(board);
        if let Some(trace) = trace {
            trace.push(Deduction::from_elims(
                &format!("{}: tightened", self.specific_name),
                &elims,
            ));
        }
        result
    }
}

impl Constraint for Thermometer {
    fn name(&self) -> &str {
        "Thermometer"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellId] {
        &self.cells
    }

    fn init_candidates(&self, board: &mut Board) -> LogicResult {
        self.tighten(board, None)
    }

    fn enforce(&self, board: &mut Board, cell: CellId, digit: usize) -> LogicResult {
        let position = match self.cells.iter().position(|&c| c == cell) {
            Some(position) => position,
            None => return LogicResult::None,
        };

        let mut result = LogicResult::None;
        // Cells after this one climb at least one step each.
        for (distance, &later) in self.cells[position + 1..].iter().enumerate() {
            let lowest = digit + distance + 1;
            if lowest > self.size {
                return LogicResult::Invalid;
            }
            match board.keep_mask(later, DigitMask::at_least(lowest, self.size)) {
                LogicResult::Invalid => return LogicResult::Invalid,
                LogicResult::Changed => result = LogicResult::Changed,
                _ => {}
            }
        }
        // Cells before it descend at least one step each.
        for (distance, &earlier) in self.cells[..position].iter().rev().enumerate() {
            if digit <= distance + 1 {
                return LogicResult::Invalid;
            }
            let highest = digit - distance - 1;
            match board.keep_mask(earlier, DigitMask::at_most(highest)) {
                LogicResult::Invalid => return LogicResult::Invalid,
                LogicResult::Changed => result = LogicResult::Changed,
                _ => {}
            }
        }
        result
    }

    fn step_logic(
        &self,
        board: &mut Board,
        trace: Option<&mut StepTrace>,
        _brute_forcing: bool,
    ) -> LogicResult {
        self.tighten(board, trace)
    }

    fn init_links(&self, board: &Board, _initializing: bool) -> ConstraintLinks {
        // cells[j] must exceed cells[i] by at least j - i.
        let mut weak = Vec::new();
        for (i, &a) in self.cells.iter().enumerate() {
            for (j, &b) in self.cells.iter().enumerate().skip(i + 1) {
                let gap = j - i;
                for high in 1..=board.size() {
                    for low in 1..=board.size() {
                        if low < high + gap {
                            weak.push((a.candidate(high), b.candidate(low)));
                        }
                    }
                }
            }
        }
        ConstraintLinks {
            weak,
            ..ConstraintLinks::default()
        }
    }

    fn seen_cells(&self, cell: CellId) -> Vec<CellId> {
        // Strict increase makes every pair of thermometer cells distinct.
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

    fn split_to_primitives(&self) -> Vec<Arc<dyn Constraint>> {
        self.cells
            .windows(2)
            .map(|pair| {
                Arc::new(
                    Thermometer::new(pair.to_vec(), self.size)
                        .expect("a window of two distinct cells is a valid thermometer"),
                ) as Arc<dyn Constraint>
            })
            .collect()
    }

    fn signature(&self) -> String {
        format!(
            "Thermometer:{}",
            self.cells.iter().map(|c| c.to_string()).join("")
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn initialization_trims_both_ends() {
        // Four cells down the main diagonal: the bulb loses 7,8,9 and the
        // tip loses 1,2,3.
        let lay = Layout::new(9);
        let thermo = factory(9, "r1c1d333").unwrap();
        let solver = SolverBuilder::new(9)
            .with_constraint(thermo)
            .build()
            .unwrap();

        let board = solver.board();
        assert_eq!(board.candidates(lay.cell(0, 0)).to_vec(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(board.candidates(lay.cell(3, 3)).to_vec(), vec![4, 5, 6, 7, 8, 9]);

        // And search completes the rest of the grid.
        assert!(solver.solve_any().is_solved());
    }

    #[test]
    fn commit_squeezes_the_line() {
        let lay = Layout::new(9);
        let thermo = factory(9, "r1c1r1c2r1c3r1c4").unwrap();
        let solver = SolverBuilder::new(9)
            .with_constraint(thermo)
            .with_given(lay.cell(0, 1), 3)
            .build()
            .unwrap();

        let board = solver.board();
        assert_eq!(board.candidates(lay.cell(0, 0)).to_vec(), vec![1, 2]);
        assert_eq!(board.candidates(lay.cell(0, 2)).to_vec(), vec![4, 5, 6, 7, 8]);
        assert_eq!(board.candidates(lay.cell(0, 3)).to_vec(), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn a_long_thermometer_subsumes_its_pairs() {
        let lay = Layout::new(9);
        let long = factory(9, "r1c1r1c2r1c3").unwrap();
        let pair = factory(9, "r1c1r1c2").unwrap();
        let solver = SolverBuilder::new(9)
            .with_constraint(long)
            .with_constraint(pair)
            .build()
            .unwrap();

        let registry = solver.board().registry();
        assert!(!registry.is_subsumed(0));
        assert!(registry.is_subsumed(1));
        // The subsumed pair keeps its links; the bulb still can't be 9.
        assert!(!solver.board().candidates(lay.cell(0, 0)).has(9));
    }

    #[test]
    fn rejects_degenerate_lines() {
        assert!(factory(9, "r1c1").is_err());
        assert!(factory(9, "r1c1-9r2c1").is_err());
        assert!(factory(9, "r1c1r1c2r1c1").is_err());
        assert!(factory(4, "r1c1d2222").is_err());
    }
}
