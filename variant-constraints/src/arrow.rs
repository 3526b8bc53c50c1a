//! Arrow: shaft digits summing to the number shown in the pill.

use itertools::Itertools;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// Shaft cells sum to the pill value. A one-cell pill is the classic arrow
/// circle; a longer pill reads as a base-10 number, most significant cell
/// first.
pub struct Arrow {
    specific_name: String,
    pill: Vec<CellId>,
    shaft: Vec<CellId>,
    all_cells: Vec<CellId>,
    size: usize,
}

/// Factory for option strings of the form `<pill cells>;<shaft cells>`.
pub fn factory(size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    let (pill_text, shaft_text) = options
        .split_once(';')
        .ok_or_else(|| format!("arrow options need '<pill>;<shaft>': {}", options))?;
    let lay = Layout::new(size);
    let pill = lay.parse_cells(pill_text)?;
    let shaft = lay.parse_cells(shaft_text)?;
    Ok(Arc::new(Arrow::new(pill, shaft, size)?))
}

impl Arrow {
    pub fn new(pill: Vec<CellId>, shaft: Vec<CellId>, size: usize) -> Result<Self, String> {
        if pill.is_empty() || shaft.is_empty() {
            return Err("an arrow needs a pill and a shaft".to_owned());
        }
        if pill.len() > 3 {
            return Err("a pill of more than three cells cannot be summed to".to_owned());
        }
        if pill.iter().chain(shaft.iter()).duplicates().next().is_some() {
            return Err("arrow cells cannot repeat".to_owned());
        }

        let all_cells = pill.iter().chain(shaft.iter()).copied().collect();
        let specific_name = format!("Arrow at {}", pill[0]);
        Ok(Self {
            specific_name,
            pill,
            shaft,
            all_cells,
            size,
        })
    }

    fn place_value(&self, index: usize) -> usize {
        10usize.pow((self.pill.len() - 1 - index) as u32)
    }

    // Lowest and highest value the pill can currently show.
    fn pill_bounds(&self, board: &Board) -> (usize, usize) {
        let mut low = 0;
        let mut high = 0;
        for (i, &cell) in self.pill.iter().enumerate() {
            let mask = board.candidates(cell);
            let place = self.place_value(i);
            low += mask.lowest() * place;
            high += mask.highest() * place;
        }
        (low, high)
    }

    // Lowest and highest sum the shaft can currently reach.
    fn shaft_bounds(&self, board: &Board) -> (usize, usize) {
        let mut low = 0;
        let mut high = 0;
        let mut union = DigitMask::empty();
        for &cell in &self.shaft {
            let mask = board.candidates(cell);
            low += mask.lowest();
            high += mask.highest();
            union = union | mask;
        }

        // A shaft of pairwise-distinct cells cannot repeat digits, which
        // squeezes both ends.
        if self.shaft.len() > 1 && board.is_distinct_set(&self.shaft) {
            let digits = union.to_vec();
            if digits.len() >= self.shaft.len() {
                let from_smallest: usize = digits[..self.shaft.len()].iter().sum();
                let from_largest: usize = digits[digits.len() - self.shaft.len()..].iter().sum();
                low = low.max(from_smallest);
                high = high.min(from_largest);
            }
        }

        (low, high)
    }

    // Narrows pill digits against the shaft range and shaft digits against
    // the pill range, one sweep.
    fn narrow(&self, board: &mut Board, trace: Option<&mut StepTrace>) -> LogicResult {
        let mut elims = Eliminations::new();

        let (shaft_low, shaft_high) = self.shaft_bounds(board);
        for (i, &cell) in self.pill.iter().enumerate() {
            let mask = board.candidates(cell);
            let place = self.place_value(i);
            let (rest_low, rest_high) = self
                .pill
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold((0, 0), |(low, high), (j, &other)| {
                    let other_mask = board.candidates(other);
                    let other_place = self.place_value(j);
                    (
                        low + other_mask.lowest() * other_place,
                        high + other_mask.highest() * other_place,
                    )
                });
            for digit in mask {
                let value_low = rest_low + digit * place;
                let value_high = rest_high + digit * place;
                if value_high < shaft_low || value_low > shaft_high {
                    elims.add_cell_digit(cell, digit);
                }
            }
        }

        let (pill_low, pill_high) = self.pill_bounds(board);
        for (i, &cell) in self.shaft.iter().enumerate() {
            let mask = board.candidates(cell);
            let (rest_low, rest_high) = self
                .shaft
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold((0, 0), |(low, high), (_, &other)| {
                    let other_mask = board.candidates(other);
                    (low + other_mask.lowest(), high + other_mask.highest())
                });
            for digit in mask {
                if rest_low + digit > pill_high || rest_high + digit < pill_low {
                    elims.add_cell_digit(cell, digit);
                }
            }
        }

        if elims.is_empty() {
            return LogicResult::None;
        }
        let result = elims.apply(board);
        if let Some(trace) = trace {
            trace.push(Deduction::from_elims(
                &format!("{}: sum bounds", self.specific_name),
                &elims,
            ));
        }
        result
    }
}

impl Constraint for Arrow {
    fn name(&self) -> &str {
        "Arrow"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn cells(&self) -> &[CellId] {
        &self.all_cells
    }

    fn init_candidates(&self, board: &mut Board) -> LogicResult {
        self.narrow(board, None)
    }

    fn enforce(&self, board: &mut Board, _cell: CellId, _digit: usize) -> LogicResult {
        let open: Vec<CellId> = self
            .all_cells
            .iter()
            .copied()
            .filter(|&c| !board.is_committed(c))
            .collect();

        if open.is_empty() {
            let pill_value: usize = self
                .pill
                .iter()
                .enumerate()
                .map(|(i, &c)| board.value(c) * self.place_value(i))
                .sum();
            let shaft_sum: usize = self.shaft.iter().map(|&c| board.value(c)).sum();
            return if pill_value == shaft_sum {
                LogicResult::None
            } else {
                LogicResult::Invalid
            };
        }

        let (pill_low, pill_high) = self.pill_bounds(board);
        let (shaft_low, shaft_high) = self.shaft_bounds(board);
        if pill_high < shaft_low || pill_low > shaft_high {
            return LogicResult::Invalid;
        }

        if open.len() == 1 {
            // One blank left: its digit is fully determined.
            let cell = open[0];
            for digit in board.candidates(cell) {
                let mut trial = board.clone();
                if trial.keep_mask(cell, DigitMask::single(digit)).is_invalid() {
                    continue;
                }
                let (low, high) = self.pill_bounds(&trial);
                let (sum_low, sum_high) = self.shaft_bounds(&trial);
                if low == high && sum_low == sum_high && low == sum_low {
                    return board.keep_mask(cell, DigitMask::single(digit));
                }
            }
            return LogicResult::Invalid;
        }

        LogicResult::None
    }

    fn step_logic(
        &self,
        board: &mut Board,
        trace: Option<&mut StepTrace>,
        _brute_forcing: bool,
    ) -> LogicResult {
        self.narrow(board, trace)
    }

    fn signature(&self) -> String {
        let lay = Layout::new(self.size);
        format!(
            "Arrow:{}:{}",
            self.pill.iter().map(|c| c.to_string()).join(""),
            lay.compact_name(&self.shaft)
        )
    }
}
