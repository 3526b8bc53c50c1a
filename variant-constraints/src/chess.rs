//! Chess-move constraints: no repeated digit a given move apart.

use itertools::Itertools;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// Cells related by any of the given (row, column) offsets cannot share a
/// digit. Pure links; the kernel's weak-link cascade enforces everything.
pub struct ChessMoves {
    specific_name: String,
    offsets: Vec<(isize, isize)>,
}

/// Factory for the anti-knight rule; takes no options.
pub fn antiknight_factory(_size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    if !options.trim().is_empty() {
        return Err(format!("antiknight takes no options, got: {}", options));
    }
    Ok(Arc::new(ChessMoves::anti_knight()))
}

/// Factory for the anti-king rule; takes no options.
pub fn antiking_factory(_size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    if !options.trim().is_empty() {
        return Err(format!("antiking takes no options, got: {}", options));
    }
    Ok(Arc::new(ChessMoves::anti_king()))
}

impl ChessMoves {
    pub fn new(specific_name: &str, offsets: Vec<(isize, isize)>) -> Self {
        Self {
            specific_name: specific_name.to_owned(),
            offsets,
        }
    }

    /// All eight reflections and transpositions of one offset.
    pub fn from_symmetric_offset(specific_name: &str, offset: (isize, isize)) -> Self {
        let (dr, dc) = offset;
        let offsets = [
            (dr, dc),
            (dr, -dc),
            (-dr, dc),
            (-dr, -dc),
            (dc, dr),
            (dc, -dr),
            (-dc, dr),
            (-dc, -dr),
        ]
        .into_iter()
        .filter(|&(r, c)| (r, c) != (0, 0))
        .unique()
        .collect();
        Self::new(specific_name, offsets)
    }

    pub fn anti_knight() -> Self {
        Self::from_symmetric_offset("Anti-Knight", (1, 2))
    }

    pub fn anti_king() -> Self {
        Self::from_symmetric_offset("Anti-King", (1, 1))
    }
}

impl Constraint for ChessMoves {
    fn name(&self) -> &str {
        "Chess Moves"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn enforced_by_links(&self) -> bool {
        true
    }

    fn init_links(&self, board: &Board, _initializing: bool) -> ConstraintLinks {
        let mut weak = Vec::new();
        for cell in board.layout().all_cells() {
            for &(dr, dc) in &self.offsets {
                if let Some(other) = cell.offset(dr, dc) {
                    for digit in 1..=board.size() {
                        weak.push((cell.candidate(digit), other.candidate(digit)));
                    }
                }
            }
        }
        ConstraintLinks {
            weak,
            ..ConstraintLinks::default()
        }
    }

    fn signature(&self) -> String {
        let offsets = self
            .offsets
            .iter()
            .sorted()
            .map(|(dr, dc)| format!("{},{}", dr, dc))
            .join(";");
        format!("ChessMoves:{}", offsets)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn anti_king_strips_diagonal_neighbors() {
        let lay = Layout::new(9);
        let solver = SolverBuilder::new(9)
            .with_constraint(Arc::new(ChessMoves::anti_king()))
            .with_given(lay.cell(4, 4), 5)
            .build()
            .unwrap();

        let board = solver.board();
        for (row, col) in [(3, 3), (3, 5), (5, 3), (5, 5)] {
            assert!(!board.candidates(lay.cell(row, col)).has(5));
        }
        assert!(board.candidates(lay.cell(2, 2)).has(5));
    }

    #[test]
    fn anti_knight_strips_knight_moves() {
        let lay = Layout::new(9);
        let solver = SolverBuilder::new(9)
            .with_constraint(Arc::new(ChessMoves::anti_knight()))
            .with_given(lay.cell(4, 4), 7)
            .build()
            .unwrap();

        let board = solver.board();
        for (row, col) in [(2, 3), (2, 5), (3, 2), (3, 6), (5, 2), (5, 6), (6, 3), (6, 5)] {
            assert!(!board.candidates(lay.cell(row, col)).has(7), "r{}c{}", row + 1, col + 1);
        }
    }

    #[test]
    fn symmetric_offsets_deduplicate() {
        // (1,1) expands to the four diagonal directions only.
        let king = ChessMoves::anti_king();
        assert_eq!(king.offsets.len(), 4);
        let knight = ChessMoves::anti_knight();
        assert_eq!(knight.offsets.len(), 8);
    }
}
