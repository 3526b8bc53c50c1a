//! Size-dependent helpers for cells, candidates, and their names.

use crate::candidate_id::CandidateId;
use crate::cell_id::CellId;
use itertools::Itertools;

/// Carries the grid size so that cell and candidate arithmetic does not need
/// it passed around separately.
#[derive(Copy, Clone, Debug)]
pub struct Layout {
    size: usize,
}

impl Layout {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(self) -> usize {
        self.size
    }

    pub fn cell_count(self) -> usize {
        self.size * self.size
    }

    pub fn candidate_count(self) -> usize {
        self.cell_count() * self.size
    }

    pub fn cell(self, row: usize, col: usize) -> CellId {
        CellId::at(row, col, self.size)
    }

    pub fn at(self, index: usize) -> CellId {
        CellId::new(index, self.size)
    }

    pub fn candidate(self, cell: CellId, digit: usize) -> CandidateId {
        CandidateId::of(cell, digit)
    }

    pub fn candidate_at(self, index: usize) -> CandidateId {
        CandidateId::new(index, self.size)
    }

    /// All cells in row-major order.
    pub fn all_cells(self) -> impl Iterator<Item = CellId> {
        (0..self.cell_count()).map(move |i| self.at(i))
    }

    /// All candidates in ascending index order.
    pub fn all_candidates(self) -> impl Iterator<Item = CandidateId> {
        (0..self.candidate_count()).map(move |i| self.candidate_at(i))
    }

    /// Candidate pairs `(digit in cell A, same digit in cell B)` for every
    /// digit and every unordered pair of the given cells. Feeding these to
    /// the link graph as weak links makes the cells pairwise distinct.
    pub fn same_digit_pairs(self, cells: &[CellId]) -> Vec<(CandidateId, CandidateId)> {
        let mut pairs = Vec::new();
        for digit in 1..=self.size {
            for (&a, &b) in cells.iter().tuple_combinations() {
                pairs.push((self.candidate(a, digit), self.candidate(b, digit)));
            }
        }
        pairs
    }

    /// Compresses a list of cells into the shortest `r..c..` description.
    ///
    /// ```
    /// # use variant_solver_lib::layout::Layout;
    /// let lay = Layout::new(9);
    /// let row = [lay.cell(0, 0), lay.cell(0, 1), lay.cell(0, 2)];
    /// assert_eq!(lay.compact_name(&row), "r1c123");
    /// let col = [lay.cell(0, 4), lay.cell(1, 4), lay.cell(4, 4)];
    /// assert_eq!(lay.compact_name(&col), "r125c5");
    /// ```
    pub fn compact_name(self, cells: &[CellId]) -> String {
        if cells.is_empty() {
            return String::new();
        }
        if cells.len() == 1 {
            return cells[0].to_string();
        }

        let sep = if self.size <= 9 { "" } else { "," };
        let coords: Vec<(usize, usize)> = cells.iter().sorted().map(|c| c.coords()).collect();

        if coords.iter().all(|&(r, _)| r == coords[0].0) {
            let cols = coords.iter().map(|&(_, c)| c + 1).join(sep);
            return format!("r{}c{}", coords[0].0 + 1, cols);
        }
        if coords.iter().all(|&(_, c)| c == coords[0].1) {
            let rows = coords.iter().map(|&(r, _)| r + 1).join(sep);
            return format!("r{}c{}", rows, coords[0].1 + 1);
        }

        let by_row = self.grouped_name(&coords, sep, false);
        let by_col = self.grouped_name(&coords, sep, true);
        if by_row.len() <= by_col.len() {
            by_row
        } else {
            by_col
        }
    }

    // Groups rows that share an identical column set (or the transpose).
    fn grouped_name(self, coords: &[(usize, usize)], sep: &str, transpose: bool) -> String {
        let mut minor_per_major: Vec<Vec<usize>> = vec![vec![]; self.size];
        for &(r, c) in coords {
            let (major, minor) = if transpose { (c, r) } else { (r, c) };
            minor_per_major[major].push(minor + 1);
        }
        for list in minor_per_major.iter_mut() {
            list.sort_unstable();
        }

        let mut groups = Vec::new();
        for major in 0..self.size {
            if minor_per_major[major].is_empty() {
                continue;
            }
            let mut majors = vec![major + 1];
            for later in major + 1..self.size {
                if minor_per_major[later] == minor_per_major[major] {
                    majors.push(later + 1);
                    minor_per_major[later].clear();
                }
            }
            let majors = majors.iter().join(sep);
            let minors = minor_per_major[major].iter().join(sep);
            if transpose {
                groups.push(format!("r{}c{}", minors, majors));
            } else {
                groups.push(format!("r{}c{}", majors, minors));
            }
        }
        groups.join(",")
    }
}

/// Region assignment for the standard boxed layout: the widest region shape
/// no taller than it is wide that tiles the grid (3x3 for size 9, 2x3 for
/// size 6, 2x2 for size 4).
///
/// ```
/// # use variant_solver_lib::layout::standard_boxes;
/// let boxes = standard_boxes(6);
/// assert_eq!(boxes.len(), 36);
/// assert_eq!(&boxes[..6], &[0, 0, 0, 1, 1, 1]);
/// assert_eq!(&boxes[6..12], &[0, 0, 0, 1, 1, 1]);
/// assert_eq!(&boxes[12..18], &[2, 2, 2, 3, 3, 3]);
/// ```
pub fn standard_boxes(size: usize) -> Vec<usize> {
    if size == 0 {
        return Vec::new();
    }

    let mut box_height = (size as f64).sqrt().floor() as usize;
    while size % box_height != 0 {
        box_height -= 1;
    }
    let box_width = size / box_height;

    let mut regions = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            regions.push((row / box_height) * box_height + col / box_width);
        }
    }
    regions
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_boxes_cover_each_region_exactly_once() {
        for size in [4usize, 6, 8, 9, 12] {
            let regions = standard_boxes(size);
            assert_eq!(regions.len(), size * size);
            for region in 0..size {
                assert_eq!(regions.iter().filter(|&&r| r == region).count(), size);
            }
        }
    }

    #[test]
    fn same_digit_pairs_count() {
        let lay = Layout::new(9);
        let cells: Vec<CellId> = (0..3).map(|c| lay.cell(0, c)).collect();
        // 3 pairs per digit, 9 digits.
        assert_eq!(lay.same_digit_pairs(&cells).len(), 27);
    }

    #[test]
    fn compact_names() {
        let lay = Layout::new(9);
        assert_eq!(lay.compact_name(&[]), "");
        assert_eq!(lay.compact_name(&[lay.cell(4, 4)]), "r5c5");
        assert_eq!(
            lay.compact_name(&[lay.cell(0, 0), lay.cell(1, 1), lay.cell(2, 2)]),
            "r1c1,r2c2,r3c3"
        );
        assert_eq!(
            lay.compact_name(&[
                lay.cell(0, 0),
                lay.cell(0, 1),
                lay.cell(1, 0),
                lay.cell(1, 1)
            ]),
            "r12c12"
        );
    }
}
