//! Pair markers between orthogonal neighbors: sums, differences, ratios,
//! with optional negative ("all unmarked pairs") variants.

use itertools::Itertools;
use regex::Regex;
use std::sync::Arc;
use variant_solver_lib::prelude::*;

/// The relation a marker asserts about the two digits it sits between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairKind {
    /// The digits sum to the given total (XV, killer dots).
    Sum(usize),
    /// The digits differ by exactly the given amount (white kropki,
    /// consecutive).
    Difference(usize),
    /// One digit is the given multiple of the other (black kropki).
    Ratio(usize),
}

impl PairKind {
    fn allows(self, a: usize, b: usize) -> bool {
        match self {
            PairKind::Sum(total) => a + b == total,
            PairKind::Difference(gap) => a.abs_diff(b) == gap,
            PairKind::Ratio(factor) => a == factor * b || b == factor * a,
        }
    }

    fn token(self) -> String {
        match self {
            PairKind::Sum(total) => format!("s{}", total),
            PairKind::Difference(gap) => format!("d{}", gap),
            PairKind::Ratio(factor) => format!("r{}", factor),
        }
    }
}

/// One marked edge between two orthogonally adjacent cells.
#[derive(Clone, Copy, Debug)]
pub struct Marker {
    pub kind: PairKind,
    pub a: CellId,
    pub b: CellId,
}

/// A set of pair markers plus negative kinds that bind every unmarked
/// orthogonal pair. Entirely link-driven: once the links are declared the
/// kernel's propagation and cell forcing do all the work.
pub struct PairMarkers {
    specific_name: String,
    markers: Vec<Marker>,
    negatives: Vec<PairKind>,
}

/// Factory for option strings such as `s10@r1c1r1c2;d1@r2c1r2c2;!d1`.
/// Markers are `<kind><n>@<two cells>`; `!<kind><n>` adds a negative kind.
pub fn factory(size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    let marker_re = Regex::new(r"^([sdr])(\d+)@(.+)$").expect("static regex");
    let negative_re = Regex::new(r"^!([sdr])(\d+)$").expect("static regex");
    let lay = Layout::new(size);

    let mut markers = Vec::new();
    let mut negatives = Vec::new();
    for part in options.split(';').map(str::trim) {
        if part.is_empty() {
            return Err(format!("empty pair marker in: {}", options));
        }
        if let Some(captures) = negative_re.captures(part) {
            negatives.push(parse_kind(&captures[1], &captures[2])?);
        } else if let Some(captures) = marker_re.captures(part) {
            let kind = parse_kind(&captures[1], &captures[2])?;
            let cells = lay.parse_cells(&captures[3])?;
            let (a, b) = match cells[..] {
                [a, b] => (a, b),
                _ => return Err(format!("a pair marker needs exactly two cells: {}", part)),
            };
            if !a.is_orthogonal(b) {
                return Err(format!("marker cells must be orthogonal neighbors: {}", part));
            }
            markers.push(Marker { kind, a, b });
        } else {
            return Err(format!("unrecognized pair marker: {}", part));
        }
    }

    Ok(Arc::new(PairMarkers::new("Pair Markers", markers, negatives)))
}

/// Factory for the global nonconsecutive rule; takes no options.
pub fn nonconsecutive_factory(_size: usize, options: &str) -> Result<Arc<dyn Constraint>, String> {
    if !options.trim().is_empty() {
        return Err(format!("nonconsecutive takes no options, got: {}", options));
    }
    Ok(Arc::new(PairMarkers::nonconsecutive()))
}

fn parse_kind(letter: &str, number: &str) -> Result<PairKind, String> {
    let number: usize = number
        .parse()
        .map_err(|_| format!("bad pair marker number: {}", number))?;
    match letter {
        "s" => Ok(PairKind::Sum(number)),
        "d" => Ok(PairKind::Difference(number)),
        "r" => Ok(PairKind::Ratio(number)),
        other => Err(format!("unknown pair marker kind: {}", other)),
    }
}

impl PairMarkers {
    pub fn new(specific_name: &str, markers: Vec<Marker>, negatives: Vec<PairKind>) -> Self {
        Self {
            specific_name: specific_name.to_owned(),
            markers,
            negatives,
        }
    }

    /// No adjacent pair of cells may hold consecutive digits.
    pub fn nonconsecutive() -> Self {
        Self::new("Nonconsecutive", Vec::new(), vec![PairKind::Difference(1)])
    }

    fn marker_links(
        marker: &Marker,
        size: usize,
        links: &mut ConstraintLinks,
    ) {
        for digit in 1..=size {
            let partners: Vec<usize> = (1..=size)
                .filter(|&other| marker.kind.allows(digit, other))
                .collect();
            if partners.is_empty() {
                // No partner works at all: the digit is dead on both cells.
                links.weak.push((marker.a.candidate(digit), marker.a.candidate(digit)));
                links.weak.push((marker.b.candidate(digit), marker.b.candidate(digit)));
                continue;
            }
            for other in 1..=size {
                if !marker.kind.allows(digit, other) {
                    links.weak.push((marker.a.candidate(digit), marker.b.candidate(other)));
                }
            }
        }
    }

    fn negative_links(&self, board: &Board, links: &mut ConstraintLinks) {
        let lay = board.layout();
        let marked: Vec<(CellId, CellId)> = self
            .markers
            .iter()
            .map(|m| if m.a < m.b { (m.a, m.b) } else { (m.b, m.a) })
            .collect();

        for cell in lay.all_cells() {
            for neighbor in [cell.offset(0, 1), cell.offset(1, 0)].into_iter().flatten() {
                if marked.contains(&(cell, neighbor)) {
                    continue;
                }
                for digit in 1..=board.size() {
                    for other in 1..=board.size() {
                        if self.negatives.iter().any(|kind| kind.allows(digit, other)) {
                            links
                                .weak
                                .push((cell.candidate(digit), neighbor.candidate(other)));
                        }
                    }
                }
            }
        }
    }
}

impl Constraint for PairMarkers {
    fn name(&self) -> &str {
        "Pair Markers"
    }

    fn specific_name(&self) -> String {
        self.specific_name.clone()
    }

    fn enforced_by_links(&self) -> bool {
        true
    }

    fn init_links(&self, board: &Board, _initializing: bool) -> ConstraintLinks {
        let mut links = ConstraintLinks::new();
        for marker in &self.markers {
            Self::marker_links(marker, board.size(), &mut links);
        }
        if !self.negatives.is_empty() {
            self.negative_links(board, &mut links);
        }
        links
    }

    fn signature(&self) -> String {
        let markers = self
            .markers
            .iter()
            .map(|m| {
                let (a, b) = if m.a < m.b { (m.a, m.b) } else { (m.b, m.a) };
                format!("{}@{}{}", m.kind.token(), a, b)
            })
            .sorted()
            .join(",");
        let negatives = self.negatives.iter().map(|k| k.token()).sorted().join(",");
        format!("PairMarkers:{}:neg={}", markers, negatives)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sum_marker_narrows_the_partner() {
        let lay = Layout::new(9);
        let solver = SolverBuilder::new(9)
            .with_constraint(factory(9, "s10@r1c1r1c2").unwrap())
            .with_given(lay.cell(0, 0), 2)
            .build()
            .unwrap();
        assert_eq!(solver.board().candidates(lay.cell(0, 1)).to_vec(), vec![8]);
    }

    #[test]
    fn impossible_marker_digits_die_at_initialization() {
        // Sum 5 between two cells: digits 5..9 have no partner.
        let lay = Layout::new(9);
        let solver = SolverBuilder::new(9)
            .with_constraint(factory(9, "s5@r1c1r1c2").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            solver.board().candidates(lay.cell(0, 0)),
            DigitMask::at_most(4)
        );
        assert_eq!(
            solver.board().candidates(lay.cell(0, 1)),
            DigitMask::at_most(4)
        );
    }

    #[test]
    fn nonconsecutive_4x4_with_corner_givens_is_contradictory() {
        // r1 is forced to 2,4,1,3 and row 2 then has no arrangement: the
        // kernel proves it without guessing.
        let lay = Layout::new(4);
        let mut solver = SolverBuilder::new(4)
            .with_no_regions()
            .with_constraint(Arc::new(PairMarkers::nonconsecutive()))
            .with_given(lay.cell(0, 0), 2)
            .with_given(lay.cell(0, 3), 3)
            .build()
            .unwrap();

        // The givens' neighbors lose their consecutive digits on
        // propagation alone.
        assert_eq!(solver.board().candidates(lay.cell(0, 1)).to_vec(), vec![4]);
        assert_eq!(solver.board().candidates(lay.cell(0, 2)).to_vec(), vec![1]);

        assert_eq!(solver.count_solutions(2), CountOutcome::Exact(0));

        let mut trace = StepTrace::new();
        assert!(solver.logical_solve(&mut trace).is_invalid());
        assert!(!trace.is_empty());
    }

    #[test]
    fn nonconsecutive_5x5_cyclic_solution_exists() {
        // Rows cycling 1,3,5,2,4 satisfy the rule; seed row 1 and let the
        // search fill the rest.
        let mut builder = SolverBuilder::new(5)
            .with_no_regions()
            .with_constraint(Arc::new(PairMarkers::nonconsecutive()));
        for (col, digit) in [1, 3, 5, 2, 4].into_iter().enumerate() {
            builder = builder.with_given(Layout::new(5).cell(0, col), digit);
        }
        let solver = builder.build().unwrap();

        let outcome = solver.solve_any();
        assert!(outcome.is_solved());
        let board = outcome.board().unwrap();
        let lay = board.layout();
        for row in 0..5 {
            for col in 0..5 {
                let here = board.value(lay.cell(row, col));
                if col + 1 < 5 {
                    let right = board.value(lay.cell(row, col + 1));
                    assert!(here.abs_diff(right) != 1);
                }
                if row + 1 < 5 {
                    let below = board.value(lay.cell(row + 1, col));
                    assert!(here.abs_diff(below) != 1);
                }
            }
        }
    }

    #[test]
    fn factory_rejects_malformed_markers() {
        assert!(factory(9, "s10@r1c1r3c1").is_err());
        assert!(factory(9, "s10@r1c1").is_err());
        assert!(factory(9, "x10@r1c1r1c2").is_err());
        assert!(factory(9, "s10@r1c1r1c2;;!d1").is_err());
        assert!(nonconsecutive_factory(9, "stuff").is_err());
    }
}
