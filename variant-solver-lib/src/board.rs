//! The candidate board and the commit propagator.

use crate::candidate_id::CandidateId;
use crate::cell_id::CellId;
use crate::constraint::{Constraint, ConstraintLinks};
use crate::digit_mask::DigitMask;
use crate::eliminations::Eliminations;
use crate::group::{Group, GroupKind};
use crate::layout::{standard_boxes, Layout};
use crate::link_graph::LinkGraph;
use crate::logic_result::LogicResult;
use crate::registry::ConstraintRegistry;
use crate::solver::cancel::CancelFlag;
use std::collections::HashMap;
use std::sync::Arc;

/// The solve state: one [`DigitMask`] per cell.
///
/// Everything that is not per-cell candidate state lives in the shared
/// [`BoardCore`]: the group registry, the link graph, and the constraints.
/// Cloning a board copies the masks in O(N²) and shares the core by
/// reference, which is what makes search branching cheap.
#[derive(Clone)]
pub struct Board {
    masks: Vec<DigitMask>,
    committed: usize,
    core: Arc<BoardCore>,
}

/// Immutable-after-finalization data shared by all clones of a board.
#[derive(Clone)]
pub struct BoardCore {
    size: usize,
    cell_count: usize,
    candidate_count: usize,
    all_digits: DigitMask,
    groups: Vec<Arc<Group>>,
    groups_by_cell: Vec<Vec<Arc<Group>>>,
    links: LinkGraph,
    registry: ConstraintRegistry,
    cancel: CancelFlag,
}

impl Board {
    /// Creates a board with full candidates, the standard groups for
    /// `regions` (empty slice for default boxes, uniform vector for no
    /// regions at all), any groups the constraints declare, and the base
    /// link graph (same-cell and same-group weak links).
    pub fn new(
        size: usize,
        regions: &[usize],
        constraints: Vec<Arc<dyn Constraint>>,
        cancel: CancelFlag,
    ) -> Board {
        let core = BoardCore::new(size, regions, constraints, cancel);
        Board {
            masks: vec![core.all_digits; core.cell_count],
            committed: 0,
            core: Arc::new(core),
        }
    }

    pub fn size(&self) -> usize {
        self.core.size
    }

    pub fn cell_count(&self) -> usize {
        self.core.cell_count
    }

    pub fn candidate_count(&self) -> usize {
        self.core.candidate_count
    }

    pub fn all_digits(&self) -> DigitMask {
        self.core.all_digits
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.core.size)
    }

    pub fn core(&self) -> Arc<BoardCore> {
        self.core.clone()
    }

    pub fn groups(&self) -> &[Arc<Group>] {
        &self.core.groups
    }

    pub fn groups_for(&self, cell: CellId) -> &[Arc<Group>] {
        &self.core.groups_by_cell[cell.index()]
    }

    pub fn links(&self) -> &LinkGraph {
        &self.core.links
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.core.registry
    }

    pub fn committed_count(&self) -> usize {
        self.committed
    }

    pub fn is_solved(&self) -> bool {
        self.committed == self.core.cell_count
    }

    pub fn all_cells(&self) -> impl Iterator<Item = CellId> {
        self.layout().all_cells()
    }

    /// The cell's raw mask, committed flag included.
    pub fn mask(&self, cell: CellId) -> DigitMask {
        self.masks[cell.index()]
    }

    /// The cell's candidates with the committed flag stripped.
    pub fn candidates(&self, cell: CellId) -> DigitMask {
        self.masks[cell.index()].uncommitted()
    }

    pub fn is_committed(&self, cell: CellId) -> bool {
        self.masks[cell.index()].is_committed()
    }

    /// The committed digit of a cell; meaningful only when
    /// [`Board::is_committed`] holds.
    pub fn value(&self, cell: CellId) -> usize {
        self.masks[cell.index()].sole()
    }

    pub fn has_candidate(&self, candidate: CandidateId) -> bool {
        let (cell, digit) = candidate.parts();
        self.masks[cell.index()].has(digit)
    }

    /// True when every digit is weak-linked between the two cells, i.e. the
    /// kernel already knows they can never share a digit.
    pub fn is_mutually_exclusive(&self, a: CellId, b: CellId) -> bool {
        (1..=self.core.size)
            .all(|digit| self.core.links.has_weak(a.candidate(digit), b.candidate(digit)))
    }

    /// True when the cells are pairwise known-distinct.
    pub fn is_distinct_set(&self, cells: &[CellId]) -> bool {
        for (i, &a) in cells.iter().enumerate() {
            for &b in &cells[i + 1..] {
                if !self.is_mutually_exclusive(a, b) {
                    return false;
                }
            }
        }
        true
    }

    /// Removes the digits in `digits` from the cell.
    ///
    /// A committed cell is left unchanged unless its digit itself is being
    /// removed, which is a contradiction. Removals are mirrored onto clone
    /// partners.
    pub fn clear_mask(&mut self, cell: CellId, digits: DigitMask) -> LogicResult {
        let current = self.masks[cell.index()];
        if current.is_committed() {
            return if digits.has(current.sole()) {
                LogicResult::Invalid
            } else {
                LogicResult::None
            };
        }

        let removed = current & digits.uncommitted();
        if removed.is_empty() {
            return LogicResult::None;
        }

        let narrowed = current & !removed;
        self.masks[cell.index()] = narrowed;

        if self.core.links.has_clones() {
            let core = self.core.clone();
            for digit in removed {
                for &partner in core.links.clones_for(cell.candidate(digit)) {
                    let (partner_cell, partner_digit) = partner.parts();
                    if self
                        .clear_mask(partner_cell, DigitMask::single(partner_digit))
                        .is_invalid()
                    {
                        return LogicResult::Invalid;
                    }
                }
            }
        }

        if narrowed.is_empty() {
            LogicResult::Invalid
        } else {
            LogicResult::Changed
        }
    }

    /// Keeps only the digits in `digits`.
    pub fn keep_mask(&mut self, cell: CellId, digits: DigitMask) -> LogicResult {
        self.clear_mask(cell, self.core.all_digits & !digits)
    }

    /// Replaces the cell's candidates with their intersection with `digits`.
    pub fn set_mask(&mut self, cell: CellId, digits: DigitMask) -> LogicResult {
        if (self.masks[cell.index()] & digits.uncommitted()).is_empty() {
            // Nothing would remain; report the contradiction without
            // tearing the cell down to an empty mask first.
            if self.masks[cell.index()].is_committed() {
                return LogicResult::Invalid;
            }
            self.masks[cell.index()] = DigitMask::empty();
            return LogicResult::Invalid;
        }
        self.keep_mask(cell, digits)
    }

    /// Removes a single candidate.
    pub fn clear_candidate(&mut self, candidate: CandidateId) -> LogicResult {
        let (cell, digit) = candidate.parts();
        self.clear_mask(cell, DigitMask::single(digit))
    }

    /// Removes a batch of candidates, folding the individual results.
    pub fn clear_candidates(
        &mut self,
        candidates: impl Iterator<Item = CandidateId>,
    ) -> LogicResult {
        let mut result = LogicResult::None;
        for candidate in candidates {
            result = result.combine(self.clear_candidate(candidate));
            if result.is_terminal() {
                return result;
            }
        }
        result
    }

    /// The atomic commit: collapses the cell to `digit` and cascades all
    /// forced consequences, in this order:
    ///
    /// 1. distinctness groups of the cell, then constraint-declared seen
    ///    cells;
    /// 2. the `enforce` hook of every constraint touching the cell;
    /// 3. weak links of the committed candidate, then clone commits.
    ///
    /// Iteration is deterministic throughout (group registration order,
    /// cells in sorted order, constraints in registration order), so two
    /// identical solves cascade identically. Cells the cascade reduces to a
    /// lone candidate stay uncommitted; the singles sweep picks them up at
    /// the next fixed point.
    pub fn set_value(&mut self, cell: CellId, digit: usize) -> LogicResult {
        if self.core.cancel.is_cancelled() {
            return LogicResult::Cancelled;
        }

        let current = self.masks[cell.index()];
        if !current.has(digit) {
            return LogicResult::Invalid;
        }
        if current.is_committed() {
            return LogicResult::None;
        }

        self.masks[cell.index()] = DigitMask::single(digit).committed();
        self.committed += 1;

        let core = self.core.clone();
        let single = DigitMask::single(digit);

        for group in &core.groups_by_cell[cell.index()] {
            for &other in group.cells() {
                if other != cell && self.clear_mask(other, single).is_invalid() {
                    return LogicResult::Invalid;
                }
            }
        }
        for &index in core.registry.touching(cell.index()) {
            if core.registry.is_subsumed(index) {
                continue;
            }
            for other in core.registry.get(index).seen_cells_for_digits(cell, single) {
                if other != cell && self.clear_mask(other, single).is_invalid() {
                    return LogicResult::Invalid;
                }
            }
        }

        for &index in core.registry.touching(cell.index()) {
            if core.registry.is_subsumed(index) {
                continue;
            }
            let constraint = core.registry.get(index);
            if constraint.enforced_by_links() {
                continue;
            }
            match constraint.enforce(self, cell, digit) {
                LogicResult::Invalid => return LogicResult::Invalid,
                LogicResult::Cancelled => return LogicResult::Cancelled,
                _ => {}
            }
        }

        let candidate = cell.candidate(digit);
        for target in core.links.weak_for(candidate).iter() {
            if self.clear_candidate(target).is_invalid() {
                return LogicResult::Invalid;
            }
        }
        for &partner in core.links.clones_for(candidate) {
            let (partner_cell, partner_digit) = partner.parts();
            match self.set_value(partner_cell, partner_digit) {
                LogicResult::Invalid => return LogicResult::Invalid,
                LogicResult::Cancelled => return LogicResult::Cancelled,
                _ => {}
            }
        }

        LogicResult::Changed
    }

    /// Installs constraint-declared links. Weak self-pairs come back as
    /// eliminations for the caller to apply; clone pairs also install the
    /// derived weak links between one clone's digit and the partner cell's
    /// other digits.
    ///
    /// Only legal while this board still owns its core exclusively, i.e.
    /// during finalization; afterwards the graph is frozen.
    pub fn install_links(&mut self, links: &ConstraintLinks) -> Result<Eliminations, String> {
        let size = self.core.size;
        let core = Arc::get_mut(&mut self.core)
            .ok_or_else(|| "link graph is frozen once the board core is shared".to_owned())?;

        let mut self_elims = Eliminations::new();
        for &(a, b) in &links.weak {
            if a == b {
                self_elims.add(a);
            } else {
                core.links.add_weak(a, b);
            }
        }
        for &(a, b) in &links.strong {
            if a != b {
                core.links.add_strong(a, b);
            }
        }
        for &(a, b) in &links.clones {
            if a == b {
                continue;
            }
            core.links.add_clone(a, b);
            let (cell_a, digit_a) = a.parts();
            let (cell_b, digit_b) = b.parts();
            for other in 1..=size {
                if other != digit_b {
                    core.links.add_weak(a, cell_b.candidate(other));
                }
                if other != digit_a {
                    core.links.add_weak(b, cell_a.candidate(other));
                }
            }
        }
        Ok(self_elims)
    }

    /// Runs subsumption detection over the registry. Finalization-only, for
    /// the same ownership reason as [`Board::install_links`].
    pub fn detect_subsumption(&mut self) -> Result<(), String> {
        let core = Arc::get_mut(&mut self.core)
            .ok_or_else(|| "registry is frozen once the board core is shared".to_owned())?;
        core.registry.detect_subsumption();
        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        self.core.cancel.is_cancelled()
    }
}

impl BoardCore {
    fn new(
        size: usize,
        regions: &[usize],
        constraints: Vec<Arc<dyn Constraint>>,
        cancel: CancelFlag,
    ) -> BoardCore {
        let lay = Layout::new(size);
        let cell_count = lay.cell_count();
        let candidate_count = lay.candidate_count();

        let groups = Self::build_groups(size, regions, &constraints);
        let groups_by_cell = Self::index_groups(cell_count, &groups);
        let links = Self::base_links(size, &groups);
        let registry = ConstraintRegistry::new(constraints, cell_count);

        BoardCore {
            size,
            cell_count,
            candidate_count,
            all_digits: DigitMask::all(size),
            groups,
            groups_by_cell,
            links,
            registry,
            cancel,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn groups(&self) -> &[Arc<Group>] {
        &self.groups
    }

    pub fn groups_for(&self, cell: CellId) -> &[Arc<Group>] {
        &self.groups_by_cell[cell.index()]
    }

    pub fn links(&self) -> &LinkGraph {
        &self.links
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }

    pub fn cancel(&self) -> &CancelFlag {
        &self.cancel
    }

    fn build_groups(
        size: usize,
        regions: &[usize],
        constraints: &[Arc<dyn Constraint>],
    ) -> Vec<Arc<Group>> {
        let lay = Layout::new(size);
        let cell_count = size * size;
        let mut groups: Vec<Arc<Group>> = Vec::new();

        for row in 0..size {
            let cells: Vec<CellId> = (0..size).map(|col| lay.cell(row, col)).collect();
            groups.push(Arc::new(Group::new(
                GroupKind::Row,
                &format!("Row {}", row + 1),
                &cells,
            )));
        }
        for col in 0..size {
            let cells: Vec<CellId> = (0..size).map(|row| lay.cell(row, col)).collect();
            groups.push(Arc::new(Group::new(
                GroupKind::Column,
                &format!("Column {}", col + 1),
                &cells,
            )));
        }

        // An empty vector means standard boxes; a uniform vector means no
        // regions at all (pure Latin square).
        let regions: Vec<usize> = if regions.len() == cell_count {
            regions.to_vec()
        } else {
            standard_boxes(size)
        };
        let uniform = regions.iter().all(|&r| r == regions[0]);

        if !uniform {
            let mut cells_by_region: HashMap<usize, Vec<CellId>> = HashMap::new();
            for cell in lay.all_cells() {
                cells_by_region
                    .entry(regions[cell.index()])
                    .or_default()
                    .push(cell);
            }
            let mut region_ids: Vec<usize> = cells_by_region.keys().copied().collect();
            region_ids.sort();
            for region in region_ids {
                let cells = &cells_by_region[&region];
                if cells.len() != size {
                    continue;
                }
                let group = Group::new(GroupKind::Region, &format!("Region {}", region + 1), cells);
                if !groups.iter().any(|g| g.cells() == group.cells()) {
                    groups.push(Arc::new(group));
                }
            }
        }

        for constraint in constraints {
            for group in constraint.groups(size) {
                if group.len() == size && !groups.iter().any(|g| g.cells() == group.cells()) {
                    groups.push(Arc::new(group));
                }
            }
        }

        groups
    }

    fn index_groups(cell_count: usize, groups: &[Arc<Group>]) -> Vec<Vec<Arc<Group>>> {
        let mut by_cell: Vec<Vec<Arc<Group>>> = vec![Vec::new(); cell_count];
        for group in groups {
            for cell in group.cells() {
                by_cell[cell.index()].push(group.clone());
            }
        }
        by_cell
    }

    fn base_links(size: usize, groups: &[Arc<Group>]) -> LinkGraph {
        let lay = Layout::new(size);
        let mut links = LinkGraph::new(size);

        // A committed digit excludes the cell's other digits.
        for cell in lay.all_cells() {
            for digit in 1..=size {
                for other in digit + 1..=size {
                    links.add_weak(cell.candidate(digit), cell.candidate(other));
                }
            }
        }
        // A committed digit excludes the same digit from every group peer.
        for group in groups {
            for (a, b) in lay.same_digit_pairs(group.cells()) {
                links.add_weak(a, b);
            }
        }

        links
    }
}

impl std::hash::Hash for Board {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.masks.hash(state);
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.masks == other.masks
    }
}

impl Eq for Board {}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in self.all_cells() {
            let mask = self.candidates(cell);
            if mask.is_single() {
                write!(f, "{}", mask.sole())?;
            } else {
                write!(f, ".")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn default_board() -> Board {
        Board::new(9, &[], Vec::new(), CancelFlag::new())
    }

    #[test]
    fn default_shape() {
        let board = default_board();
        assert_eq!(board.size(), 9);
        assert_eq!(board.cell_count(), 81);
        assert_eq!(board.candidate_count(), 729);
        assert_eq!(board.groups().len(), 27);
        // 8 same-cell + 8 row + 8 column + 4 extra box peers per candidate.
        assert_eq!(board.links().weak_count(), 28 * 729);
    }

    #[test]
    fn latin_square_shape() {
        let board = Board::new(4, &[0; 16], Vec::new(), CancelFlag::new());
        assert_eq!(board.groups().len(), 8);
        let cell = board.layout().cell(0, 0);
        assert_eq!(board.groups_for(cell).len(), 2);
    }

    #[test]
    fn commit_cascades_distinctness() {
        let mut board = default_board();
        let lay = board.layout();
        assert_eq!(board.set_value(lay.cell(0, 0), 5), LogicResult::Changed);

        assert!(board.is_committed(lay.cell(0, 0)));
        assert_eq!(board.value(lay.cell(0, 0)), 5);
        assert!(!board.candidates(lay.cell(0, 8)).has(5));
        assert!(!board.candidates(lay.cell(8, 0)).has(5));
        assert!(!board.candidates(lay.cell(2, 2)).has(5));
        assert!(board.candidates(lay.cell(3, 3)).has(5));
        assert_eq!(board.committed_count(), 1);
    }

    #[test]
    fn clearing_a_committed_digit_is_a_contradiction() {
        let mut board = default_board();
        let cell = board.layout().cell(4, 4);
        board.set_value(cell, 7);

        assert_eq!(
            board.clear_mask(cell, DigitMask::single(3)),
            LogicResult::None
        );
        assert_eq!(
            board.clear_mask(cell, DigitMask::single(7)),
            LogicResult::Invalid
        );
    }

    #[test]
    fn emptied_cell_is_invalid() {
        let mut board = default_board();
        let cell = board.layout().cell(0, 0);
        assert_eq!(
            board.clear_mask(cell, DigitMask::all(9).without(9)),
            LogicResult::Changed
        );
        assert_eq!(
            board.clear_mask(cell, DigitMask::single(9)),
            LogicResult::Invalid
        );
    }

    #[test]
    fn clones_share_fate() {
        let mut board = default_board();
        let lay = board.layout();
        let a = lay.cell(0, 0);
        let b = lay.cell(4, 4);

        let links = ConstraintLinks {
            clones: (1..=9).map(|d| (a.candidate(d), b.candidate(d))).collect(),
            ..ConstraintLinks::default()
        };
        board.install_links(&links).unwrap();

        // Elimination copies across the pair.
        assert_eq!(
            board.clear_mask(a, DigitMask::single(4)),
            LogicResult::Changed
        );
        assert!(!board.candidates(b).has(4));

        // Commit copies across the pair.
        assert_eq!(board.set_value(a, 6), LogicResult::Changed);
        assert!(board.is_committed(b));
        assert_eq!(board.value(b), 6);
    }

    #[test]
    fn link_graph_freezes_once_shared() {
        let mut board = default_board();
        let _clone = board.clone();
        let links = ConstraintLinks::default();
        assert!(board.install_links(&links).is_err());
    }

    #[test]
    fn cancellation_short_circuits_commits() {
        let cancel = CancelFlag::new();
        let mut board = Board::new(9, &[], Vec::new(), cancel.clone());
        cancel.cancel();
        assert_eq!(
            board.set_value(board.layout().cell(0, 0), 1),
            LogicResult::Cancelled
        );
    }
}
