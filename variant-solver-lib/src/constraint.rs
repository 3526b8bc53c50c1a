//! The contract every variant rule implements to cooperate with the kernel.

use crate::board::Board;
use crate::candidate_id::CandidateId;
use crate::cell_id::CellId;
use crate::deduction::StepTrace;
use crate::digit_mask::DigitMask;
use crate::group::Group;
use crate::layout::Layout;
use crate::logic_result::LogicResult;
use std::sync::Arc;

/// Links a constraint declares into the link graph during initialization.
///
/// A weak pair of a candidate with itself marks that candidate as never
/// possible; the kernel turns it into an immediate elimination.
#[derive(Clone, Debug, Default)]
pub struct ConstraintLinks {
    pub weak: Vec<(CandidateId, CandidateId)>,
    pub strong: Vec<(CandidateId, CandidateId)>,
    pub clones: Vec<(CandidateId, CandidateId)>,
}

impl ConstraintLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.weak.is_empty() && self.strong.is_empty() && self.clones.is_empty()
    }
}

/// Weak links that make a set of cells pairwise distinct. The usual way for
/// a constraint to declare a no-repeat region without writing any logic.
pub fn nonrepeat_weak_links(cells: &[CellId], size: usize) -> Vec<(CandidateId, CandidateId)> {
    Layout::new(size).same_digit_pairs(cells)
}

/// A variant rule. Every method has a no-op default, so a constraint only
/// implements the capabilities it actually has; the kernel treats a
/// zero-cell constraint as the identity everywhere.
///
/// The kernel guarantees [`Constraint::enforce`] is called exactly once per
/// assignment, after row/column/region distinctness has been propagated.
pub trait Constraint {
    /// Generic rule name, independent of how the instance was configured,
    /// e.g. "Killer Cage". Used for registry lookups by kind.
    fn name(&self) -> &str;

    /// Instance name for step descriptions, e.g. "Killer Cage at r1c1".
    fn specific_name(&self) -> String {
        self.name().to_owned()
    }

    /// The cells this constraint touches. The propagator uses this to decide
    /// which constraints to call on a commit; an empty list means the
    /// constraint is global (or pure links) and is never enforced directly.
    fn cells(&self) -> &[CellId] {
        &[]
    }

    /// Removes candidates that are impossible from the outset. Called in a
    /// fixed-point loop with every other constraint until all return
    /// [`LogicResult::None`], so reacting to other constraints' trims is
    /// fine.
    fn init_candidates(&self, _board: &mut Board) -> LogicResult {
        LogicResult::None
    }

    /// Called after `cell` was committed to `digit`, once distinctness has
    /// cascaded. Must apply the direct consequences the rule implies and
    /// return `Invalid` iff the assignment breaks the rule.
    fn enforce(&self, _board: &mut Board, _cell: CellId, _digit: usize) -> LogicResult {
        LogicResult::None
    }

    /// A constraint whose whole behavior is captured by its declared links
    /// can return true to skip the `enforce` callback entirely.
    fn enforced_by_links(&self) -> bool {
        false
    }

    /// Performs at most one non-trivial deduction. A batch of related
    /// eliminations may be folded into a single step, but `Changed` must be
    /// returned as soon as any cell narrows. A description is written to the
    /// trace only when returning `Changed` or `Invalid`, never on `None`.
    fn step_logic(
        &self,
        _board: &mut Board,
        _trace: Option<&mut StepTrace>,
        _brute_forcing: bool,
    ) -> LogicResult {
        LogicResult::None
    }

    /// Links this constraint wants in the link graph. Called with
    /// `initializing = true` once during finalization; later calls are an
    /// opportunistic refresh and may return additional links or nothing.
    fn init_links(&self, _board: &Board, _initializing: bool) -> ConstraintLinks {
        ConstraintLinks::new()
    }

    /// Cells that may not share any digit with `cell` under this rule,
    /// beyond row/column/region.
    fn seen_cells(&self, _cell: CellId) -> Vec<CellId> {
        Vec::new()
    }

    /// Like [`Constraint::seen_cells`] but restricted to the given digits.
    /// The default ignores the mask.
    fn seen_cells_for_digits(&self, cell: CellId, digits: DigitMask) -> Vec<CellId> {
        if digits.is_empty() {
            Vec::new()
        } else {
            self.seen_cells(cell)
        }
    }

    /// Distinctness groups this constraint establishes, if any. A group of
    /// exactly N cells participates in hidden singles and tuples.
    fn groups(&self, _size: usize) -> Vec<Group> {
        Vec::new()
    }

    /// Cells at least one of which must hold `digit`, or empty when the rule
    /// forces nothing for that digit.
    fn cells_must_contain(&self, _board: &Board, _digit: usize) -> Vec<CellId> {
        Vec::new()
    }

    /// Decomposes into smaller equivalent constraints, e.g. a thermometer
    /// into its adjacent pairs. The initializer uses the primitives'
    /// signatures to detect and skip subsumed constraints.
    fn split_to_primitives(&self) -> Vec<Arc<dyn Constraint>> {
        Vec::new()
    }

    /// A stable identity string: rule kind plus parameters plus cells.
    /// Two constraints with equal signatures are interchangeable, across
    /// process runs as well.
    fn signature(&self) -> String;
}

impl std::fmt::Debug for dyn Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Constraint({})", self.specific_name())
    }
}
