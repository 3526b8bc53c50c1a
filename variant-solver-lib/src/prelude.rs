//! Convenience re-exports of the types needed by nearly every consumer.

pub use crate::board::{Board, BoardCore};
pub use crate::candidate_id::CandidateId;
pub use crate::candidate_set::CandidateSet;
pub use crate::cell_id::CellId;
pub use crate::constraint::{nonrepeat_weak_links, Constraint, ConstraintLinks};
pub use crate::deduction::{Deduction, StepTrace};
pub use crate::digit_mask::DigitMask;
pub use crate::eliminations::Eliminations;
pub use crate::group::{Group, GroupKind};
pub use crate::layout::{standard_boxes, Layout};
pub use crate::link_graph::LinkGraph;
pub use crate::logic_result::LogicResult;
pub use crate::registry::{ConstraintFactory, ConstraintRegistry, FactoryRegistry};
pub use crate::solver::builder::SolverBuilder;
pub use crate::solver::cancel::CancelFlag;
pub use crate::solver::outcomes::{CountOutcome, LogicalOutcome, SolveOutcome, UniquenessOutcome};
pub use crate::solver::sink::{CollectSink, CountSink, FirstSink, SolutionSink};
pub use crate::solver::Solver;
pub use crate::tactic::Tactic;
