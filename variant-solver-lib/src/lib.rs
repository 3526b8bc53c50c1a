//! Solver kernel for Sudoku variants.
//!
//! The kernel is built around a candidate [`board::Board`]: a dense grid of
//! [`digit_mask::DigitMask`] cells, mutated only through a small set of
//! primitives that report a [`logic_result::LogicResult`]. Committing a digit
//! runs the full propagation protocol (distinctness groups, constraint
//! `enforce` hooks, weak links, clone copies), so the board is always in a
//! consistent state or flagged `Invalid`.
//!
//! Variant rules plug in through the [`constraint::Constraint`] trait and
//! cooperate with the kernel by declaring candidate links into the
//! [`link_graph::LinkGraph`]. Elementary deductions (singles, locked
//! candidates, tuples, chains over the link graph) are implementations of
//! the [`tactic::Tactic`] trait and can be re-ordered or replaced by the
//! consumer.
//!
//! [`solver::Solver`] ties everything together: build one with
//! [`solver::builder::SolverBuilder`], then ask for any solution, the unique
//! solution, a capped solution count, or a pure logical solve with a
//! human-readable [`deduction::StepTrace`].

pub mod board;
pub mod candidate_id;
pub mod candidate_set;
pub mod cell_id;
pub mod cell_parse;
pub mod constraint;
pub mod deduction;
pub mod digit_mask;
pub mod eliminations;
pub mod group;
pub mod layout;
pub mod link_graph;
pub mod logic_result;
pub mod prelude;
pub mod registry;
pub mod solver;
pub mod tactic;
