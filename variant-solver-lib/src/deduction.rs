//! Human-readable deduction records and the append-only step trace.

use crate::candidate_id::CandidateId;
use crate::eliminations::Eliminations;

/// One logical step: what was deduced, which candidates drove it, and which
/// candidates it removed.
///
/// The record is immutable once built. Candidate lists use the dense
/// candidate indices; a pretty-printer can decode them with the usual
/// `(cell * size + digit - 1)` formula.
#[derive(Clone, Debug)]
pub struct Deduction {
    description: String,
    sources: Vec<CandidateId>,
    eliminated: Vec<CandidateId>,
}

impl Deduction {
    /// A bare description with no candidate bookkeeping.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            sources: Vec::new(),
            eliminated: Vec::new(),
        }
    }

    /// A description extended with the compact rendering of `elims`, which
    /// are also recorded as the eliminated candidates.
    pub fn from_elims(description: &str, elims: &Eliminations) -> Self {
        Self {
            description: format!("{} => {}", description, elims),
            sources: Vec::new(),
            eliminated: elims.iter().collect(),
        }
    }

    /// Attaches the source candidates that justify the step.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<CandidateId>) -> Self {
        self.sources = sources;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sources(&self) -> &[CandidateId] {
        &self.sources
    }

    pub fn eliminated(&self) -> &[CandidateId] {
        &self.eliminated
    }
}

impl From<String> for Deduction {
    fn from(description: String) -> Self {
        Deduction::new(description)
    }
}

impl From<&str> for Deduction {
    fn from(description: &str) -> Self {
        Deduction::new(description)
    }
}

impl std::fmt::Display for Deduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// Append-only list of deductions in commit order.
///
/// The trace is owned by the caller and passed by reference into the solve;
/// brute-force paths run without one so no description strings are built.
/// [`StepTrace::truncate`] exists so a caller can roll the trace back to a
/// checkpoint when an exploratory path is abandoned.
#[derive(Clone, Debug, Default)]
pub struct StepTrace {
    steps: Vec<Deduction>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(&mut self, step: Deduction) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Rolls back to a previously observed length.
    pub fn truncate(&mut self, len: usize) {
        self.steps.truncate(len);
    }

    pub fn steps(&self) -> &[Deduction] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deduction> {
        self.steps.iter()
    }
}

impl std::fmt::Display for StepTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn from_elims_records_candidates() {
        let lay = Layout::new(9);
        let mut elims = Eliminations::new();
        elims.add_cell_digit(lay.cell(0, 0), 3);
        elims.add_cell_digit(lay.cell(0, 1), 3);

        let step = Deduction::from_elims("Pointing pair", &elims)
            .with_sources(vec![lay.cell(1, 0).candidate(3)]);
        assert_eq!(step.to_string(), "Pointing pair => -3r1c12");
        assert_eq!(step.eliminated().len(), 2);
        assert_eq!(step.sources().len(), 1);
    }

    #[test]
    fn trace_rollback() {
        let mut trace = StepTrace::new();
        trace.push("step one".into());
        let mark = trace.len();
        trace.push("step two".into());
        trace.push("step three".into());
        trace.truncate(mark);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.to_string(), "step one");
    }
}
