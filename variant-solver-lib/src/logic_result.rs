//! The result taxonomy shared by every board mutator and deduction.

/// Outcome of a mutation or deduction attempt.
///
/// - `None`: the board is unchanged.
/// - `Changed`: at least one candidate was removed or committed.
/// - `Invalid`: the board is unsatisfiable on this path.
/// - `PuzzleComplete`: reserved for the search top level; mutators and
///   tactics never return it.
/// - `Cancelled`: an external cancel flag stopped the work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicResult {
    None,
    Changed,
    Invalid,
    PuzzleComplete,
    Cancelled,
}

impl LogicResult {
    pub fn is_none(self) -> bool {
        self == LogicResult::None
    }

    pub fn is_changed(self) -> bool {
        self == LogicResult::Changed
    }

    pub fn is_invalid(self) -> bool {
        self == LogicResult::Invalid
    }

    pub fn is_cancelled(self) -> bool {
        self == LogicResult::Cancelled
    }

    /// True for `Invalid` and `Cancelled`: the current pass must stop.
    pub fn is_terminal(self) -> bool {
        matches!(self, LogicResult::Invalid | LogicResult::Cancelled)
    }

    /// Folds two results together: terminal outcomes win, then
    /// `PuzzleComplete`, then `Changed`.
    #[must_use]
    pub fn combine(self, other: LogicResult) -> LogicResult {
        use LogicResult::*;
        match (self, other) {
            (Cancelled, _) | (_, Cancelled) => Cancelled,
            (Invalid, _) | (_, Invalid) => Invalid,
            (PuzzleComplete, _) | (_, PuzzleComplete) => PuzzleComplete,
            (Changed, _) | (_, Changed) => Changed,
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combine_prefers_the_stronger_outcome() {
        use LogicResult::*;
        assert_eq!(None.combine(Changed), Changed);
        assert_eq!(Changed.combine(None), Changed);
        assert_eq!(Changed.combine(Invalid), Invalid);
        assert_eq!(Invalid.combine(Cancelled), Cancelled);
        assert_eq!(PuzzleComplete.combine(Changed), PuzzleComplete);
        assert_eq!(None.combine(None), None);
    }
}
