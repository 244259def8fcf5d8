//! Defines [`InterpreterConfig`], the search limits of the interpreter.

/// Limits on the combinatorial parts of a rewrite step.
///
/// AC-unification enumerates set partitions and term-product heads form
/// Cartesian products of candidates; both can grow without bound. `None`
/// means unbounded. When a limit truncates a search a warning is logged
/// and the truncated results are used as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpreterConfig {
    /// Maximum number of continuations explored by one unification.
    pub max_unification_branches: Option<usize>,
    /// Maximum number of candidates collected for one rule head slot in
    /// one step.
    pub max_candidates_per_slot: Option<usize>,
}

impl InterpreterConfig {
    /// Sets [`InterpreterConfig::max_unification_branches`].
    pub fn with_max_unification_branches(mut self, limit: usize) -> Self {
        self.max_unification_branches = Some(limit);
        self
    }

    /// Sets [`InterpreterConfig::max_candidates_per_slot`].
    pub fn with_max_candidates_per_slot(mut self, limit: usize) -> Self {
        self.max_candidates_per_slot = Some(limit);
        self
    }
}
