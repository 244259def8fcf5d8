//! A [`CustomUnifier`] that binds every variable of the head to `0`.

use trl_interpreter::{CustomUnifier, UnificationResult};
use trl_terms::{Substitution, Term};

/// Rescues every failed equation by binding each variable of its head
/// side to the number `0`. Useful for exercising the rescue path of the
/// unification engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroUnifier;

impl CustomUnifier for ZeroUnifier {
    fn unifiers(&self, head: &Term, _matched: &Term) -> Vec<UnificationResult> {
        let bindings: UnificationResult = head
            .variable_set()
            .into_iter()
            .map(|v| Substitution::new(v, Term::int(0)))
            .collect();
        vec![bindings]
    }
}
