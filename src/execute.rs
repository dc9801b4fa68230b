use crate::host::{Bindings, Evaluator, Host};
use crate::rng::RandomSource;
use crate::{AftermathError, Rule, Stage};

/// Run a rule's effect body for its side effects. The result value is
/// discarded.
///
/// # Errors
///
/// Returns [`AftermathError::Eval`] when the effect body fails.
pub fn execute<E>(
    rule: &Rule,
    evaluator: &mut E,
    host: &mut dyn Host,
    rng: &mut dyn RandomSource,
) -> Result<(), AftermathError>
where
    E: Evaluator + ?Sized,
{
    let mut bindings = Bindings::new(host, rng);
    evaluator
        .evaluate(rule.effect(), &mut bindings)
        .map_err(|e| AftermathError::eval(rule.phase(), Stage::Effect, e))?;
    tracing::debug!(phase = %rule.phase(), owner = rule.owner(), "executed aftermath action");
    Ok(())
}
