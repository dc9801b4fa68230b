use crate::host::{Bindings, Evaluator, Host};
use crate::rng::RandomSource;
use crate::{AftermathError, Rule, Stage};

/// Pick at most one applicable rule.
///
/// A rule is a candidate when it is in `scope` (see [`Rule::in_scope`]) and
/// its condition body evaluates truthy. Candidates are ranked by their
/// priority body coerced to an integer; rules tied at the highest priority
/// are drawn from uniformly with `rng`. A candidate whose priority cannot be
/// read as an integer is left out.
///
/// Returns `Ok(None)` when nothing applies.
///
/// # Errors
///
/// Returns [`AftermathError::Eval`] as soon as a condition or priority body
/// fails to evaluate.
pub fn select<'r, E>(
    rules: &'r [Rule],
    scope: Option<u32>,
    evaluator: &mut E,
    host: &mut dyn Host,
    rng: &mut dyn RandomSource,
) -> Result<Option<&'r Rule>, AftermathError>
where
    E: Evaluator + ?Sized,
{
    let mut candidates = Vec::new();
    for rule in rules.iter().filter(|r| r.in_scope(scope)) {
        let mut bindings = Bindings::new(&mut *host, &mut *rng);
        let passed = evaluator
            .evaluate(rule.condition(), &mut bindings)
            .map_err(|e| AftermathError::eval(rule.phase(), Stage::Condition, e))?;
        if passed.is_truthy() {
            candidates.push(rule);
        }
    }

    let mut best: Option<i64> = None;
    let mut tied: Vec<&'r Rule> = Vec::new();
    for rule in candidates {
        let mut bindings = Bindings::new(&mut *host, &mut *rng);
        let value = evaluator
            .evaluate(rule.priority_body(), &mut bindings)
            .map_err(|e| AftermathError::eval(rule.phase(), Stage::Priority, e))?;
        let Some(priority) = value.as_priority() else {
            tracing::warn!(
                phase = %rule.phase(),
                %value,
                "aftermath action priority is not an integer; skipping"
            );
            continue;
        };
        match best {
            Some(current) if priority < current => {}
            Some(current) if priority == current => tied.push(rule),
            _ => {
                best = Some(priority);
                tied.clear();
                tied.push(rule);
            }
        }
    }

    let Some(&chosen) = rng.choose(&tied) else {
        return Ok(None);
    };
    tracing::debug!(
        phase = %chosen.phase(),
        priority = best,
        tied = tied.len(),
        "selected aftermath action"
    );
    Ok(Some(chosen))
}
