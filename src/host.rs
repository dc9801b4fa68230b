//! Interfaces to the host game and the binding context handed to its
//! evaluator.
//!
//! The crate never runs condition, priority, or effect bodies itself. It
//! passes them to an [`Evaluator`] together with [`Bindings`], which expose
//! the helper queries bodies may call.

use crate::parse::expand_ids;
use crate::rng::RandomSource;
use crate::{EvalError, IdListError, Value};

/// Read-only view of the battle that just ended.
pub trait BattleRecord {
    /// Whether any reward item carries the annotation tag `tag`.
    fn drops_have_tag(&self, tag: &str) -> bool;

    /// Whether any enemy in the troop carries the annotation tag `tag`.
    fn enemies_have_tag(&self, tag: &str) -> bool;
}

/// The host's runner for scripted common events.
pub trait EventRunner {
    /// Start the common event with the given id.
    fn run_event(&mut self, event_id: u32);

    /// Whether a common event is still running.
    fn is_event_running(&self) -> bool;
}

/// The host's blocking dialog box.
pub trait MessageWindow {
    /// Whether a message is pending or still on screen.
    fn is_message_busy(&self) -> bool;
}

/// Everything the aftermath sequence needs from the host.
///
/// Implemented automatically for any type providing the three parts.
pub trait Host: BattleRecord + EventRunner + MessageWindow {}

impl<T: BattleRecord + EventRunner + MessageWindow + ?Sized> Host for T {}

/// Runs designer-authored bodies.
///
/// Errors are returned unchanged to the caller of the coordinator: a body
/// that fails is a content bug, not something to paper over.
pub trait Evaluator {
    fn evaluate(&mut self, body: &str, bindings: &mut Bindings<'_>) -> Result<Value, EvalError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &mut E {
    fn evaluate(&mut self, body: &str, bindings: &mut Bindings<'_>) -> Result<Value, EvalError> {
        (**self).evaluate(body, bindings)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&mut self, body: &str, bindings: &mut Bindings<'_>) -> Result<Value, EvalError> {
        (**self).evaluate(body, bindings)
    }
}

/// Helper functions available to bodies while they are evaluated.
pub struct Bindings<'s> {
    host: &'s mut dyn Host,
    rng: &'s mut dyn RandomSource,
}

impl<'s> Bindings<'s> {
    pub fn new(host: &'s mut dyn Host, rng: &'s mut dyn RandomSource) -> Self {
        Self { host, rng }
    }

    /// Whether any reward item of this battle carries `tag`.
    #[must_use]
    pub fn drops_have_tag(&self, tag: &str) -> bool {
        self.host.drops_have_tag(tag)
    }

    /// Whether any enemy of this battle carries `tag`.
    #[must_use]
    pub fn enemies_have_tag(&self, tag: &str) -> bool {
        self.host.enemies_have_tag(tag)
    }

    /// Start one common event chosen uniformly from an id list such as
    /// `"1-3, 7"`, and return the chosen id.
    ///
    /// # Errors
    ///
    /// Returns [`IdListError`] when the list is malformed, empty, or too large.
    pub fn run_common_event(&mut self, list: &str) -> Result<u32, IdListError> {
        let ids = expand_ids(list)?;
        let event_id = self
            .rng
            .choose(&ids)
            .copied()
            .ok_or_else(|| IdListError::Empty {
                input: list.to_owned(),
            })?;
        tracing::info!(event_id, candidates = ids.len(), "starting aftermath common event");
        self.host.run_event(event_id);
        Ok(event_id)
    }

    /// Whether a common event started by a body is still running.
    #[must_use]
    pub fn is_event_running(&self) -> bool {
        self.host.is_event_running()
    }
}
