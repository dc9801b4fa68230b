//! Phase-by-phase driver for the post-battle sequence.
//!
//! The host's battle-result flow calls into [`Aftermath`] at three points:
//! when the experience panel opens, when the loot panel opens, and when the
//! level-up panels are prepared. The coordinator selects and runs at most one
//! action per phase (per actor for level-ups) and records whether a blocking
//! message will appear, so the presentation layer can make room for it.

use std::collections::HashMap;

use crate::host::{Evaluator, Host};
use crate::layout::Layout;
use crate::rng::{RandomSource, SelectionRng};
use crate::{
    AftermathConfig, AftermathError, Phase, PhaseFlags, Rule, RuleRepository, WindowMetrics,
    execute, select,
};

/// Drives one battle's aftermath over a borrowed [`RuleRepository`].
///
/// # Example
///
/// ```
/// use aftermath::{
///     Aftermath, BattleRecord, Bindings, Entity, EvalError, Evaluator, EventRunner,
///     MessageWindow, Phase, RuleRepository, SelectionRng, Value,
/// };
///
/// struct Quiet;
/// impl BattleRecord for Quiet {
///     fn drops_have_tag(&self, _: &str) -> bool { false }
///     fn enemies_have_tag(&self, _: &str) -> bool { false }
/// }
/// impl EventRunner for Quiet {
///     fn run_event(&mut self, _: u32) {}
///     fn is_event_running(&self) -> bool { false }
/// }
/// impl MessageWindow for Quiet {
///     fn is_message_busy(&self) -> bool { false }
/// }
///
/// // Every body evaluates to `true`.
/// struct Always;
/// impl Evaluator for Always {
///     fn evaluate(&mut self, _: &str, _: &mut Bindings<'_>) -> Result<Value, EvalError> {
///         Ok(Value::Bool(true))
///     }
/// }
///
/// let harold = Entity::new(1, "<TYPE: exp>\n<EFFECT>\nsay('Well fought!')\n</EFFECT>");
/// let repository = RuleRepository::from_entities([&harold]);
///
/// let mut aftermath = Aftermath::new(&repository, Always, SelectionRng::new(7));
/// assert!(aftermath.enter_experience(&mut Quiet).unwrap());
/// assert!(aftermath.flags().shows_message(Phase::Experience));
/// ```
pub struct Aftermath<'r, E, R = SelectionRng> {
    repository: &'r RuleRepository,
    evaluator: E,
    rng: R,
    config: AftermathConfig,
    flags: PhaseFlags,
    pending: HashMap<u32, &'r Rule>,
    deferred_advance: bool,
}

impl<'r, E, R> Aftermath<'r, E, R>
where
    E: Evaluator,
    R: RandomSource,
{
    #[must_use]
    pub fn new(repository: &'r RuleRepository, evaluator: E, rng: R) -> Self {
        Self {
            repository,
            evaluator,
            rng,
            config: AftermathConfig::default(),
            flags: PhaseFlags::new(),
            pending: HashMap::new(),
            deferred_advance: false,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AftermathConfig) -> Self {
        self.config = config;
        self
    }

    /// Select and run the experience action. Returns whether one ran.
    ///
    /// # Errors
    ///
    /// Returns [`AftermathError::Eval`] if any body fails to evaluate.
    pub fn enter_experience(&mut self, host: &mut dyn Host) -> Result<bool, AftermathError> {
        self.enter(Phase::Experience, host)
    }

    /// Select and run the loot action. Returns whether one ran.
    ///
    /// # Errors
    ///
    /// Returns [`AftermathError::Eval`] if any body fails to evaluate.
    pub fn enter_loot(&mut self, host: &mut dyn Host) -> Result<bool, AftermathError> {
        self.enter(Phase::Loot, host)
    }

    fn enter(&mut self, phase: Phase, host: &mut dyn Host) -> Result<bool, AftermathError> {
        self.flags.clear(phase);
        let repository = self.repository;
        let Some(rule) = select(
            repository.rules(phase),
            None,
            &mut self.evaluator,
            host,
            &mut self.rng,
        )?
        else {
            return Ok(false);
        };
        self.flags.set(phase, rule.shows_message());
        execute(rule, &mut self.evaluator, host, &mut self.rng)?;
        Ok(true)
    }

    /// Choose a level-up action for each actor that leveled, without running
    /// it. Each chosen action runs later, once, from
    /// [`activate_actor`](Self::activate_actor).
    ///
    /// Replaces anything left pending from an earlier call. Returns the
    /// number of actors with a pending action.
    ///
    /// # Errors
    ///
    /// Returns [`AftermathError::Eval`] if a condition or priority body fails.
    pub fn prepare_level_up(
        &mut self,
        leveled: &[u32],
        host: &mut dyn Host,
    ) -> Result<usize, AftermathError> {
        self.pending.clear();
        self.flags.clear(Phase::LevelUp);
        let repository = self.repository;
        for &actor in leveled {
            let chosen = select(
                repository.rules(Phase::LevelUp),
                Some(actor),
                &mut self.evaluator,
                host,
                &mut self.rng,
            )?;
            if let Some(rule) = chosen {
                if rule.shows_message() {
                    self.flags.raise(Phase::LevelUp);
                }
                self.pending.insert(actor, rule);
            }
        }
        Ok(self.pending.len())
    }

    /// Run the pending level-up action of `actor`, if any, and forget it.
    /// Returns whether an action ran.
    ///
    /// # Errors
    ///
    /// Returns [`AftermathError::Eval`] if the effect body fails. The action
    /// is consumed either way.
    pub fn activate_actor(
        &mut self,
        actor: u32,
        host: &mut dyn Host,
    ) -> Result<bool, AftermathError> {
        let Some(rule) = self.pending.remove(&actor) else {
            return Ok(false);
        };
        execute(rule, &mut self.evaluator, host, &mut self.rng)?;
        Ok(true)
    }

    /// The pending level-up action of `actor`.
    #[must_use]
    pub fn pending_for(&self, actor: u32) -> Option<&'r Rule> {
        self.pending.get(&actor).copied()
    }

    /// Whether the aftermath may move to its next step.
    ///
    /// `triggered` is the host's own advance input. While a common event is
    /// running this is `false`, and the first check after the event ends is
    /// `true` whatever `triggered` says. Otherwise a busy dialog holds the
    /// sequence back.
    pub fn should_advance(&mut self, host: &dyn Host, triggered: bool) -> bool {
        if host.is_event_running() {
            self.deferred_advance = true;
            return false;
        }
        if self.deferred_advance {
            self.deferred_advance = false;
            return true;
        }
        if host.is_message_busy() {
            return false;
        }
        triggered
    }

    /// Whether an advance is owed from an event that was running.
    #[must_use]
    pub fn is_advance_deferred(&self) -> bool {
        self.deferred_advance
    }

    #[must_use]
    pub fn flags(&self) -> PhaseFlags {
        self.flags
    }

    #[must_use]
    pub fn config(&self) -> &AftermathConfig {
        &self.config
    }

    /// Layout decisions for the current flags.
    #[must_use]
    pub fn layout(&self, metrics: WindowMetrics) -> Layout<'_> {
        Layout::new(&self.config, metrics, self.flags)
    }

    /// Reset all per-battle state: flags, pending level-up actions, and any
    /// owed advance.
    pub fn end_battle(&mut self) {
        self.flags.clear_all();
        self.pending.clear();
        self.deferred_advance = false;
    }
}

/// Dialog input is ignored while the experience panel is still animating.
#[must_use]
pub fn gate_message_input(panel_ready: bool, triggered: bool) -> bool {
    panel_ready && triggered
}
