use super::phase::Phase;

/// Condition body used when a block declares none.
pub const DEFAULT_CONDITION: &str = "true";

/// Priority body used when a block declares none.
pub const DEFAULT_PRIORITY: &str = "0";

/// A designer-authored aftermath action: when `condition` holds, `effect`
/// may run during `phase`, competing with other candidates by `priority`.
///
/// Rules are immutable once built. The bodies are opaque text handed to the
/// host [`Evaluator`](crate::Evaluator); this crate never interprets them.
///
/// # Example
///
/// ```
/// use aftermath::{Phase, Rule};
///
/// let rule = Rule::new(Phase::LevelUp, "show_message('Harold grows stronger!')")
///     .when("switch(4)")
///     .priority("2")
///     .owned_by(3);
///
/// assert_eq!(rule.condition(), "switch(4)");
/// assert_eq!(rule.owner(), Some(3));
/// assert!(!rule.suppresses_message());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    phase: Phase,
    condition: String,
    priority: String,
    effect: String,
    suppresses_message: bool,
    owner: Option<u32>,
}

impl Rule {
    /// Start a rule with the default condition (`"true"`) and priority (`"0"`).
    #[must_use]
    pub fn new(phase: Phase, effect: impl Into<String>) -> Self {
        Self {
            phase,
            condition: DEFAULT_CONDITION.to_owned(),
            priority: DEFAULT_PRIORITY.to_owned(),
            effect: effect.into(),
            suppresses_message: false,
            owner: None,
        }
    }

    /// Set the condition body.
    #[must_use]
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    /// Set the priority body.
    #[must_use]
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Mark the rule as not opening a dialog when it fires.
    #[must_use]
    pub fn no_message(mut self) -> Self {
        self.suppresses_message = true;
        self
    }

    /// Scope the rule to one entity. An id of `0` leaves it unscoped.
    #[must_use]
    pub fn owned_by(mut self, owner: u32) -> Self {
        self.owner = (owner != 0).then_some(owner);
        self
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    #[must_use]
    pub fn priority_body(&self) -> &str {
        &self.priority
    }

    #[must_use]
    pub fn effect(&self) -> &str {
        &self.effect
    }

    /// `false` means firing this rule is expected to show a blocking message.
    #[must_use]
    pub fn suppresses_message(&self) -> bool {
        self.suppresses_message
    }

    /// Whether firing this rule is expected to show a blocking message.
    #[must_use]
    pub fn shows_message(&self) -> bool {
        !self.suppresses_message
    }

    /// The entity this rule is scoped to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<u32> {
        self.owner
    }

    /// Whether this rule applies under the given scope.
    ///
    /// No scope (or scope `0`) admits every rule; otherwise only rules owned
    /// by exactly that entity are admitted.
    #[must_use]
    pub fn in_scope(&self, scope: Option<u32>) -> bool {
        match scope {
            None | Some(0) => true,
            Some(id) => self.owner == Some(id),
        }
    }
}
