use std::fmt;

use super::entity::Annotated;
use super::phase::Phase;
use super::rule::Rule;

/// Parsed rules partitioned by phase, each partition in discovery order.
///
/// Built once from the host's annotated records and read-only afterwards.
///
/// # Example
///
/// ```
/// use aftermath::{Entity, Phase, RuleRepository};
///
/// let harold = Entity::new(1, "<TYPE: exp>\n<EFFECT>\ncheer()\n</EFFECT>");
/// let repository = RuleRepository::from_entities([&harold]);
///
/// assert_eq!(repository.rules(Phase::Experience).len(), 1);
/// assert!(repository.rules(Phase::Loot).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRepository {
    pub(crate) experience: Vec<Rule>,
    pub(crate) loot: Vec<Rule>,
    pub(crate) level_up: Vec<Rule>,
}

impl RuleRepository {
    /// An empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every record's note in iteration order and collect the valid rules.
    ///
    /// Malformed blocks are dropped without error.
    #[must_use]
    pub fn from_entities<I>(entities: I) -> Self
    where
        I: IntoIterator,
        I::Item: Annotated,
    {
        let mut repository = Self::new();
        for entity in entities {
            for rule in crate::parse::parse_note(entity.id(), entity.note()) {
                repository.push(rule);
            }
        }
        tracing::debug!(
            experience = repository.experience.len(),
            loot = repository.loot.len(),
            level_up = repository.level_up.len(),
            "built aftermath rule repository"
        );
        repository
    }

    pub(crate) fn push(&mut self, rule: Rule) {
        self.partition_mut(rule.phase()).push(rule);
    }

    /// The rules of one phase, in discovery order.
    #[must_use]
    pub fn rules(&self, phase: Phase) -> &[Rule] {
        match phase {
            Phase::Experience => &self.experience,
            Phase::Loot => &self.loot,
            Phase::LevelUp => &self.level_up,
        }
    }

    fn partition_mut(&mut self, phase: Phase) -> &mut Vec<Rule> {
        match phase {
            Phase::Experience => &mut self.experience,
            Phase::Loot => &mut self.loot,
            Phase::LevelUp => &mut self.level_up,
        }
    }

    /// Every rule, phase by phase.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        Phase::ALL.into_iter().flat_map(|phase| self.rules(phase))
    }

    /// Total number of rules across all phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experience.len() + self.loot.len() + self.level_up.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for RuleRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleRepository({} experience, {} loot, {} level-up)",
            self.experience.len(),
            self.loot.len(),
            self.level_up.len(),
        )
    }
}

/// Process-lifetime owner of the [`RuleRepository`].
///
/// Hosts poll [`check_loaded`](Self::check_loaded) from their own
/// "is the database loaded" check. The first ready poll parses the notes;
/// every later poll is a no-op until [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub struct RuleLibrary {
    repository: Option<RuleRepository>,
}

impl RuleLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` while the host data is not ready. Once it is, builds
    /// the repository on the first call only and returns `true`.
    ///
    /// `entities` is not iterated when the repository already exists.
    pub fn check_loaded<I>(&mut self, database_ready: bool, entities: I) -> bool
    where
        I: IntoIterator,
        I::Item: Annotated,
    {
        if !database_ready {
            return false;
        }
        self.ensure_loaded(entities);
        true
    }

    /// Build the repository if it does not exist yet, and return it.
    pub fn ensure_loaded<I>(&mut self, entities: I) -> &RuleRepository
    where
        I: IntoIterator,
        I::Item: Annotated,
    {
        self.repository
            .get_or_insert_with(|| RuleRepository::from_entities(entities))
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.repository.is_some()
    }

    #[must_use]
    pub fn repository(&self) -> Option<&RuleRepository> {
        self.repository.as_ref()
    }

    /// Drop the repository so the next check rebuilds it.
    pub fn invalidate(&mut self) {
        self.repository = None;
    }
}
