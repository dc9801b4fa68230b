use super::phase::Phase;

/// Per-phase "a blocking message will show" signals.
///
/// Raised by the coordinator when a phase is entered and read by the
/// presentation layer to reserve room for the dialog box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseFlags {
    experience: bool,
    loot: bool,
    level_up: bool,
}

impl PhaseFlags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shows_message(&self, phase: Phase) -> bool {
        match phase {
            Phase::Experience => self.experience,
            Phase::Loot => self.loot,
            Phase::LevelUp => self.level_up,
        }
    }

    pub(crate) fn set(&mut self, phase: Phase, value: bool) {
        *self.slot(phase) = value;
    }

    pub(crate) fn raise(&mut self, phase: Phase) {
        *self.slot(phase) = true;
    }

    /// Lower one phase's flag.
    pub fn clear(&mut self, phase: Phase) {
        *self.slot(phase) = false;
    }

    /// Lower every flag.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    fn slot(&mut self, phase: Phase) -> &mut bool {
        match phase {
            Phase::Experience => &mut self.experience,
            Phase::Loot => &mut self.loot,
            Phase::LevelUp => &mut self.level_up,
        }
    }
}
