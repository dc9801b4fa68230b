//! Panel geometry derived from the phase flags.
//!
//! When a phase's action will open a dialog, the panel for that phase gives
//! up the dialog box's height so the two do not overlap.

use crate::{AftermathConfig, Phase, PhaseFlags, WindowMetrics};

/// How the experience panel arranges the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpStyle {
    /// The host's default layout.
    Standard,
    /// One column per party member, laid out side by side.
    Compact { columns: usize },
}

/// Layout decisions for one battle's aftermath.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    config: &'a AftermathConfig,
    metrics: WindowMetrics,
    flags: PhaseFlags,
}

impl<'a> Layout<'a> {
    #[must_use]
    pub fn new(config: &'a AftermathConfig, metrics: WindowMetrics, flags: PhaseFlags) -> Self {
        Self {
            config,
            metrics,
            flags,
        }
    }

    /// Compact when configured to always be, or when a message will show
    /// during the experience phase.
    #[must_use]
    pub fn exp_style(&self, party_size: usize) -> ExpStyle {
        if self.config.always_compact_exp || self.flags.shows_message(Phase::Experience) {
            ExpStyle::Compact {
                columns: party_size.max(1),
            }
        } else {
            ExpStyle::Standard
        }
    }

    /// Height of the experience panel, given the host's default height.
    #[must_use]
    pub fn exp_height(&self, default_height: u32) -> u32 {
        self.below_title(Phase::Experience, default_height)
    }

    /// Height of the level-up panel, given the host's default height.
    #[must_use]
    pub fn level_up_height(&self, default_height: u32) -> u32 {
        self.below_title(Phase::LevelUp, default_height)
    }

    /// Height of the loot panel: the default less the dialog box when a
    /// message will show.
    #[must_use]
    pub fn loot_height(&self, default_height: u32) -> u32 {
        if self.flags.shows_message(Phase::Loot) {
            default_height.saturating_sub(self.metrics.message_height)
        } else {
            default_height
        }
    }

    #[must_use]
    pub fn exp_label(&self) -> &'a str {
        &self.config.exp_label
    }

    fn below_title(&self, phase: Phase, default_height: u32) -> u32 {
        if self.flags.shows_message(phase) {
            self.metrics
                .box_height
                .saturating_sub(self.metrics.title_height)
                .saturating_sub(self.metrics.message_height)
        } else {
            default_height
        }
    }
}
