use crate::{DEFAULT_CONDITION, DEFAULT_PRIORITY, Phase, Rule};

use super::grammar::{Segment, Tag};

/// Which body the next text fragment belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    None,
    Condition,
    Priority,
    Effect,
}

/// Why a finished block did not produce a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rejection {
    MissingType,
    UnknownType(String),
    EmptyEffect,
}

/// Accumulates one rule block between tags. Single pass, no backtracking:
/// the block closes on the effect close tag whatever state it is in.
#[derive(Debug, Default)]
pub(crate) struct BlockBuilder {
    mode: Mode,
    phase_value: Option<String>,
    condition: Vec<String>,
    priority: Vec<String>,
    effect: Vec<String>,
    suppresses_message: bool,
}

impl BlockBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one segment. Returns the outcome when the segment closes a block.
    pub(crate) fn feed(
        &mut self,
        segment: Segment<'_>,
        owner: u32,
    ) -> Option<Result<Rule, Rejection>> {
        match segment {
            Segment::Text(text) => {
                self.push_text(text);
                None
            }
            Segment::Tag(tag) => self.apply(tag, owner),
        }
    }

    fn push_text(&mut self, text: &str) {
        let fragment = text.trim();
        if fragment.is_empty() {
            return;
        }
        let body = match self.mode {
            Mode::None => return,
            Mode::Condition => &mut self.condition,
            Mode::Priority => &mut self.priority,
            Mode::Effect => &mut self.effect,
        };
        body.push(fragment.to_owned());
    }

    fn apply(&mut self, tag: Tag, owner: u32) -> Option<Result<Rule, Rejection>> {
        match tag {
            Tag::Type(value) => self.phase_value = Some(value),
            Tag::NoMessage => self.suppresses_message = true,
            Tag::OpenCondition => self.mode = Mode::Condition,
            Tag::OpenPriority => self.mode = Mode::Priority,
            Tag::OpenEffect => self.mode = Mode::Effect,
            Tag::CloseCondition | Tag::ClosePriority => self.mode = Mode::None,
            Tag::CloseEffect => return Some(std::mem::take(self).finish(owner)),
        }
        None
    }

    fn finish(self, owner: u32) -> Result<Rule, Rejection> {
        let value = self.phase_value.ok_or(Rejection::MissingType)?;
        let phase = Phase::from_tag_value(&value).ok_or(Rejection::UnknownType(value))?;
        if self.effect.is_empty() {
            return Err(Rejection::EmptyEffect);
        }

        let mut rule = Rule::new(phase, self.effect.join("\n"))
            .when(join_or(&self.condition, DEFAULT_CONDITION))
            .priority(join_or(&self.priority, DEFAULT_PRIORITY));
        if self.suppresses_message {
            rule = rule.no_message();
        }
        if phase.is_scoped() {
            rule = rule.owned_by(owner);
        }
        Ok(rule)
    }
}

fn join_or(lines: &[String], default: &str) -> String {
    if lines.is_empty() {
        default.to_owned()
    } else {
        lines.join("\n")
    }
}
