mod block;
mod grammar;
mod id_list;

pub use id_list::{MAX_EXPANDED_IDS, expand_ids};

use crate::Rule;

use block::BlockBuilder;

/// Extract every valid rule from one entity's annotation text.
///
/// The text is scanned line by line. A block ends at its effect close tag;
/// a block left open when the text ends is discarded, as is any finished
/// block without a recognized type or with an empty effect. Level-up rules
/// are scoped to `owner`.
///
/// # Example
///
/// ```
/// use aftermath::{parse_note, Phase};
///
/// let rules = parse_note(3, "\
/// <VICTORY ACTION TYPE: level>
/// <VICTORY ACTION EFFECT>
/// showMessage('Another level!');
/// </VICTORY ACTION EFFECT>");
///
/// assert_eq!(rules.len(), 1);
/// assert_eq!(rules[0].phase(), Phase::LevelUp);
/// assert_eq!(rules[0].owner(), Some(3));
/// ```
#[must_use]
pub fn parse_note(owner: u32, text: &str) -> Vec<Rule> {
    let mut builder = BlockBuilder::new();
    let mut rules = Vec::new();

    for line in text.lines() {
        for segment in grammar::segments(line) {
            match builder.feed(segment, owner) {
                Some(Ok(rule)) => rules.push(rule),
                Some(Err(reason)) => {
                    tracing::debug!(entity = owner, ?reason, "dropped aftermath action block");
                }
                None => {}
            }
        }
    }
    rules
}
