use std::collections::HashSet;

use winnow::ascii::{dec_uint, space0};
use winnow::combinator::{alt, delimited, eof, opt, preceded, repeat, terminated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

use crate::IdListError;

/// Upper bound on the number of distinct ids a list may expand to.
pub const MAX_EXPANDED_IDS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Single(u32),
    Range(u32, u32),
}

fn separator(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c == ',' || c.is_whitespace())
        .void()
        .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<u32> {
    dec_uint.parse_next(input)
}

fn item(input: &mut &str) -> ModalResult<Item> {
    (number, opt(preceded((space0, '-', space0), number)))
        .map(|(start, end)| match end {
            Some(end) => Item::Range(start, end),
            None => Item::Single(start),
        })
        .parse_next(input)
}

fn items(input: &mut &str) -> ModalResult<Vec<Item>> {
    delimited(
        opt(separator),
        repeat(0.., terminated(item, alt((separator, eof.void())))),
        eof,
    )
    .parse_next(input)
}

/// Expand an id list such as `"1-3, 7"` into `[1, 2, 3, 7]`.
///
/// Items are separated by commas and/or whitespace. `a-b` is an inclusive
/// range; a reversed range contributes nothing. Duplicates are collapsed,
/// keeping the first occurrence.
///
/// # Errors
///
/// Returns [`IdListError::Malformed`] for anything that is not a number or a
/// range, [`IdListError::Empty`] when nothing remains after expansion, and
/// [`IdListError::TooLarge`] when more than [`MAX_EXPANDED_IDS`] distinct ids
/// would be produced.
pub fn expand_ids(input: &str) -> Result<Vec<u32>, IdListError> {
    let parsed = items.parse(input).map_err(|e| IdListError::Malformed {
        input: input.to_owned(),
        offset: e.offset(),
    })?;
    let too_large = || IdListError::TooLarge {
        input: input.to_owned(),
        limit: MAX_EXPANDED_IDS,
    };

    let mut ids: Vec<u32> = Vec::new();
    let mut seen: HashSet<u32> = HashSet::new();
    for item in parsed {
        let (start, end) = match item {
            Item::Single(id) => (id, id),
            Item::Range(start, end) => (start, end),
        };
        // Reject an oversized range before walking it.
        let span = usize::try_from(end.saturating_sub(start)).unwrap_or(usize::MAX);
        if span >= MAX_EXPANDED_IDS {
            return Err(too_large());
        }
        for id in start..=end {
            if seen.insert(id) {
                ids.push(id);
                if ids.len() > MAX_EXPANDED_IDS {
                    return Err(too_large());
                }
            }
        }
    }

    if ids.is_empty() {
        return Err(IdListError::Empty {
            input: input.to_owned(),
        });
    }
    Ok(ids)
}
