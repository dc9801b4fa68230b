use winnow::ascii::{Caseless, space0, space1};
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::error::{ContextError, ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{literal, take_till};

/// A recognized annotation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Tag {
    /// `<TYPE: value>`, value trimmed and lowercased.
    Type(String),
    OpenCondition,
    CloseCondition,
    OpenPriority,
    ClosePriority,
    OpenEffect,
    CloseEffect,
    NoMessage,
}

/// One piece of an annotation line: free text or a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Tag(Tag),
}

// -- Tags -------------------------------------------------------------------

fn keyword<'i>(word: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    literal(Caseless(word))
}

/// The optional `VICTORY ACTION` namespace in front of every tag name.
fn namespace(input: &mut &str) -> ModalResult<()> {
    (keyword("victory"), space1, keyword("action"), space1)
        .void()
        .parse_next(input)
}

fn type_tag(input: &mut &str) -> ModalResult<Tag> {
    preceded((keyword("type"), space0, ':'), take_till(0.., '>'))
        .map(|value: &str| Tag::Type(value.trim().to_ascii_lowercase()))
        .parse_next(input)
}

fn opening(input: &mut &str) -> ModalResult<Tag> {
    alt((
        keyword("condition").value(Tag::OpenCondition),
        keyword("priority").value(Tag::OpenPriority),
        keyword("effect").value(Tag::OpenEffect),
        (keyword("no"), space1, keyword("message")).value(Tag::NoMessage),
        type_tag,
    ))
    .parse_next(input)
}

fn closing(input: &mut &str) -> ModalResult<Tag> {
    alt((
        keyword("condition").value(Tag::CloseCondition),
        keyword("priority").value(Tag::ClosePriority),
        keyword("effect").value(Tag::CloseEffect),
    ))
    .parse_next(input)
}

pub(crate) fn tag(input: &mut &str) -> ModalResult<Tag> {
    alt((
        delimited(('<', space0, '/', space0, opt(namespace)), closing, (space0, '>')),
        delimited(('<', space0, opt(namespace)), opening, (space0, '>')),
    ))
    .parse_next(input)
}

// -- Lines ------------------------------------------------------------------

/// Split one line into text and tag segments.
///
/// Anything starting with `<` that is not one of our tags (another plugin's
/// `<IsPotion:1>`, a comparison in a script body) stays text.
pub(crate) fn segments(line: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;
    let mut text_from = 0;

    while let Some(offset) = line[cursor..].find('<') {
        let at = cursor + offset;
        let mut rest = &line[at..];
        match tag.parse_next(&mut rest) {
            Ok(tag) => {
                if at > text_from {
                    out.push(Segment::Text(&line[text_from..at]));
                }
                out.push(Segment::Tag(tag));
                cursor = line.len() - rest.len();
                text_from = cursor;
            }
            Err(_) => cursor = at + 1,
        }
    }
    if text_from < line.len() {
        out.push(Segment::Text(&line[text_from..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_tag(input: &str) -> Option<Tag> {
        tag.parse(input).ok()
    }

    #[test]
    fn full_namespace_tags() {
        assert_eq!(
            parse_tag("<VICTORY ACTION CONDITION>"),
            Some(Tag::OpenCondition)
        );
        assert_eq!(
            parse_tag("</VICTORY ACTION EFFECT>"),
            Some(Tag::CloseEffect)
        );
        assert_eq!(
            parse_tag("<VICTORY ACTION NO MESSAGE>"),
            Some(Tag::NoMessage)
        );
    }

    #[test]
    fn short_tags() {
        assert_eq!(parse_tag("<PRIORITY>"), Some(Tag::OpenPriority));
        assert_eq!(parse_tag("</PRIORITY>"), Some(Tag::ClosePriority));
        assert_eq!(parse_tag("<no message>"), Some(Tag::NoMessage));
    }

    #[test]
    fn tags_are_case_insensitive() {
        assert_eq!(
            parse_tag("<Victory Action Effect>"),
            Some(Tag::OpenEffect)
        );
        assert_eq!(parse_tag("</condition>"), Some(Tag::CloseCondition));
    }

    #[test]
    fn type_tag_captures_value() {
        assert_eq!(
            parse_tag("<VICTORY ACTION TYPE: Drop >"),
            Some(Tag::Type("drop".into()))
        );
        assert_eq!(parse_tag("<TYPE:exp>"), Some(Tag::Type("exp".into())));
        assert_eq!(parse_tag("<TYPE:>"), Some(Tag::Type(String::new())));
    }

    #[test]
    fn unknown_tags_rejected() {
        assert_eq!(parse_tag("<IsPotion:1>"), None);
        assert_eq!(parse_tag("<CONDITIONAL>"), None);
        assert_eq!(parse_tag("</NO MESSAGE>"), None);
        assert_eq!(parse_tag("<VICTORY>"), None);
    }

    #[test]
    fn segments_plain_line() {
        assert_eq!(segments("gainGold(10);"), vec![Segment::Text("gainGold(10);")]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn segments_tag_only_line() {
        assert_eq!(
            segments("<VICTORY ACTION EFFECT>"),
            vec![Segment::Tag(Tag::OpenEffect)]
        );
    }

    #[test]
    fn segments_inline_body() {
        assert_eq!(
            segments("<CONDITION> true </CONDITION>"),
            vec![
                Segment::Tag(Tag::OpenCondition),
                Segment::Text(" true "),
                Segment::Tag(Tag::CloseCondition),
            ]
        );
    }

    #[test]
    fn segments_keep_foreign_angle_brackets_as_text() {
        assert_eq!(
            segments("a < b && <IsImp:1>"),
            vec![Segment::Text("a < b && <IsImp:1>")]
        );
    }

    #[test]
    fn segments_text_before_and_after_tags() {
        assert_eq!(
            segments("x <EFFECT>y</EFFECT> z"),
            vec![
                Segment::Text("x "),
                Segment::Tag(Tag::OpenEffect),
                Segment::Text("y"),
                Segment::Tag(Tag::CloseEffect),
                Segment::Text(" z"),
            ]
        );
    }
}
