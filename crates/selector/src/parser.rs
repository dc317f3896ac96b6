//! A `nom`-based parser for the path-selector grammar.
//!
//! ```text
//! selector  := segment+
//! segment   := ("/" | "//") name ( "[" predicate "]" ){0,2}
//! predicate := index | "last()" | attrExpr ("and" attrExpr)*
//! attrExpr  := "@" attrName ["=" ("\"" value "\"" | "'" value "'")]
//! ```
//!
//! A leading bare path is treated as rooted (`/` prepended). Per segment,
//! at most one attribute group and one index group may be combined, with
//! the index group last.

use crate::ast::{AttributeCondition, Index, Segment, SegmentName, Selector};
use crate::error::SelectorError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::map,
    multi::{many0, many1, separated_list1},
    sequence::{delimited, preceded},
};
use trellis_dom::normalize_name;

const TEXT_SELECTOR: &str = "text()";

/// One raw `[...]` group, before placement validation.
enum PredicateGroup {
    Index(Index),
    Attributes(Vec<AttributeCondition>),
}

struct RawSegment<'a> {
    any_depth: bool,
    name: &'a str,
    groups: Vec<PredicateGroup>,
}

// --- Main Public Parser ---

pub fn parse_selector(expression: &str) -> Result<Selector, SelectorError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::Syntax(
            expression.to_string(),
            "selector cannot be empty".to_string(),
        ));
    }

    // A bare path is rooted.
    let rooted: String;
    let input = if trimmed.starts_with('/') {
        trimmed
    } else {
        rooted = format!("/{}", trimmed);
        &rooted
    };

    let raw_segments = match selector(input) {
        Ok(("", segments)) => segments,
        Ok((remainder, _)) => {
            return Err(SelectorError::Syntax(
                expression.to_string(),
                format!("unexpected trailing input: '{}'", remainder),
            ));
        }
        Err(e) => {
            return Err(SelectorError::Syntax(expression.to_string(), e.to_string()));
        }
    };

    let segments = raw_segments
        .into_iter()
        .map(|raw| build_segment(expression, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Selector::new(expression, segments))
}

fn build_segment(expression: &str, raw: RawSegment<'_>) -> Result<Segment, SelectorError> {
    let syntax = |message: String| SelectorError::Syntax(expression.to_string(), message);

    if raw.groups.len() > 2 {
        return Err(syntax(
            "a segment may carry at most one attribute group and one index group".to_string(),
        ));
    }

    let mut conditions = Vec::new();
    let mut index = None;
    for group in raw.groups {
        match group {
            PredicateGroup::Attributes(attrs) => {
                if index.is_some() {
                    return Err(syntax("index predicate must come last".to_string()));
                }
                if !conditions.is_empty() {
                    return Err(syntax(
                        "only one attribute predicate group is allowed per segment".to_string(),
                    ));
                }
                conditions = attrs;
            }
            PredicateGroup::Index(idx) => {
                if index.is_some() {
                    return Err(syntax("only one index predicate is allowed per segment".to_string()));
                }
                if let Index::Position(0) = idx {
                    return Err(syntax("indexes are 1-based; [0] is invalid".to_string()));
                }
                index = Some(idx);
            }
        }
    }

    let name = if raw.name == TEXT_SELECTOR {
        SegmentName::Text
    } else {
        SegmentName::Element(normalize_name(raw.name))
    };

    if matches!(name, SegmentName::Text) && !conditions.is_empty() {
        return Err(syntax("text() cannot carry attribute predicates".to_string()));
    }

    Ok(Segment {
        any_depth: raw.any_depth,
        name,
        conditions,
        index,
    })
}

// --- Combinators ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn selector(input: &str) -> IResult<&str, Vec<RawSegment<'_>>> {
    many1(segment).parse(input)
}

fn segment(input: &str) -> IResult<&str, RawSegment<'_>> {
    let (i, slashes) = alt((tag("//"), tag("/"))).parse(input)?;
    let (i, name) = segment_name(i)?;
    let (i, groups) = many0(predicate_group).parse(i)?;
    Ok((
        i,
        RawSegment {
            any_depth: slashes == "//",
            name,
            groups,
        },
    ))
}

fn segment_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '/' && c != '[' && c != ']' && !c.is_whitespace())(input)
}

fn predicate_group(input: &str) -> IResult<&str, PredicateGroup> {
    delimited(char('['), ws(predicate), char(']')).parse(input)
}

fn predicate(input: &str) -> IResult<&str, PredicateGroup> {
    alt((
        map(tag("last()"), |_| PredicateGroup::Index(Index::Last)),
        map(digit1, |digits: &str| {
            // digit1 guarantees a numeric literal; usize overflow is not a
            // realistic concern for sibling positions.
            PredicateGroup::Index(Index::Position(digits.parse().unwrap_or(usize::MAX)))
        }),
        map(
            separated_list1(ws(tag("and")), attribute_condition),
            PredicateGroup::Attributes,
        ),
    ))
    .parse(input)
}

fn attribute_condition(input: &str) -> IResult<&str, AttributeCondition> {
    let (i, name) = preceded(char('@'), attribute_name).parse(input)?;
    let (i, value) = match preceded(ws(char('=')), quoted_value).parse(i) {
        Ok((rest, value)) => (rest, Some(value.to_string())),
        Err(_) => (i, None),
    };
    Ok((
        i,
        AttributeCondition {
            name: normalize_name(name),
            value,
        },
    ))
}

fn attribute_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_' || c == ':')(input)
}

fn quoted_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
    ))
    .parse(input)
}
