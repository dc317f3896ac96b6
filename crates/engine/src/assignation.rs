//! Parsers for the small directive-value micro-grammars: assignation
//! lists (`name = expr, name2 = expr2`) and iteration specifications
//! (`item : expr`, `item, status : expr`).
//!
//! Expressions stay opaque strings for the evaluator; the only structure
//! recognized here is the top-level separators, so commas inside quotes
//! or brackets belong to the expression.

use crate::error::EngineError;
use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    multi::separated_list1,
    sequence::{delimited, separated_pair},
};

/// One `name = expression` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignation {
    pub name: String,
    pub expression: String,
}

/// A parsed iteration directive value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationSpec {
    pub item: String,
    pub status: String,
    pub expression: String,
}

/// Suffix appended to the item name when no explicit status variable is
/// given (`user` iterates with status `userStat`).
const DEFAULT_STATUS_SUFFIX: &str = "Stat";

pub fn parse_assignations(input: &str) -> Result<Vec<Assignation>, EngineError> {
    let bad = |message: &str| EngineError::Assignation(input.to_string(), message.to_string());

    if input.trim().is_empty() {
        return Err(bad("assignation list cannot be empty"));
    }
    match assignation_list(input) {
        Ok(("", assignations)) => Ok(assignations),
        Ok((remainder, _)) => Err(bad(&format!("unexpected trailing input: '{}'", remainder))),
        Err(e) => Err(bad(&e.to_string())),
    }
}

/// Parses `item[, status] : expression`. The status name defaults to the
/// item name plus `Stat`.
pub fn parse_iteration(input: &str) -> Result<IterationSpec, EngineError> {
    let bad = |message: &str| EngineError::Iteration(input.to_string(), message.to_string());

    let (vars, expression) = input
        .split_once(':')
        .ok_or_else(|| bad("expected 'item : expression'"))?;
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(bad("iterated expression cannot be empty"));
    }

    let mut names = vars.split(',').map(str::trim);
    let item = names.next().unwrap_or("");
    if item.is_empty() || !is_binding_name(item) {
        return Err(bad("item variable name is missing or invalid"));
    }
    let status = match names.next() {
        Some(status) if !status.is_empty() && is_binding_name(status) => status.to_string(),
        Some(_) => return Err(bad("status variable name is invalid")),
        None => format!("{}{}", item, DEFAULT_STATUS_SUFFIX),
    };
    if names.next().is_some() {
        return Err(bad("at most two variable names may precede ':'"));
    }

    Ok(IterationSpec {
        item: item.to_string(),
        status,
        expression: expression.to_string(),
    })
}

fn is_binding_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// --- Combinators ---

fn assignation_list(input: &str) -> IResult<&str, Vec<Assignation>> {
    separated_list1(char(','), assignation).parse(input)
}

fn assignation(input: &str) -> IResult<&str, Assignation> {
    map(
        separated_pair(
            delimited(multispace0, binding_name, multispace0),
            char('='),
            expression_chunk,
        ),
        |(name, expression)| Assignation {
            name: name.to_string(),
            expression: expression.trim().to_string(),
        },
    )
    .parse(input)
}

fn binding_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_' || c == ':' || c == '$')(input)
}

/// Consumes up to (but not including) the next top-level comma. Commas
/// inside quotes or `()`/`[]`/`{}` nesting stay part of the expression.
fn expression_chunk(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut end = input.len();

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    end = i;
                    break;
                }
                _ => {}
            },
        }
    }

    let chunk = &input[..end];
    if chunk.trim().is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TakeWhile1,
        )));
    }
    Ok((&input[end..], chunk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_assignation() {
        let parsed = parse_assignations("user = ${session.user}").unwrap();
        assert_eq!(
            parsed,
            vec![Assignation {
                name: "user".into(),
                expression: "${session.user}".into(),
            }]
        );
    }

    #[test]
    fn multiple_assignations() {
        let parsed = parse_assignations("a=1, b = ${x.y}, c='lit'").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1].name, "b");
        assert_eq!(parsed[1].expression, "${x.y}");
        assert_eq!(parsed[2].expression, "'lit'");
    }

    #[test]
    fn commas_inside_expressions_do_not_split() {
        let parsed = parse_assignations("pair = ${f(a, b)}, s = 'x, y'").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].expression, "${f(a, b)}");
        assert_eq!(parsed[1].expression, "'x, y'");
    }

    #[test]
    fn empty_or_malformed_lists_are_rejected() {
        assert!(parse_assignations("").is_err());
        assert!(parse_assignations("   ").is_err());
        assert!(parse_assignations("a=").is_err());
        assert!(parse_assignations("=1").is_err());
        assert!(parse_assignations("a=1,").is_err());
    }

    #[test]
    fn iteration_with_default_status() {
        let spec = parse_iteration("item : ${items}").unwrap();
        assert_eq!(spec.item, "item");
        assert_eq!(spec.status, "itemStat");
        assert_eq!(spec.expression, "${items}");
    }

    #[test]
    fn iteration_with_explicit_status() {
        let spec = parse_iteration("user, st : ${users}").unwrap();
        assert_eq!(spec.item, "user");
        assert_eq!(spec.status, "st");
    }

    #[test]
    fn iteration_malformed() {
        assert!(parse_iteration("${items}").is_err());
        assert!(parse_iteration(" : ${items}").is_err());
        assert!(parse_iteration("a, b, c : ${items}").is_err());
        assert!(parse_iteration("item : ").is_err());
    }
}
