//! Event-selector parser using nom
//!
//! Grammar:
//! ```text
//! selector := gesture | stage
//! gesture  := '[' stage ',' stage ']' '>' stage
//! stage    := target? event filter*
//! target   := '@' ident ':' | ident ':'
//! event    := ident
//! filter   := '[' balanced ']'
//! ident    := (alpha | '_') (alnum | '_' | '-')*
//! ```
//!
//! Filter predicates are opaque: their bracketed content is captured
//! verbatim (respecting nested brackets) and evaluated by the runtime.

use crate::ast::*;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{map, success, verify},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, terminated},
    IResult,
};
use thiserror::Error;

/// Parse errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unexpected characters at end of selector: '{0}'")]
    Trailing(String),

    #[error("Empty event selector")]
    Empty,
}

/// Parse an event selector from a string
pub fn parse_event_selector(input: &str) -> Result<EventSelector, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    match selector(input) {
        Ok(("", result)) => Ok(result),
        Ok((remaining, _)) => Err(ParseError::Trailing(remaining.to_string())),
        Err(e) => Err(ParseError::Parse(format!("{:?}", e))),
    }
}

/// Parse whitespace around an inner parser
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a selector (entry point)
fn selector(input: &str) -> IResult<&str, EventSelector> {
    alt((gesture, map(ws(stage), EventSelector::Single)))(input)
}

/// Parse a three-stage drag gesture: `[start, end] > middle`
fn gesture(input: &str) -> IResult<&str, EventSelector> {
    let (input, _) = ws(char('['))(input)?;
    let (input, start) = ws(stage)(input)?;
    let (input, _) = char(',')(input)?;
    let (input, end) = ws(stage)(input)?;
    let (input, _) = char(']')(input)?;
    let (input, _) = ws(char('>'))(input)?;
    let (input, middle) = ws(stage)(input)?;
    Ok((input, EventSelector::gesture(start, end, middle)))
}

/// Parse one event stage
fn stage(input: &str) -> IResult<&str, EventStage> {
    let (input, target) = alt((
        map(delimited(char('@'), identifier, char(':')), |g: &str| {
            EventTarget::Scoped(g.to_string())
        }),
        map(terminated(identifier, char(':')), |s: &str| {
            EventTarget::Source(s.to_string())
        }),
        success(EventTarget::View),
    ))(input)?;

    let (input, event) = identifier(input)?;
    let (input, filters) = many0(filter)(input)?;

    Ok((
        input,
        EventStage {
            target,
            event: event.to_string(),
            filters: filters.into_iter().map(str::to_string).collect(),
        },
    ))
}

/// Parse an identifier (event types, sources, group names)
fn identifier(input: &str) -> IResult<&str, &str> {
    verify(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
        |s: &str| {
            s.chars()
                .next()
                .map(|c| c.is_ascii_alphabetic() || c == '_')
                .unwrap_or(false)
        },
    )(input)
}

/// Parse a bracketed filter predicate, respecting nested brackets.
///
/// The content between the outermost brackets is captured verbatim.
fn filter(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('[')(input)?;
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                if depth == 0 {
                    return Ok((&rest[i + 1..], &rest[..i]));
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))
}
