//! Relaxed object-literal parsing for hand-typed queries.
//!
//! Accepts what people actually type into a chat box: unquoted keys,
//! single- or double-quoted values, unquoted single-token values,
//! trailing commas. Values keep their textual form; there is no number
//! or boolean type because everything becomes a URL query parameter.
//!
//! Absence of a parse is a normal control-flow value: the caller falls
//! through to literal-text classification.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, terminated},
};

/// Parse a braced key-value literal. Returns `None` unless the whole
/// input is consumed and at least one pair is present (an empty object
/// counts as no parse).
pub fn parse_relaxed_object(input: &str) -> Option<Vec<(String, String)>> {
    all_consuming(terminated(object, multispace0))(input)
        .ok()
        .map(|(_, pairs)| pairs)
}

fn object(input: &str) -> IResult<&str, Vec<(String, String)>> {
    delimited(
        preceded(multispace0, char('{')),
        terminated(
            separated_list1(preceded(multispace0, char(',')), pair),
            opt(preceded(multispace0, char(','))),
        ),
        preceded(multispace0, char('}')),
    )(input)
}

fn pair(input: &str) -> IResult<&str, (String, String)> {
    map(
        separated_pair(
            preceded(multispace0, key),
            preceded(multispace0, char(':')),
            preceded(multispace0, value_token),
        ),
        |(k, v): (&str, &str)| (k.to_string(), v.to_string()),
    )(input)
}

fn key(input: &str) -> IResult<&str, &str> {
    alt((quoted, bare_key))(input)
}

fn bare_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '$')(input)
}

/// Quoted string: "some text" or 'some text'. No escape handling;
/// chat input never needs it.
fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    ))(input)
}

/// A single unquoted token. Multi-word unquoted values are deliberately
/// rejected so plain prose never half-parses as a literal.
fn bare_value(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        !c.is_whitespace() && !matches!(c, ',' | ':' | '{' | '}' | '"' | '\'')
    })(input)
}

fn value_token(input: &str) -> IResult<&str, &str> {
    alt((quoted, bare_value))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_values() {
        let pairs = parse_relaxed_object("{organizationName: \"Red Cross\"}").unwrap();
        assert_eq!(
            pairs,
            vec![("organizationName".to_string(), "Red Cross".to_string())]
        );
    }

    #[test]
    fn parses_single_quoted_and_quoted_keys() {
        let pairs = parse_relaxed_object("{'jurisdiction': 'CA', \"filingYear\": 2019}").unwrap();
        assert_eq!(pairs[0], ("jurisdiction".to_string(), "CA".to_string()));
        assert_eq!(pairs[1], ("filingYear".to_string(), "2019".to_string()));
    }

    #[test]
    fn parses_unquoted_single_token_value() {
        let pairs = parse_relaxed_object("{identifier: 13-1837418}").unwrap();
        assert_eq!(pairs, vec![("identifier".to_string(), "13-1837418".to_string())]);
    }

    #[test]
    fn tolerates_whitespace_and_trailing_comma() {
        let pairs = parse_relaxed_object("{ organizationName : \"Acme\" , }").unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn rejects_multi_token_unquoted_value() {
        assert!(parse_relaxed_object("{organizationName: Red Cross}").is_none());
    }

    #[test]
    fn rejects_empty_object() {
        assert!(parse_relaxed_object("{}").is_none());
    }

    #[test]
    fn rejects_prose() {
        assert!(parse_relaxed_object("Red Cross").is_none());
        assert!(parse_relaxed_object("{Red Cross}").is_none());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_relaxed_object("{a: 1} extra").is_none());
    }
}
