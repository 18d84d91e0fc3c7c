//! Placeholder option grammar.
//!
//! ```text
//! {{name positional... --flag value... --other value...}}
//! {{name:positional}}
//! ```
//!
//! The name ends at the first whitespace or `:`. Tokens before the first
//! `--flag` are positional; tokens after a flag are that flag's values.

use indexmap::IndexMap;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, eof, map, opt, peek, verify},
    multi::separated_list0,
    sequence::{delimited, preceded, terminated},
};

/// Parsed option string of one placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderOptions {
    pub positional: Vec<String>,
    pub flags: IndexMap<String, Vec<String>>,
}

impl PlaceholderOptions {
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.flags.is_empty()
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Values following `--name`, if the flag is present.
    pub fn flag(&self, name: &str) -> Option<&[String]> {
        self.flags.get(name).map(Vec::as_slice)
    }

    /// First value of `--name`.
    pub fn flag_value(&self, name: &str) -> Option<&str> {
        self.flag(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First positional token.
    pub fn first(&self) -> Option<&str> {
        self.positional.first().map(String::as_str)
    }

    /// Flags not in `accepted`.
    pub fn unknown_flags<'a>(&'a self, accepted: &[&str]) -> Vec<&'a str> {
        self.flags
            .keys()
            .map(String::as_str)
            .filter(|flag| !accepted.contains(flag))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Flag(&'a str),
}

fn word(input: &str) -> IResult<&str, &str> {
    verify(take_while1(|c: char| !c.is_whitespace()), |t: &str| {
        !t.starts_with("--")
    })
    .parse(input)
}

fn flag(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("--"),
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    )
    .parse(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        map(terminated(flag, peek(alt((multispace1, eof)))), Token::Flag),
        map(word, Token::Word),
    ))
    .parse(input)
}

fn tokens(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    all_consuming(delimited(
        multispace0,
        separated_list0(multispace1, token),
        multispace0,
    ))
    .parse(input)
}

/// Parse an option string. The error names the offending text.
pub fn parse_options(input: &str) -> Result<PlaceholderOptions, String> {
    let (_, tokens) = tokens(input).map_err(|_| format!("invalid options '{}'", input.trim()))?;

    let mut options = PlaceholderOptions::default();
    let mut current: Option<String> = None;
    for token in tokens {
        match token {
            Token::Flag(name) => {
                let name = name.to_ascii_lowercase();
                options.flags.entry(name.clone()).or_default();
                current = Some(name);
            }
            Token::Word(value) => match &current {
                Some(name) => options
                    .flags
                    .entry(name.clone())
                    .or_default()
                    .push(value.to_string()),
                None => options.positional.push(value.to_string()),
            },
        }
    }
    Ok(options)
}

/// Split placeholder content into name and option text.
pub fn split_name(inner: &str) -> (&str, &str) {
    let parsed: IResult<&str, &str> = terminated(
        take_till(|c: char| c.is_whitespace() || c == ':'),
        opt(alt((map(char(':'), |_| ""), multispace1))),
    )
    .parse(inner.trim());

    match parsed {
        Ok((rest, name)) => (name, rest.trim()),
        Err(_) => (inner.trim(), ""),
    }
}
