//! Filter string parser.
//!
//! ```text
//! filter    = '(' body ')'
//! body      = '&' filter+ | '|' filter+ | '!' filter+ | leaf
//! leaf      = name ws* operator value
//! operator  = '=' | '<=' | '>=' | '~='
//! ```
//!
//! Whitespace between tokens is ignored. A `&`, `|` or `!` only opens a
//! composite when the next non-whitespace character is `(`; otherwise it is
//! read as the first character of a leaf. Values are taken verbatim up to
//! the closing parenthesis, with `\` escaping the following character.

use crate::{
    Filter, FilterError,
    substring::{decode, parse_substring},
};

/// An expression whose closing parenthesis has not been seen yet.
enum Pending {
    /// A leaf starting at this byte offset.
    Leaf(usize),
    /// A composite with the children collected so far.
    Composite(fn(Vec<Filter>) -> Filter, Vec<Filter>),
}

fn char_at(source: &str, index: usize) -> Option<char> {
    source.get(index..).and_then(|rest| rest.chars().next())
}

fn skip_whitespace(source: &str, index: usize) -> usize {
    match source.get(index..) {
        Some(rest) => index + (rest.len() - rest.trim_start().len()),
        None => index,
    }
}

fn junction(c: char) -> Option<fn(Vec<Filter>) -> Filter> {
    match c {
        '&' => Some(Filter::And),
        '|' => Some(Filter::Or),
        '!' => Some(Filter::Not),
        _ => None,
    }
}

/// Parse a complete filter string.
pub(crate) fn parse(source: &str) -> Result<Filter, FilterError> {
    let mut index = skip_whitespace(source, 0);
    match char_at(source, index) {
        None => return Err(FilterError::Empty),
        Some('(') => {}
        Some(_) => return Err(FilterError::MissingOpeningParenthesis(source.to_string())),
    }

    let mut stack: Vec<Pending> = Vec::new();
    let mut result: Option<Filter> = None;
    let mut escaped = false;

    while let Some(c) = char_at(source, index) {
        if result.is_some() {
            return Err(FilterError::MultipleTopLevel(source.to_string()));
        }

        let mut next = index + c.len_utf8();
        match c {
            '(' if !escaped => {
                let start = skip_whitespace(source, next);
                let Some(first) = char_at(source, start) else {
                    return Err(FilterError::MissingClosingParenthesis(source.to_string()));
                };

                let composite = junction(first).and_then(|build| {
                    let peek = skip_whitespace(source, start + first.len_utf8());
                    (char_at(source, peek) == Some('(')).then_some((build, peek))
                });

                match composite {
                    Some((build, peek)) => {
                        stack.push(Pending::Composite(build, Vec::new()));
                        next = peek;
                    }
                    None => {
                        // The first character of a leaf is never a delimiter.
                        stack.push(Pending::Leaf(start));
                        next = start + first.len_utf8();
                    }
                }
            }
            ')' if !escaped => {
                let filter = match stack.pop() {
                    Some(Pending::Composite(build, children)) => build(children),
                    Some(Pending::Leaf(start)) => leaf(&source[start..index])?,
                    None => {
                        return Err(FilterError::UnbalancedParenthesis(source.to_string()));
                    }
                };

                match stack.last_mut() {
                    Some(Pending::Composite(_, children)) => children.push(filter),
                    _ => result = Some(filter),
                }
            }
            '\\' if !escaped => escaped = true,
            _ => escaped = false,
        }

        index = skip_whitespace(source, next);
    }

    result.ok_or_else(|| FilterError::MissingClosingParenthesis(source.to_string()))
}

/// Parse the body of a leaf, `name op value`, without its parentheses.
fn leaf(body: &str) -> Result<Filter, FilterError> {
    let name_end = body.find(['=', '<', '>', '~']).unwrap_or(body.len());
    let name = body[..name_end].trim_end();
    if name.is_empty() {
        return Err(FilterError::MissingAttributeName(body.to_string()));
    }
    let name = name.to_string();

    let rest = &body[name_end..];
    if let Some(value) = rest.strip_prefix("<=") {
        let value = decode(value);
        Ok(Filter::LessEqual { name, value })
    } else if let Some(value) = rest.strip_prefix(">=") {
        let value = decode(value);
        Ok(Filter::GreaterEqual { name, value })
    } else if let Some(value) = rest.strip_prefix("~=") {
        let value = decode(value);
        Ok(Filter::Approx { name, value })
    } else if let Some(value) = rest.strip_prefix('=') {
        Ok(equality(name, value))
    } else {
        Err(FilterError::UnknownOperator(rest.to_string()))
    }
}

/// An `=` leaf is a presence test, a wildcard match or a plain equality
/// depending on its unescaped `*`s.
fn equality(name: String, raw: &str) -> Filter {
    let mut pieces = parse_substring(raw);
    match pieces.as_slice() {
        [first, last] if first.is_empty() && last.is_empty() => Filter::Present { name },
        [_, _, ..] => Filter::Substring { name, pieces },
        _ => Filter::Equal {
            name,
            value: pieces.pop().unwrap_or_default(),
        },
    }
}
