//! The clause grammar shared by manifest headers.
//!
//! A header is a comma-separated list of clauses. Each clause names one or
//! more semicolon-separated paths followed by semicolon-separated
//! parameters: `key:=value` directives, `key=value` attributes and
//! `key:Type=value` typed attributes.
//!
//! ```text
//! com.example.api;com.example.spi;version="[1,2)";resolution:=optional
//! ```

use capstan_resource::Directives;
use indexmap::IndexMap;

use crate::{Headers, ManifestError};

/// One clause of a header: its paths and the parameters that apply to all
/// of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    pub paths: Vec<String>,
    pub directives: Directives,
    /// Attribute values as written. Declared types are applied later, by the
    /// headers that support them.
    pub attributes: IndexMap<String, String>,
    /// Declared types of `key:Type=value` attributes.
    pub types: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ClauseStart,
    ParameterStart,
    Key,
    DirectiveOrTyped,
    Argument,
    Value,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Directives,
    Attributes,
}

/// Parse a header value into its clauses.
///
/// Values may be double-quoted; the quotes are stripped but backslash
/// escapes are kept verbatim, so a quoted filter keeps its own escaping. An
/// empty header yields a single clause with an empty path.
pub fn parse_header(header: &str) -> Result<Vec<Clause>, ManifestError> {
    // Every delimiter is ASCII, so byte offsets taken at delimiters are
    // always char boundaries.
    let bytes = header.as_bytes();

    let mut clauses = Vec::new();
    let mut clause = Clause::default();
    let mut state = State::ClauseStart;
    let mut target = Target::Attributes;
    let mut key = String::new();
    let mut start = 0;
    let mut position = 0;
    let mut quoted = false;
    let mut escaped = false;

    loop {
        let current = bytes.get(position).copied();

        match state {
            State::ClauseStart | State::ParameterStart | State::Key => {
                if state != State::Key {
                    start = position;
                    state = State::Key;
                }
                match current {
                    Some(delimiter @ (b':' | b'=')) => {
                        key = header[start..position].trim().to_string();
                        start = position + 1;
                        target = Target::Attributes;
                        state = if delimiter == b':' {
                            State::DirectiveOrTyped
                        } else {
                            State::Argument
                        };
                    }
                    None | Some(b',' | b';') => {
                        clause.paths.push(header[start..position].trim().to_string());
                        state = next_state(current, &mut clause, &mut clauses);
                    }
                    _ => {}
                }
                position += 1;
            }
            State::DirectiveOrTyped => {
                if current == Some(b'=') {
                    if start == position {
                        target = Target::Directives;
                    } else {
                        let kind = header[start..position].trim().to_string();
                        clause.types.insert(key.clone(), kind);
                    }
                    state = State::Argument;
                    start = position + 1;
                }
                position += 1;
            }
            State::Argument => {
                quoted = current == Some(b'"');
                if quoted {
                    position += 1;
                }
                if quoted || !current.is_some_and(|c| c.is_ascii_whitespace()) {
                    state = State::Value;
                } else {
                    position += 1;
                }
            }
            State::Value => {
                if escaped {
                    escaped = false;
                } else if current == Some(b'\\') {
                    escaped = true;
                } else if quoted && current == Some(b'"') {
                    quoted = false;
                } else if !quoted && matches!(current, None | Some(b';' | b',')) {
                    let value = unquote(header[start..position].trim()).to_string();
                    let parameters = match target {
                        Target::Directives => &mut clause.directives,
                        Target::Attributes => &mut clause.attributes,
                    };
                    if parameters.contains_key(&key) {
                        return Err(ManifestError::DuplicateParameter {
                            key,
                            header: header.to_string(),
                        });
                    }
                    parameters.insert(std::mem::take(&mut key), value);
                    state = next_state(current, &mut clause, &mut clauses);
                }
                position += 1;
            }
        }

        if current.is_none() {
            break;
        }
    }

    match state {
        State::ClauseStart | State::ParameterStart => {
            clauses.push(clause);
            Ok(clauses)
        }
        _ => Err(ManifestError::MalformedHeader(header.to_string())),
    }
}

/// Parse the header `name`, or yield no clauses when it is absent.
pub(crate) fn clauses(headers: &Headers, name: &str) -> Result<Vec<Clause>, ManifestError> {
    let Some(raw) = headers.get(name) else {
        return Ok(Vec::new());
    };
    let clauses = parse_header(raw)?;
    tracing::debug!(header = name, clauses = clauses.len(), "Parsed manifest header");
    Ok(clauses)
}

/// The state after a path or value ends at `delimiter`. A comma closes the
/// current clause.
fn next_state(delimiter: Option<u8>, clause: &mut Clause, clauses: &mut Vec<Clause>) -> State {
    if delimiter == Some(b',') {
        clauses.push(std::mem::take(clause));
        State::ClauseStart
    } else {
        State::ParameterStart
    }
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
