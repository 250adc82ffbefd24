//! Wildcard values.
//!
//! An equality value containing unescaped `*` is split into literal pieces
//! with an implicit wildcard between each pair. Empty first or last pieces
//! anchor a leading or trailing wildcard, so `*foo` is `["", "foo"]` and
//! `a*b*c` is `["a", "b", "c"]`.

/// Characters that must be escaped inside filter values.
pub(crate) const RESERVED: [char; 4] = ['\\', '(', ')', '*'];

/// Split a raw (still escaped) value on its unescaped wildcards.
///
/// Escapes are decoded in the resulting pieces and runs of `*` collapse into
/// one wildcard. A value with no `*` and no `\` is returned as a single piece
/// untouched.
pub fn parse_substring(value: &str) -> Vec<String> {
    if !value.contains(['*', '\\']) {
        return vec![value.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut was_star = false;
    let mut left_star = false;
    let mut escaped = false;

    for c in value.chars() {
        if !escaped && c == '*' {
            if !was_star {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                if pieces.is_empty() {
                    left_star = true;
                }
                was_star = true;
            }
        } else if !escaped && c == '\\' {
            escaped = true;
        } else {
            escaped = false;
            was_star = false;
            current.push(c);
        }
    }

    let right_star = was_star;
    if !right_star {
        pieces.push(current);
    }

    if right_star {
        pieces.push(String::new());
    }
    if left_star {
        pieces.insert(0, String::new());
    }

    pieces
}

/// Check `candidate` against wildcard `pieces`.
///
/// A single piece is a plain equality test. Otherwise the first piece must be
/// a prefix, the last a suffix, and the ones between must appear in order
/// without overlapping each other.
pub fn compare_substring<S>(pieces: &[S], candidate: &str) -> bool
where
    S: AsRef<str>,
{
    match pieces {
        [] => true,
        [only] => candidate == only.as_ref(),
        [first, middle @ .., last] => {
            let (first, last) = (first.as_ref(), last.as_ref());
            if !candidate.starts_with(first) {
                return false;
            }

            let mut index = first.len();
            for piece in middle {
                let piece = piece.as_ref();
                match candidate[index..].find(piece) {
                    Some(offset) => index += offset + piece.len(),
                    None => return false,
                }
            }

            candidate.ends_with(last) && candidate.len() >= index + last.len()
        }
    }
}

/// Write `value` with reserved filter characters escaped.
pub(crate) fn encode_into(out: &mut String, value: &str) {
    for c in value.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Decode backslash escapes in a raw value.
pub(crate) fn decode(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut escaped = false;
    for c in raw.chars() {
        if !escaped && c == '\\' {
            escaped = true;
        } else {
            escaped = false;
            decoded.push(c);
        }
    }
    decoded
}
