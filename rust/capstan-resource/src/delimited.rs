/// Split `value` on any of the `delimiters`, ignoring delimiters inside
/// double quotes.
///
/// A backslash makes the next character literal and is itself dropped.
/// Quotes are kept in the output. With `trim`, surrounding whitespace is
/// removed from every token. A trailing empty token is not emitted.
pub fn parse_delimited(value: &str, delimiters: &str, trim: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;

    let finish = |current: &mut String, tokens: &mut Vec<String>| {
        let token = std::mem::take(current);
        tokens.push(if trim {
            token.trim().to_string()
        } else {
            token
        });
    };

    for c in value.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if !quoted && delimiters.contains(c) {
            finish(&mut current, &mut tokens);
        } else {
            if c == '"' {
                quoted = !quoted;
            }
            current.push(c);
        }
    }

    if !current.is_empty() {
        finish(&mut current, &mut tokens);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_splits_and_trims() {
        assert_eq!(parse_delimited(" a, b ,c", ",", true), vec!["a", "b", "c"]);
        assert_eq!(parse_delimited(" a, b", ",", false), vec![" a", " b"]);
    }

    #[test]
    fn it_ignores_delimiters_inside_quotes() {
        assert_eq!(
            parse_delimited(r#"a,"b,c",d"#, ",", true),
            vec!["a", r#""b,c""#, "d"]
        );
    }

    #[test]
    fn it_treats_escaped_characters_literally() {
        assert_eq!(parse_delimited(r"a\,b,c", ",", true), vec!["a,b", "c"]);
    }

    #[test]
    fn it_keeps_interior_empty_tokens() {
        assert_eq!(parse_delimited("a,,b,", ",", true), vec!["a", "", "b"]);
        assert!(parse_delimited("", ",", true).is_empty());
    }
}
