//! Turns the raw text of string tokens into the string values they denote.

/// Error returned when a string literal's escape sequences are invalid.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphQLStringParsingError {
    #[error("invalid escape sequence `{0}`")]
    InvalidEscapeSequence(String),

    #[error("invalid unicode escape `{0}`")]
    InvalidUnicodeEscape(String),

    #[error("string literal is not terminated")]
    UnterminatedString,
}

type Result<T> = std::result::Result<T, GraphQLStringParsingError>;

/// Cooks the raw text of a single-line string literal (quotes included).
pub fn cook_string(raw: &str) -> Result<String> {
    let content = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(GraphQLStringParsingError::UnterminatedString)?;

    let mut cooked = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            cooked.push(ch);
            continue;
        }
        let escaped = match chars.next() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{0008}',
            Some('f') => '\u{000C}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => cook_unicode_escape(&mut chars)?,
            Some(other) => {
                return Err(GraphQLStringParsingError::InvalidEscapeSequence(
                    format!("\\{other}"),
                ));
            },
            None => {
                return Err(GraphQLStringParsingError::InvalidEscapeSequence(
                    "\\".to_string(),
                ));
            },
        };
        cooked.push(escaped);
    }
    Ok(cooked)
}

/// Reads the hex digits following `\u`: either exactly four digits, or a
/// braced variable-length sequence (`\u{1F389}`).
fn cook_unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char> {
    let mut hex = String::new();
    let braced = chars.as_str().starts_with('{');
    if braced {
        chars.next();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => {
                    return Err(GraphQLStringParsingError::InvalidUnicodeEscape(
                        format!("\\u{{{hex}"),
                    ));
                },
            }
        }
    } else {
        for _ in 0..4 {
            match chars.next() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => {
                    return Err(GraphQLStringParsingError::InvalidUnicodeEscape(
                        format!("\\u{hex}"),
                    ));
                },
            }
        }
    }

    let invalid = || GraphQLStringParsingError::InvalidUnicodeEscape(format!("\\u{hex}"));
    let code = u32::from_str_radix(&hex, 16).map_err(|_| invalid())?;

    // A leading surrogate must be followed by `\uXXXX` holding the trailing
    // half of the pair.
    if !braced && (0xD800..=0xDBFF).contains(&code) {
        let rest = chars.as_str();
        let low = rest
            .strip_prefix("\\u")
            .and_then(|tail| tail.get(..4))
            .and_then(|digits| u32::from_str_radix(digits, 16).ok())
            .filter(|low| (0xDC00..=0xDFFF).contains(low))
            .ok_or_else(invalid)?;
        for _ in 0..6 {
            chars.next();
        }
        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(combined).ok_or_else(invalid);
    }

    char::from_u32(code).ok_or_else(invalid)
}

/// Cooks the raw text of a block string (`"""` delimiters included).
///
/// Applies the GraphQL `BlockStringValue()` algorithm: common indentation
/// of all lines but the first is removed, then leading and trailing blank
/// lines are dropped. `\"""` is the only escape sequence.
pub fn cook_block_string(raw: &str) -> Result<String> {
    let content = raw
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
        .ok_or(GraphQLStringParsingError::UnterminatedString)?
        .replace("\\\"\"\"", "\"\"\"");

    let lines: Vec<&str> = content.lines().collect();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let mut dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                line
            } else {
                line.get(common_indent..).unwrap_or("")
            }
        })
        .collect();

    while dedented.first().is_some_and(|line| line.trim().is_empty()) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(|line| line.trim().is_empty()) {
        dedented.pop();
    }

    Ok(dedented.join("\n"))
}
