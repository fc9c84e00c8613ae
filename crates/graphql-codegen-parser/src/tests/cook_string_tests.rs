use crate::token::cook_block_string;
use crate::token::cook_string;
use crate::token::GraphQLStringParsingError;

#[test]
fn plain_and_escaped_strings() {
    assert_eq!(cook_string(r#""hello""#), Ok("hello".to_string()));
    assert_eq!(
        cook_string(r#""tab\tquote\"slash\/back\\""#),
        Ok("tab\tquote\"slash/back\\".to_string()),
    );
    assert_eq!(cook_string(r#""a\nb\rc""#), Ok("a\nb\rc".to_string()));
}

#[test]
fn unicode_escapes() {
    assert_eq!(cook_string(r#""\u00e9""#), Ok("é".to_string()));
    assert_eq!(cook_string(r#""\u{1F389}""#), Ok("🎉".to_string()));
    assert_eq!(cook_string(r#""\uD83C\uDF89""#), Ok("🎉".to_string()));
}

#[test]
fn invalid_escapes() {
    assert_eq!(
        cook_string(r#""\q""#),
        Err(GraphQLStringParsingError::InvalidEscapeSequence("\\q".to_string())),
    );
    assert!(matches!(
        cook_string(r#""\u12""#),
        Err(GraphQLStringParsingError::InvalidUnicodeEscape(_)),
    ));
    // A lone leading surrogate.
    assert!(matches!(
        cook_string(r#""\uD83C""#),
        Err(GraphQLStringParsingError::InvalidUnicodeEscape(_)),
    ));
}

#[test]
fn missing_quotes() {
    assert_eq!(cook_string("\"abc"), Err(GraphQLStringParsingError::UnterminatedString));
}

#[test]
fn block_string_indentation_is_removed() {
    let raw = "\"\"\"\n    hello\n      world\n  \"\"\"";
    assert_eq!(cook_block_string(raw), Ok("hello\n  world".to_string()));
}

#[test]
fn block_string_keeps_first_line_and_escaped_quotes() {
    let raw = "\"\"\"first\n   second \\\"\"\" quoted\"\"\"";
    assert_eq!(
        cook_block_string(raw),
        Ok("first\nsecond \"\"\" quoted".to_string()),
    );
}

#[test]
fn block_string_without_escapes_keeps_backslashes() {
    assert_eq!(
        cook_block_string(r#""""C:\path\n""""#),
        Ok(r"C:\path\n".to_string()),
    );
}
