use crate::tests::utils::parse_errors;
use crate::token_source::StrGraphQLTokenSource;
use crate::GraphQLParseErrorKind;
use crate::GraphQLParser;
use std::path::PathBuf;
use std::sync::Arc;

#[test]
fn missing_closing_brace_is_one_error() {
    let source = "query Hero {\n  hero {\n    name\n  }\n";
    let errors = parse_errors(source);
    assert_eq!(errors.len(), 1, "{errors:#?}");

    let error = &errors[0];
    assert_eq!(
        error.kind(),
        &GraphQLParseErrorKind::UnclosedDelimiter {
            delimiter: "{".to_string(),
        },
    );
    assert_eq!((error.line(), error.column()), (4, 4));
    assert_eq!(
        error.message(),
        "Unclosed `{` of selection set opened at 1:12",
    );
    assert_eq!(error.help(), Some("add the missing `}`"));
}

#[test]
fn errors_name_the_file() {
    let source = "query Hero {\n  hero {\n    name\n  }\n";
    let result = GraphQLParser::with_file_path(
        source,
        Arc::new(PathBuf::from("ops/hero.graphql")),
    )
    .parse_executable_document();
    assert_eq!(result.errors.len(), 1);
    assert!(
        result.errors[0].format_oneline().starts_with("ops/hero.graphql:4:4: Unclosed"),
        "{}",
        result.errors[0],
    );
}

#[test]
fn recovers_and_reports_every_broken_definition() {
    let source = "query A { a(x: ) }\nquery B { b(y: ) }";
    let result = GraphQLParser::new(source).parse_executable_document();
    let positions: Vec<_> = result
        .errors
        .iter()
        .map(|error| (error.line(), error.column()))
        .collect();
    assert_eq!(positions, vec![(1, 16), (2, 16)]);
    assert!(result.errors.iter().all(|error| matches!(
        error.kind(),
        GraphQLParseErrorKind::UnexpectedToken { found, .. } if found == ")"
    )));

    assert!(result.valid_ast().is_none());
    let recovered = result.ast().unwrap();
    let names: Vec<_> = recovered
        .operations()
        .filter_map(|op| op.name.as_ref().map(|name| name.as_str()))
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn type_system_definitions_are_rejected() {
    let source = "type Foo { a: Int }\nquery Q { a }";
    let result = GraphQLParser::new(source).parse_executable_document();
    assert_eq!(result.errors.len(), 1, "{:#?}", result.errors);
    assert_eq!(
        result.errors[0].kind(),
        &GraphQLParseErrorKind::TypeSystemDefinition {
            keyword: "type".to_string(),
        },
    );

    let recovered = result.ast().unwrap();
    let names: Vec<_> = recovered
        .operations()
        .map(|op| op.name.as_ref().map(|name| name.as_str()))
        .collect();
    assert_eq!(names, vec![Some("Q")]);
}

#[test]
fn described_type_system_definitions_are_rejected() {
    let errors = parse_errors("\"\"\"A scalar\"\"\" scalar Date\nquery Q { a }");
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert!(matches!(
        errors[0].kind(),
        GraphQLParseErrorKind::TypeSystemDefinition { keyword } if keyword == "scalar"
    ));
}

#[test]
fn lexer_errors_surface_with_their_message() {
    let errors = parse_errors("query { a ? }");
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert_eq!(errors[0].kind(), &GraphQLParseErrorKind::LexerError);
    assert_eq!(errors[0].message(), "Unexpected character `?`");
}

#[test]
fn empty_constructs() {
    let errors = parse_errors("query { }");
    assert!(matches!(
        errors[0].kind(),
        GraphQLParseErrorKind::InvalidEmptyConstruct { construct } if construct == "selection set"
    ));

    let errors = parse_errors("query Q() { a }");
    assert!(matches!(
        errors[0].kind(),
        GraphQLParseErrorKind::InvalidEmptyConstruct { construct } if construct == "variable definitions"
    ));

    let errors = parse_errors("{ a() }");
    assert!(matches!(
        errors[0].kind(),
        GraphQLParseErrorKind::InvalidEmptyConstruct { construct } if construct == "argument list"
    ));
}

#[test]
fn fragment_named_on_is_reserved() {
    let errors = parse_errors("fragment on on T { a }");
    assert!(matches!(
        errors[0].kind(),
        GraphQLParseErrorKind::ReservedName { name } if name == "on"
    ));
}

#[test]
fn variables_in_default_values() {
    let errors = parse_errors("query Q($a: Int = $b) { f }");
    assert!(
        errors
            .iter()
            .any(|error| error.kind() == &GraphQLParseErrorKind::VariableInConstContext),
        "{errors:#?}",
    );
}

#[test]
fn out_of_range_numbers() {
    let errors = parse_errors("{ f(x: 99999999999) }");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind(),
        &GraphQLParseErrorKind::InvalidValue {
            raw: "99999999999".to_string(),
        },
    );
}

#[test]
fn invalid_string_escapes() {
    let errors = parse_errors(r#"{ f(x: "\q") }"#);
    assert!(matches!(errors[0].kind(), GraphQLParseErrorKind::InvalidString(_)));
}

#[test]
fn deep_nesting_is_rejected_without_overflow() {
    let depth = GraphQLParser::<StrGraphQLTokenSource>::MAX_RECURSION_DEPTH + 6;
    let source = format!("{}b{}", "{ a ".repeat(depth), " }".repeat(depth));
    let result = GraphQLParser::new(&source).parse_executable_document();
    assert!(
        result
            .errors
            .iter()
            .any(|error| error.kind() == &GraphQLParseErrorKind::NestingTooDeep),
    );
}

#[test]
fn deep_nesting_is_one_error() {
    let source = format!(
        "query Deep {}b{}\nquery Next {{ c }}",
        "{ a ".repeat(5000),
        " }".repeat(5000),
    );
    let result = GraphQLParser::new(&source).parse_executable_document();
    assert_eq!(result.errors.len(), 1, "{:#?}", result.errors);
    assert_eq!(result.errors[0].kind(), &GraphQLParseErrorKind::NestingTooDeep);

    let names: Vec<_> = result
        .ast()
        .expect("recovered document")
        .operations()
        .filter_map(|operation| operation.name.as_ref())
        .map(|name| name.value.to_string())
        .collect();
    assert_eq!(names, ["Deep", "Next"]);
}

#[test]
fn deep_list_value_is_one_error() {
    let source = format!("{{ f(x: {}1{}) }}", "[".repeat(500), "]".repeat(500));
    let errors = parse_errors(&source);
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert_eq!(errors[0].kind(), &GraphQLParseErrorKind::NestingTooDeep);
}

#[test]
fn input_ending_without_a_delimiter_open() {
    let errors = parse_errors("query Q");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].kind(),
        GraphQLParseErrorKind::UnexpectedEof { .. }
    ));
}
