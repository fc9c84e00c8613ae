use crate::CodegenError;
use crate::SchemaValidationError;
use crate::schema::SchemaDocument;
use crate::schema::TypeDefinition;
use crate::schema::load_schema_file;
use crate::tests::fixtures::field;
use crate::tests::fixtures::input_value;
use crate::tests::fixtures::named;
use crate::tests::fixtures::object;
use crate::tests::fixtures::star_wars_introspection;
use crate::tests::fixtures::star_wars_schema;
use crate::tests::fixtures::with_type;
use graphql_codegen_parser::ast::OperationKind;
use serde_json::Value;
use serde_json::json;

fn load(value: &Value) -> crate::Result<SchemaDocument> {
    SchemaDocument::from_json_str(&value.to_string(), "test.json")
}

fn validation_error(value: &Value) -> SchemaValidationError {
    match load(value) {
        Err(CodegenError::SchemaValidationError(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn bare_and_data_wrapped_shapes_load_the_same() {
    let bare = star_wars_introspection();
    let wrapped = json!({ "data": bare.clone() });

    assert_eq!(load(&bare).expect("bare"), load(&wrapped).expect("wrapped"));
}

#[test]
fn builtin_scalars_are_always_present() {
    let schema = star_wars_schema();

    for name in ["Boolean", "Float", "ID", "Int", "String"] {
        match schema.type_(name) {
            Some(TypeDefinition::Scalar(scalar)) => assert!(scalar.is_builtin()),
            other => panic!("`{name}` should be a scalar, found {other:?}"),
        }
    }
    assert!(matches!(schema.type_("DateTime"), Some(TypeDefinition::Scalar(s)) if !s.is_builtin()));
}

#[test]
fn model_keeps_declaration_order_and_details() {
    let schema = star_wars_schema();

    let human = schema.type_("Human").and_then(TypeDefinition::as_object).expect("Human");
    let field_names: Vec<&str> = human.fields.keys().map(String::as_str).collect();
    assert_eq!(
        field_names,
        vec!["id", "name", "friends", "appearsIn", "homePlanet", "height"],
    );
    assert_eq!(human.interfaces, vec!["Character".to_string()]);
    assert_eq!(human.fields["appearsIn"].type_ref.to_string(), "[Episode]!");
    assert!(human.fields["height"].arguments.contains_key("unit"));

    let length_unit = schema.type_("LengthUnit").and_then(TypeDefinition::as_enum).expect("enum");
    assert!(!length_unit.values[0].deprecation.is_deprecated());
    assert_eq!(length_unit.values[1].deprecation.reason(), Some("Use METER."));

    assert_eq!(schema.query_type(), "Query");
    assert_eq!(schema.mutation_type(), Some("Mutation"));
    assert_eq!(schema.subscription_type(), None);
}

#[test]
fn introspection_round_trip_yields_an_equal_document() {
    let schema = star_wars_schema();

    let again = SchemaDocument::from_introspection(&schema.to_introspection()).expect("reload");
    assert_eq!(again, schema);

    let json = schema.to_introspection_json().expect("serializes");
    assert!(json.starts_with("{\n  \"data\": {\n    \"__schema\""));
    assert!(json.ends_with("}\n"));
    assert_eq!(SchemaDocument::from_json_str(&json, "schema.json").expect("reload"), schema);
}

#[test]
fn load_schema_file_reads_from_disk() {
    let folder = tempfile::TempDir::new().expect("temp dir");
    let path = folder.path().join("schema.json");
    std::fs::write(&path, star_wars_introspection().to_string()).expect("write");

    assert_eq!(load_schema_file(&path).expect("loads"), star_wars_schema());
}

#[test]
fn missing_schema_file_is_a_parse_error() {
    let folder = tempfile::TempDir::new().expect("temp dir");

    let err = load_schema_file(folder.path().join("schema.json")).expect_err("missing");

    assert!(matches!(err, CodegenError::SchemaParseError { .. }), "{err:?}");
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = SchemaDocument::from_json_str("{ not json", "broken.json").expect_err("bad json");

    match err {
        CodegenError::SchemaParseError { source_name, .. } => assert_eq!(source_name, "broken.json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn json_without_schema_is_a_parse_error() {
    let err = load(&json!({ "data": { "other": 1 } })).expect_err("no schema");

    assert!(err.to_string().contains("no `__schema` object found"), "{err}");
}

#[test]
fn wrong_json_shape_is_a_parse_error() {
    let mut value = star_wars_introspection();
    value["__schema"]["types"] = json!([{ "name": "Query" }]);

    let err = load(&value).expect_err("type without kind");

    assert!(matches!(err, CodegenError::SchemaParseError { .. }), "{err:?}");
}

#[test]
fn undefined_field_type_is_reported() {
    let value = with_type(
        star_wars_introspection(),
        "Review",
        object("Review", vec![field("createdAt", named("SCALAR", "Timestamp"))], &[]),
    );

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::UndefinedTypeReference {
            parent: "Review.createdAt".to_string(),
            type_name: "Timestamp".to_string(),
        },
    );
}

#[test]
fn undefined_root_type_is_reported() {
    let mut value = star_wars_introspection();
    value["__schema"]["subscriptionType"] = json!({ "name": "Subscription" });

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::UndefinedRootType {
            kind: OperationKind::Subscription,
            type_name: "Subscription".to_string(),
        },
    );
}

#[test]
fn root_type_must_be_an_object() {
    let mut value = star_wars_introspection();
    value["__schema"]["queryType"] = json!({ "name": "Character" });

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::RootTypeNotObject {
            kind: OperationKind::Query,
            type_name: "Character".to_string(),
        },
    );
}

#[test]
fn duplicate_type_names_are_rejected() {
    let mut value = star_wars_introspection();
    let types = value["__schema"]["types"].as_array_mut().expect("types array");
    types.push(json!({ "kind": "SCALAR", "name": "DateTime" }));

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::DuplicateTypeName("DateTime".to_string()),
    );
}

#[test]
fn object_without_fields_is_missing_introspection_data() {
    let value = with_type(
        star_wars_introspection(),
        "Review",
        json!({ "kind": "OBJECT", "name": "Review", "interfaces": [] }),
    );

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::MissingIntrospectionField("Review.fields".to_string()),
    );
}

#[test]
fn input_field_of_output_type_is_rejected() {
    let value = with_type(
        star_wars_introspection(),
        "ColorInput",
        json!({
            "kind": "INPUT_OBJECT",
            "name": "ColorInput",
            "inputFields": [input_value("review", named("OBJECT", "Review"))],
        }),
    );

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::WrongTypeKind {
            parent: "ColorInput.review".to_string(),
            type_name: "Review".to_string(),
            expected: "an input",
            found: "object",
        },
    );
}

#[test]
fn union_member_must_be_an_object() {
    let value = with_type(
        star_wars_introspection(),
        "SearchResult",
        json!({
            "kind": "UNION",
            "name": "SearchResult",
            "possibleTypes": [named("OBJECT", "Human"), named("ENUM", "Episode")],
        }),
    );

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::WrongTypeKind {
            parent: "SearchResult".to_string(),
            type_name: "Episode".to_string(),
            expected: "an object",
            found: "enum",
        },
    );
}

#[test]
fn duplicate_enum_value_is_rejected() {
    let value = with_type(
        star_wars_introspection(),
        "LengthUnit",
        json!({
            "kind": "ENUM",
            "name": "LengthUnit",
            "enumValues": [{ "name": "METER" }, { "name": "METER" }],
        }),
    );

    assert_eq!(
        validation_error(&value),
        SchemaValidationError::DuplicateMember {
            type_name: "LengthUnit".to_string(),
            member: "METER".to_string(),
        },
    );
}
