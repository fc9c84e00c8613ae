use crate::SchemaValidationError;
use crate::schema::InputValueDefinition;
use crate::schema::SchemaDocument;
use crate::schema::TypeDefinition;
use crate::schema::TypeRef;
use graphql_codegen_parser::ast::OperationKind;
use indexmap::IndexMap;

/// Checks that every reference inside a schema resolves to a type of the
/// right kind and that the root operation types are objects.
pub(super) struct SchemaValidator<'a> {
    errors: Vec<SchemaValidationError>,
    schema: &'a SchemaDocument,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a SchemaDocument) -> Self {
        Self {
            errors: vec![],
            schema,
        }
    }

    pub fn validate(mut self) -> Vec<SchemaValidationError> {
        for kind in [
            OperationKind::Query,
            OperationKind::Mutation,
            OperationKind::Subscription,
        ] {
            self.validate_root_type(kind);
        }

        for definition in self.schema.types().values() {
            self.validate_type(definition);
        }

        for directive in self.schema.directives() {
            self.validate_input_values(&format!("@{}", directive.name), &directive.arguments);
        }
        self.errors
    }

    fn validate_root_type(&mut self, kind: OperationKind) {
        let Some(type_name) = self.schema.root_type_name(kind) else {
            return;
        };
        match self.schema.type_(type_name) {
            None => self.errors.push(SchemaValidationError::UndefinedRootType {
                kind,
                type_name: type_name.to_string(),
            }),
            Some(TypeDefinition::Object(_)) => (),
            Some(_) => self.errors.push(SchemaValidationError::RootTypeNotObject {
                kind,
                type_name: type_name.to_string(),
            }),
        }
    }

    fn validate_type(&mut self, definition: &'a TypeDefinition) {
        let type_name = definition.name();
        if let Some(fields) = definition.fields() {
            for (field_name, field) in fields {
                let parent = format!("{type_name}.{field_name}");
                self.expect_type(
                    &parent,
                    &field.type_ref,
                    "an output",
                    TypeDefinition::is_output_type,
                );
                self.validate_input_values(&parent, &field.arguments);
            }
        }

        match definition {
            TypeDefinition::Object(object) => {
                self.expect_named_types(type_name, &object.interfaces, "an interface", |def| {
                    matches!(def, TypeDefinition::Interface(_))
                });
            },
            TypeDefinition::Interface(interface) => {
                self.expect_named_types(type_name, &interface.interfaces, "an interface", |def| {
                    matches!(def, TypeDefinition::Interface(_))
                });
                self.expect_named_types(type_name, &interface.possible_types, "an object", |def| {
                    matches!(def, TypeDefinition::Object(_))
                });
            },
            TypeDefinition::Union(union) => {
                self.expect_named_types(type_name, &union.possible_types, "an object", |def| {
                    matches!(def, TypeDefinition::Object(_))
                });
            },
            TypeDefinition::Input(input) => self.validate_input_values(type_name, &input.fields),
            TypeDefinition::Enum(_) | TypeDefinition::Scalar(_) => (),
        }
    }

    fn validate_input_values(
        &mut self,
        parent: &str,
        values: &IndexMap<String, InputValueDefinition>,
    ) {
        for (name, value) in values {
            self.expect_type(
                &format!("{parent}.{name}"),
                &value.type_ref,
                "an input",
                TypeDefinition::is_input_type,
            );
        }
    }

    fn expect_named_types(
        &mut self,
        parent: &str,
        names: &[String],
        expected: &'static str,
        is_expected_kind: fn(&TypeDefinition) -> bool,
    ) {
        for name in names {
            self.expect_type(parent, &TypeRef::named(name.as_str()), expected, is_expected_kind);
        }
    }

    fn expect_type(
        &mut self,
        parent: &str,
        type_ref: &TypeRef,
        expected: &'static str,
        is_expected_kind: fn(&TypeDefinition) -> bool,
    ) {
        let type_name = type_ref.innermost_name();
        match self.schema.type_(type_name) {
            None => self.errors.push(SchemaValidationError::UndefinedTypeReference {
                parent: parent.to_string(),
                type_name: type_name.to_string(),
            }),
            Some(definition) if !is_expected_kind(definition) => {
                self.errors.push(SchemaValidationError::WrongTypeKind {
                    parent: parent.to_string(),
                    type_name: type_name.to_string(),
                    expected,
                    found: definition.kind_name(),
                });
            },
            Some(_) => (),
        }
    }
}
