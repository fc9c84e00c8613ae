//! Conversions between the introspection JSON contract and
//! [`SchemaDocument`], and loading of persisted schema files.

use crate::CodegenError;
use crate::SchemaValidationError;
use crate::file_reader;
use crate::schema::BUILTIN_SCALARS;
use crate::schema::Deprecation;
use crate::schema::DirectiveDefinition;
use crate::schema::EnumType;
use crate::schema::EnumValueDefinition;
use crate::schema::FieldDefinition;
use crate::schema::InputObjectType;
use crate::schema::InputValueDefinition;
use crate::schema::InterfaceType;
use crate::schema::ObjectType;
use crate::schema::ScalarType;
use crate::schema::SchemaDocument;
use crate::schema::SchemaValidator;
use crate::schema::TypeDefinition;
use crate::schema::TypeRef;
use crate::schema::UnionType;
use crate::schema::introspection::IntrospectionData;
use crate::schema::introspection::IntrospectionDirective;
use crate::schema::introspection::IntrospectionEnumValue;
use crate::schema::introspection::IntrospectionField;
use crate::schema::introspection::IntrospectionInputValue;
use crate::schema::introspection::IntrospectionNamedRef;
use crate::schema::introspection::IntrospectionResult;
use crate::schema::introspection::IntrospectionSchema;
use crate::schema::introspection::IntrospectionType;
use crate::schema::introspection::IntrospectionTypeKind;
use crate::schema::introspection::IntrospectionTypeRef;
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::path::Path;

type ValidationResult<T> = std::result::Result<T, SchemaValidationError>;

/// Reads and validates a persisted schema file.
pub fn load_schema_file(path: impl AsRef<Path>) -> crate::Result<SchemaDocument> {
    let path = path.as_ref();
    let text = file_reader::read_content(path).map_err(|err| CodegenError::SchemaParseError {
        source_name: format!("`{}`", err.path().display()),
        message: err.to_string(),
    })?;
    let schema = SchemaDocument::from_json_str(&text, &format!("`{}`", path.display()))?;
    tracing::debug!(
        "loaded schema `{}` with {} types",
        path.display(),
        schema.types().len(),
    );
    Ok(schema)
}

/// Finds the `__schema` object in either accepted shape:
/// `{"data": {"__schema": ...}}` or `{"__schema": ...}`.
fn find_schema_value(value: &mut serde_json::Value) -> Option<serde_json::Value> {
    let wrapped_in_data = value
        .get("data")
        .is_some_and(|data| data.get("__schema").is_some());
    let schema = if wrapped_in_data {
        value.get_mut("data")?.get_mut("__schema")
    } else {
        value.get_mut("__schema")
    }?;
    Some(schema.take())
}

impl SchemaDocument {
    /// Parses schema JSON text; `source_name` appears in error messages.
    pub fn from_json_str(text: &str, source_name: &str) -> crate::Result<Self> {
        let parse_error = |message: String| CodegenError::SchemaParseError {
            source_name: source_name.to_string(),
            message,
        };
        let mut value: serde_json::Value =
            serde_json::from_str(text).map_err(|err| parse_error(err.to_string()))?;
        let schema_value = find_schema_value(&mut value)
            .ok_or_else(|| parse_error("no `__schema` object found".to_string()))?;
        let introspection: IntrospectionSchema =
            serde_json::from_value(schema_value).map_err(|err| parse_error(err.to_string()))?;
        Ok(Self::from_introspection(&introspection)?)
    }

    /// Builds and validates a schema from an introspection result.
    pub fn from_introspection(schema: &IntrospectionSchema) -> ValidationResult<Self> {
        let mut types = IndexMap::with_capacity(schema.types.len() + BUILTIN_SCALARS.len());
        for introspection_type in &schema.types {
            let definition = type_from_introspection(introspection_type)?;
            match types.entry(definition.name().to_string()) {
                Entry::Occupied(entry) => {
                    return Err(SchemaValidationError::DuplicateTypeName(entry.key().clone()));
                },
                Entry::Vacant(entry) => {
                    entry.insert(definition);
                },
            }
        }
        for scalar in BUILTIN_SCALARS {
            types
                .entry(scalar.to_string())
                .or_insert_with(|| TypeDefinition::Scalar(ScalarType {
                    name: scalar.to_string(),
                    description: None,
                }));
        }

        let directives = schema
            .directives
            .iter()
            .map(directive_from_introspection)
            .collect::<ValidationResult<Vec<_>>>()?;

        let document = SchemaDocument {
            types,
            query_type: schema.query_type.name.clone(),
            mutation_type: schema.mutation_type.as_ref().map(|root| root.name.clone()),
            subscription_type: schema.subscription_type.as_ref().map(|root| root.name.clone()),
            directives,
        };

        if let Some(error) = SchemaValidator::new(&document).validate().into_iter().next() {
            return Err(error);
        }
        Ok(document)
    }

    /// The inverse of [`SchemaDocument::from_introspection`]; loading the
    /// result again yields an equal document.
    pub fn to_introspection(&self) -> IntrospectionSchema {
        IntrospectionSchema {
            query_type: IntrospectionNamedRef {
                name: self.query_type.clone(),
            },
            mutation_type: self
                .mutation_type
                .as_ref()
                .map(|name| IntrospectionNamedRef { name: name.clone() }),
            subscription_type: self
                .subscription_type
                .as_ref()
                .map(|name| IntrospectionNamedRef { name: name.clone() }),
            types: self
                .types
                .values()
                .map(|definition| self.type_to_introspection(definition))
                .collect(),
            directives: self
                .directives
                .iter()
                .map(|directive| IntrospectionDirective {
                    name: directive.name.clone(),
                    description: directive.description.clone(),
                    locations: directive.locations.clone(),
                    args: self.input_values_to_introspection(&directive.arguments),
                })
                .collect(),
        }
    }

    /// Pretty-printed `{"data": {"__schema": ...}}`, newline terminated.
    pub fn to_introspection_json(&self) -> Result<String, serde_json::Error> {
        let result = IntrospectionResult {
            data: IntrospectionData {
                schema: self.to_introspection(),
            },
        };
        let mut json = serde_json::to_string_pretty(&result)?;
        json.push('\n');
        Ok(json)
    }

    fn type_to_introspection(&self, definition: &TypeDefinition) -> IntrospectionType {
        let mut result = IntrospectionType {
            kind: IntrospectionTypeKind::Scalar,
            name: definition.name().to_string(),
            description: definition.description().map(str::to_string),
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: None,
        };
        match definition {
            TypeDefinition::Object(object) => {
                result.kind = IntrospectionTypeKind::Object;
                result.fields = Some(self.fields_to_introspection(&object.fields));
                result.interfaces = Some(self.named_refs(&object.interfaces));
            },
            TypeDefinition::Interface(interface) => {
                result.kind = IntrospectionTypeKind::Interface;
                result.fields = Some(self.fields_to_introspection(&interface.fields));
                result.interfaces = Some(self.named_refs(&interface.interfaces));
                result.possible_types = Some(self.named_refs(&interface.possible_types));
            },
            TypeDefinition::Union(union) => {
                result.kind = IntrospectionTypeKind::Union;
                result.possible_types = Some(self.named_refs(&union.possible_types));
            },
            TypeDefinition::Enum(enum_type) => {
                result.kind = IntrospectionTypeKind::Enum;
                result.enum_values = Some(
                    enum_type
                        .values
                        .iter()
                        .map(|value| IntrospectionEnumValue {
                            name: value.name.clone(),
                            description: value.description.clone(),
                            is_deprecated: value.deprecation.is_deprecated(),
                            deprecation_reason: value.deprecation.reason().map(str::to_string),
                        })
                        .collect(),
                );
            },
            TypeDefinition::Scalar(_) => (),
            TypeDefinition::Input(input) => {
                result.kind = IntrospectionTypeKind::InputObject;
                result.input_fields = Some(self.input_values_to_introspection(&input.fields));
            },
        }
        result
    }

    fn fields_to_introspection(
        &self,
        fields: &IndexMap<String, FieldDefinition>,
    ) -> Vec<IntrospectionField> {
        fields
            .values()
            .map(|field| IntrospectionField {
                name: field.name.clone(),
                description: field.description.clone(),
                args: self.input_values_to_introspection(&field.arguments),
                type_ref: self.type_ref_to_introspection(&field.type_ref),
                is_deprecated: field.deprecation.is_deprecated(),
                deprecation_reason: field.deprecation.reason().map(str::to_string),
            })
            .collect()
    }

    fn input_values_to_introspection(
        &self,
        values: &IndexMap<String, InputValueDefinition>,
    ) -> Vec<IntrospectionInputValue> {
        values
            .values()
            .map(|value| IntrospectionInputValue {
                name: value.name.clone(),
                description: value.description.clone(),
                type_ref: self.type_ref_to_introspection(&value.type_ref),
                default_value: value.default_value.clone(),
            })
            .collect()
    }

    fn named_refs(&self, names: &[String]) -> Vec<IntrospectionTypeRef> {
        names
            .iter()
            .map(|name| self.type_ref_to_introspection(&TypeRef::named(name.as_str())))
            .collect()
    }

    fn type_ref_to_introspection(&self, type_ref: &TypeRef) -> IntrospectionTypeRef {
        match type_ref {
            TypeRef::Named(name) => IntrospectionTypeRef {
                kind: self.introspection_kind_of(name),
                name: Some(name.clone()),
                of_type: None,
            },
            TypeRef::List(inner) => IntrospectionTypeRef {
                kind: IntrospectionTypeKind::List,
                name: None,
                of_type: Some(Box::new(self.type_ref_to_introspection(inner))),
            },
            TypeRef::NonNull(inner) => IntrospectionTypeRef {
                kind: IntrospectionTypeKind::NonNull,
                name: None,
                of_type: Some(Box::new(self.type_ref_to_introspection(inner))),
            },
        }
    }

    fn introspection_kind_of(&self, name: &str) -> IntrospectionTypeKind {
        match self.type_(name) {
            Some(TypeDefinition::Object(_)) => IntrospectionTypeKind::Object,
            Some(TypeDefinition::Interface(_)) => IntrospectionTypeKind::Interface,
            Some(TypeDefinition::Union(_)) => IntrospectionTypeKind::Union,
            Some(TypeDefinition::Enum(_)) => IntrospectionTypeKind::Enum,
            Some(TypeDefinition::Input(_)) => IntrospectionTypeKind::InputObject,
            Some(TypeDefinition::Scalar(_)) | None => IntrospectionTypeKind::Scalar,
        }
    }
}

fn type_from_introspection(source: &IntrospectionType) -> ValidationResult<TypeDefinition> {
    let name = source.name.clone();
    let description = source.description.clone();
    let definition = match source.kind {
        IntrospectionTypeKind::Object => TypeDefinition::Object(ObjectType {
            fields: fields_from_introspection(&name, required(&source.fields, &name, "fields")?)?,
            interfaces: ref_names(&name, source.interfaces.as_deref().unwrap_or_default())?,
            name,
            description,
        }),
        IntrospectionTypeKind::Interface => TypeDefinition::Interface(InterfaceType {
            fields: fields_from_introspection(&name, required(&source.fields, &name, "fields")?)?,
            interfaces: ref_names(&name, source.interfaces.as_deref().unwrap_or_default())?,
            possible_types: ref_names(&name, source.possible_types.as_deref().unwrap_or_default())?,
            name,
            description,
        }),
        IntrospectionTypeKind::Union => TypeDefinition::Union(UnionType {
            possible_types: ref_names(
                &name,
                required(&source.possible_types, &name, "possibleTypes")?,
            )?,
            name,
            description,
        }),
        IntrospectionTypeKind::Enum => {
            let mut values: Vec<EnumValueDefinition> = Vec::new();
            for value in required(&source.enum_values, &name, "enumValues")? {
                if values.iter().any(|existing| existing.name == value.name) {
                    return Err(SchemaValidationError::DuplicateMember {
                        type_name: name,
                        member: value.name.clone(),
                    });
                }
                values.push(EnumValueDefinition {
                    name: value.name.clone(),
                    description: value.description.clone(),
                    deprecation: Deprecation::from_introspection(
                        value.is_deprecated,
                        value.deprecation_reason.clone(),
                    ),
                });
            }
            TypeDefinition::Enum(EnumType {
                name,
                description,
                values,
            })
        },
        IntrospectionTypeKind::Scalar => TypeDefinition::Scalar(ScalarType { name, description }),
        IntrospectionTypeKind::InputObject => TypeDefinition::Input(InputObjectType {
            fields: input_values_from_introspection(
                &name,
                required(&source.input_fields, &name, "inputFields")?,
            )?,
            name,
            description,
        }),
        IntrospectionTypeKind::List | IntrospectionTypeKind::NonNull => {
            return Err(SchemaValidationError::UnsupportedTypeKind {
                type_name: name,
                kind: source.kind.as_str().to_string(),
            });
        },
    };
    Ok(definition)
}

fn required<'a, T>(
    value: &'a Option<Vec<T>>,
    type_name: &str,
    key: &str,
) -> ValidationResult<&'a [T]> {
    value
        .as_deref()
        .ok_or_else(|| {
            SchemaValidationError::MissingIntrospectionField(format!("{type_name}.{key}"))
        })
}

fn fields_from_introspection(
    type_name: &str,
    fields: &[IntrospectionField],
) -> ValidationResult<IndexMap<String, FieldDefinition>> {
    let mut result = IndexMap::with_capacity(fields.len());
    for field in fields {
        let parent = format!("{type_name}.{}", field.name);
        let definition = FieldDefinition {
            name: field.name.clone(),
            description: field.description.clone(),
            type_ref: type_ref_from_introspection(&parent, &field.type_ref)?,
            arguments: input_values_from_introspection(&parent, &field.args)?,
            deprecation: Deprecation::from_introspection(
                field.is_deprecated,
                field.deprecation_reason.clone(),
            ),
        };
        insert_member(&mut result, type_name, field.name.clone(), definition)?;
    }
    Ok(result)
}

fn input_values_from_introspection(
    parent: &str,
    values: &[IntrospectionInputValue],
) -> ValidationResult<IndexMap<String, InputValueDefinition>> {
    let mut result = IndexMap::with_capacity(values.len());
    for value in values {
        let definition = InputValueDefinition {
            name: value.name.clone(),
            description: value.description.clone(),
            type_ref: type_ref_from_introspection(
                &format!("{parent}.{}", value.name),
                &value.type_ref,
            )?,
            default_value: value.default_value.clone(),
        };
        insert_member(&mut result, parent, value.name.clone(), definition)?;
    }
    Ok(result)
}

fn insert_member<T>(
    map: &mut IndexMap<String, T>,
    type_name: &str,
    member: String,
    value: T,
) -> ValidationResult<()> {
    match map.entry(member) {
        Entry::Occupied(entry) => Err(SchemaValidationError::DuplicateMember {
            type_name: type_name.to_string(),
            member: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        },
    }
}

fn directive_from_introspection(
    directive: &IntrospectionDirective,
) -> ValidationResult<DirectiveDefinition> {
    let parent = format!("@{}", directive.name);
    Ok(DirectiveDefinition {
        name: directive.name.clone(),
        description: directive.description.clone(),
        locations: directive.locations.clone(),
        arguments: input_values_from_introspection(&parent, &directive.args)?,
    })
}

fn ref_names(parent: &str, refs: &[IntrospectionTypeRef]) -> ValidationResult<Vec<String>> {
    refs.iter()
        .map(|type_ref| {
            type_ref
                .name
                .clone()
                .ok_or_else(|| {
                    SchemaValidationError::MissingIntrospectionField(format!("{parent}: name"))
                })
        })
        .collect()
}

fn type_ref_from_introspection(
    parent: &str,
    type_ref: &IntrospectionTypeRef,
) -> ValidationResult<TypeRef> {
    let missing =
        |key: &str| SchemaValidationError::MissingIntrospectionField(format!("{parent}: {key}"));
    match type_ref.kind {
        IntrospectionTypeKind::List => {
            let inner = type_ref.of_type.as_deref().ok_or_else(|| missing("ofType"))?;
            Ok(TypeRef::list(type_ref_from_introspection(parent, inner)?))
        },
        IntrospectionTypeKind::NonNull => {
            let inner = type_ref.of_type.as_deref().ok_or_else(|| missing("ofType"))?;
            Ok(TypeRef::non_null(type_ref_from_introspection(parent, inner)?))
        },
        _ => type_ref
            .name
            .clone()
            .map(TypeRef::Named)
            .ok_or_else(|| missing("name")),
    }
}
