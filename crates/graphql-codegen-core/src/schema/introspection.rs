//! The JSON shape of an introspection result, as sent by servers and as
//! persisted in the schema file.

use serde::Deserialize;
use serde::Serialize;

pub const INTROSPECTION_OPERATION_NAME: &str = "IntrospectionQuery";

/// Requests every type, field, argument, input field, enum value,
/// interface, possible type and directive, with deprecation details. Type
/// references are unwrapped eight levels deep (`ofType` nested seven
/// times), enough for `[[Int!]!]!` and then some.
pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type {
    ...TypeRef
  }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// The body POSTed to the endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionRequest<'a> {
    pub query: &'a str,
    pub operation_name: &'a str,
}

impl Default for IntrospectionRequest<'static> {
    fn default() -> Self {
        Self {
            query: INTROSPECTION_QUERY,
            operation_name: INTROSPECTION_OPERATION_NAME,
        }
    }
}

/// An entry of a GraphQL response's `errors` array. Only the message is
/// kept.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GraphQLResponseError {
    pub message: String,
}

/// `{"data": {"__schema": ...}}`: what the fetcher writes.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntrospectionResult {
    pub data: IntrospectionData,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: IntrospectionNamedRef,
    pub mutation_type: Option<IntrospectionNamedRef>,
    pub subscription_type: Option<IntrospectionNamedRef>,
    pub types: Vec<IntrospectionType>,
    #[serde(default)]
    pub directives: Vec<IntrospectionDirective>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IntrospectionNamedRef {
    pub name: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrospectionTypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl IntrospectionTypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntrospectionTypeKind::Scalar => "SCALAR",
            IntrospectionTypeKind::Object => "OBJECT",
            IntrospectionTypeKind::Interface => "INTERFACE",
            IntrospectionTypeKind::Union => "UNION",
            IntrospectionTypeKind::Enum => "ENUM",
            IntrospectionTypeKind::InputObject => "INPUT_OBJECT",
            IntrospectionTypeKind::List => "LIST",
            IntrospectionTypeKind::NonNull => "NON_NULL",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: IntrospectionTypeKind,
    pub name: String,
    pub description: Option<String>,
    pub fields: Option<Vec<IntrospectionField>>,
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    pub interfaces: Option<Vec<IntrospectionTypeRef>>,
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    pub possible_types: Option<Vec<IntrospectionTypeRef>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionTypeRef {
    pub kind: IntrospectionTypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub type_ref: IntrospectionTypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: IntrospectionTypeRef,
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IntrospectionDirective {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
}
