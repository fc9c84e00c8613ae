use crate::schema::TypeRef;
use indexmap::IndexMap;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Deprecation {
    #[default]
    Active,
    Deprecated { reason: Option<String> },
}

impl Deprecation {
    pub fn from_introspection(is_deprecated: bool, reason: Option<String>) -> Self {
        if is_deprecated {
            Deprecation::Deprecated { reason }
        } else {
            Deprecation::Active
        }
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Deprecation::Active => None,
            Deprecation::Deprecated { reason } => reason.as_deref(),
        }
    }
}

/// A field of an object or interface type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,
    pub arguments: IndexMap<String, InputValueDefinition>,
    pub deprecation: Deprecation,
}

impl FieldDefinition {
    /// The `__typename` meta field every composite type has.
    pub fn typename() -> Self {
        Self {
            name: "__typename".to_string(),
            description: None,
            type_ref: TypeRef::non_null(TypeRef::named("String")),
            arguments: IndexMap::new(),
            deprecation: Deprecation::Active,
        }
    }
}

/// A field argument, input object field or directive argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub type_ref: TypeRef,

    /// GraphQL literal text, as introspection reports it (`"JEDI"`, `10`).
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Deprecation,
}
