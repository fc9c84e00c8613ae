use crate::schema::EnumValueDefinition;
use crate::schema::FieldDefinition;
use crate::schema::InputValueDefinition;
use indexmap::IndexMap;

/// The scalars every schema has, whether or not its introspection result
/// lists them.
pub const BUILTIN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeDefinition {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    Scalar(ScalarType),
    Input(InputObjectType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Object(t) => &t.name,
            TypeDefinition::Interface(t) => &t.name,
            TypeDefinition::Union(t) => &t.name,
            TypeDefinition::Enum(t) => &t.name,
            TypeDefinition::Scalar(t) => &t.name,
            TypeDefinition::Input(t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TypeDefinition::Object(t) => t.description.as_deref(),
            TypeDefinition::Interface(t) => t.description.as_deref(),
            TypeDefinition::Union(t) => t.description.as_deref(),
            TypeDefinition::Enum(t) => t.description.as_deref(),
            TypeDefinition::Scalar(t) => t.description.as_deref(),
            TypeDefinition::Input(t) => t.description.as_deref(),
        }
    }

    /// Lower-case kind name used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDefinition::Object(_) => "object",
            TypeDefinition::Interface(_) => "interface",
            TypeDefinition::Union(_) => "union",
            TypeDefinition::Enum(_) => "enum",
            TypeDefinition::Scalar(_) => "scalar",
            TypeDefinition::Input(_) => "input object",
        }
    }

    /// Fields of object and interface types; `None` for every other kind.
    pub fn fields(&self) -> Option<&IndexMap<String, FieldDefinition>> {
        match self {
            TypeDefinition::Object(t) => Some(&t.fields),
            TypeDefinition::Interface(t) => Some(&t.fields),
            _ => None,
        }
    }

    /// Types whose values have sub-selections.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_)
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeDefinition::Enum(_) | TypeDefinition::Scalar(_))
    }

    /// Types allowed for arguments, input fields and variables.
    pub fn is_input_type(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Enum(_) | TypeDefinition::Scalar(_) | TypeDefinition::Input(_)
        )
    }

    pub fn is_output_type(&self) -> bool {
        !matches!(self, TypeDefinition::Input(_))
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeDefinition::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            TypeDefinition::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&InputObjectType> {
        match self {
            TypeDefinition::Input(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDefinition>,
    pub interfaces: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDefinition>,
    pub interfaces: Vec<String>,

    /// Object types implementing this interface.
    pub possible_types: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub possible_types: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDefinition>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

impl ScalarType {
    pub fn is_builtin(&self) -> bool {
        BUILTIN_SCALARS.contains(&self.name.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, InputValueDefinition>,
}
