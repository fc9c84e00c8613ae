use crate::schema::InputValueDefinition;
use crate::schema::ObjectType;
use crate::schema::TypeDefinition;
use graphql_codegen_parser::ast::OperationKind;
use indexmap::IndexMap;

/// A validated schema: every type by name plus the root operation types.
///
/// Built by [`SchemaDocument::from_introspection`] (or one of the loaders
/// wrapping it) and immutable afterwards. Once built, every type reference
/// inside it resolves, the five built-in scalars exist, and the query root
/// is an object type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchemaDocument {
    pub(super) types: IndexMap<String, TypeDefinition>,
    pub(super) query_type: String,
    pub(super) mutation_type: Option<String>,
    pub(super) subscription_type: Option<String>,
    pub(super) directives: Vec<DirectiveDefinition>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<String>,
    pub arguments: IndexMap<String, InputValueDefinition>,
}

impl SchemaDocument {
    /// Every type, in the order the introspection result listed them.
    pub fn types(&self) -> &IndexMap<String, TypeDefinition> {
        &self.types
    }

    pub fn type_(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    pub fn directives(&self) -> &[DirectiveDefinition] {
        &self.directives
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => Some(self.query_type()),
            OperationKind::Mutation => self.mutation_type(),
            OperationKind::Subscription => self.subscription_type(),
        }
    }

    pub fn root_type(&self, kind: OperationKind) -> Option<&ObjectType> {
        self.root_type_name(kind)
            .and_then(|name| self.type_(name))
            .and_then(TypeDefinition::as_object)
    }

    /// The object types a value of type `name` can be at runtime.
    ///
    /// Interfaces whose introspection listed no possible types fall back
    /// to scanning the objects declaring them.
    pub fn possible_types(&self, name: &str) -> Vec<&str> {
        match self.type_(name) {
            Some(TypeDefinition::Object(object)) => vec![object.name.as_str()],
            Some(TypeDefinition::Union(union)) => {
                union.possible_types.iter().map(String::as_str).collect()
            },
            Some(TypeDefinition::Interface(interface)) if !interface.possible_types.is_empty() => {
                interface.possible_types.iter().map(String::as_str).collect()
            },
            Some(TypeDefinition::Interface(interface)) => self
                .types
                .values()
                .filter_map(TypeDefinition::as_object)
                .filter(|object| object.interfaces.contains(&interface.name))
                .map(|object| object.name.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether a fragment on `type_condition` can apply to some value of
    /// `parent_type`.
    pub fn fragment_can_apply(&self, type_condition: &str, parent_type: &str) -> bool {
        if type_condition == parent_type {
            return true;
        }
        let condition_types = self.possible_types(type_condition);
        self.possible_types(parent_type)
            .iter()
            .any(|possible| condition_types.contains(possible))
    }

    /// Whether a fragment on `type_condition` applies to every value of
    /// `parent_type`. Fields selected by fragments that do not are only
    /// present on some responses.
    pub fn fragment_always_applies(&self, type_condition: &str, parent_type: &str) -> bool {
        if type_condition == parent_type {
            return true;
        }
        let condition_types = self.possible_types(type_condition);
        let parent_types = self.possible_types(parent_type);
        !parent_types.is_empty()
            && parent_types
                .iter()
                .all(|possible| condition_types.contains(possible))
    }
}
