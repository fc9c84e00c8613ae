use crate::ast::Name;
use crate::ast::TypeAnnotation;
use crate::ast::Value;
use crate::GraphQLSourceSpan;

/// A parsed executable document: the operations and fragments of one
/// source file, in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Fragment(frag) => Some(frag),
            Definition::Operation(_) => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

impl Definition {
    pub fn span(&self) -> &GraphQLSourceSpan {
        match self {
            Definition::Operation(op) => &op.span,
            Definition::Fragment(frag) => &frag.span,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "query" => Some(OperationKind::Query),
            "mutation" => Some(OperationKind::Mutation),
            "subscription" => Some(OperationKind::Subscription),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `query HeroName($episode: Episode) @dir { ... }`, or the `{ ... }`
/// shorthand (an anonymous query, `shorthand == true`).
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDefinition {
    pub span: GraphQLSourceSpan,
    pub operation_kind: OperationKind,
    pub name: Option<Name>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: SelectionSet,
    pub shorthand: bool,
}

/// `fragment HeroDetails on Character @dir { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition {
    pub span: GraphQLSourceSpan,
    pub name: Name,
    pub type_condition: Name,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: SelectionSet,
}

/// `$episode: Episode = JEDI`
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub span: GraphQLSourceSpan,
    pub variable: Name,
    pub var_type: TypeAnnotation,
    pub default_value: Option<Value>,
    pub directives: Vec<DirectiveAnnotation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSet {
    pub span: GraphQLSourceSpan,
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    /// Names of all fragments spread anywhere in this selection set,
    /// including inside nested fields and inline fragments. Duplicates are
    /// kept, in source order.
    pub fn fragment_spreads(&self) -> Vec<&Name> {
        let mut spreads = Vec::new();
        self.collect_fragment_spreads(&mut spreads);
        spreads
    }

    fn collect_fragment_spreads<'a>(&'a self, out: &mut Vec<&'a Name>) {
        for selection in &self.selections {
            match selection {
                Selection::Field(field) => {
                    if let Some(nested) = &field.selection_set {
                        nested.collect_fragment_spreads(out);
                    }
                },
                Selection::FragmentSpread(spread) => out.push(&spread.name),
                Selection::InlineFragment(inline) => {
                    inline.selection_set.collect_fragment_spreads(out);
                },
            }
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

/// `alias: name(arg: value) @dir { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub span: GraphQLSourceSpan,
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    /// The key this field's value appears under in a response: the alias if
    /// present, the field name otherwise.
    pub fn response_key(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.name).as_str()
    }
}

/// `...HeroDetails @dir`
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    pub span: GraphQLSourceSpan,
    pub name: Name,
    pub directives: Vec<DirectiveAnnotation>,
}

/// `... on Droid @dir { ... }` (the type condition is optional).
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    pub span: GraphQLSourceSpan,
    pub type_condition: Option<Name>,
    pub directives: Vec<DirectiveAnnotation>,
    pub selection_set: SelectionSet,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub span: GraphQLSourceSpan,
    pub name: Name,
    pub value: Value,
}

/// `@include(if: $withFriends)`
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveAnnotation {
    pub span: GraphQLSourceSpan,
    pub name: Name,
    pub arguments: Vec<Argument>,
}
