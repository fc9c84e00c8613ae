use crate::ast::Name;
use crate::GraphQLSourceSpan;

/// The declared type of a variable: `Episode`, `[ID!]`, `String!`.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotation {
    Named(Name),
    List {
        inner: Box<TypeAnnotation>,
        span: GraphQLSourceSpan,
    },
    NonNull {
        inner: Box<TypeAnnotation>,
        span: GraphQLSourceSpan,
    },
}

impl TypeAnnotation {
    /// The name at the core of all list and non-null wrappers.
    pub fn innermost_name(&self) -> &Name {
        match self {
            TypeAnnotation::Named(name) => name,
            TypeAnnotation::List { inner, .. } | TypeAnnotation::NonNull { inner, .. } => {
                inner.innermost_name()
            },
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeAnnotation::NonNull { .. })
    }

    pub fn span(&self) -> &GraphQLSourceSpan {
        match self {
            TypeAnnotation::Named(name) => &name.span,
            TypeAnnotation::List { span, .. } | TypeAnnotation::NonNull { span, .. } => span,
        }
    }
}

impl std::fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeAnnotation::Named(name) => write!(f, "{name}"),
            TypeAnnotation::List { inner, .. } => write!(f, "[{inner}]"),
            TypeAnnotation::NonNull { inner, .. } => write!(f, "{inner}!"),
        }
    }
}
