use graphql_codegen_parser::ast;

/// A reference to a schema type from a field, argument, input field or
/// variable, with its list and non-null wrappers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn from_annotation(annotation: &ast::TypeAnnotation) -> Self {
        match annotation {
            ast::TypeAnnotation::Named(name) => TypeRef::named(name.as_str()),
            ast::TypeAnnotation::List { inner, .. } => TypeRef::list(Self::from_annotation(inner)),
            ast::TypeAnnotation::NonNull { inner, .. } => {
                TypeRef::non_null(Self::from_annotation(inner))
            },
        }
    }

    /// The name under all wrappers: `Character` for `[Character!]!`.
    pub fn innermost_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.innermost_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// This reference without its outermost non-null wrapper.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
