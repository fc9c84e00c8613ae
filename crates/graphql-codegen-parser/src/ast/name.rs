use crate::GraphQLSourceSpan;

/// A GraphQL name together with where it appeared.
#[derive(Clone, Debug, PartialEq)]
pub struct Name {
    pub value: String,
    pub span: GraphQLSourceSpan,
}

impl Name {
    pub fn new(value: impl Into<String>, span: GraphQLSourceSpan) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
