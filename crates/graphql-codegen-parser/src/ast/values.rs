use crate::ast::Name;
use crate::GraphQLSourceSpan;

/// A GraphQL input value literal, or a variable reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Variable(Name),
    Int {
        value: i32,
        span: GraphQLSourceSpan,
    },
    Float {
        value: f64,
        span: GraphQLSourceSpan,
    },
    /// The cooked string; `block` records whether it was written as a
    /// `"""` block string.
    String {
        value: String,
        block: bool,
        span: GraphQLSourceSpan,
    },
    Boolean {
        value: bool,
        span: GraphQLSourceSpan,
    },
    Null(GraphQLSourceSpan),
    Enum(Name),
    List {
        values: Vec<Value>,
        span: GraphQLSourceSpan,
    },
    Object {
        fields: Vec<ObjectField>,
        span: GraphQLSourceSpan,
    },
}

impl Value {
    pub fn span(&self) -> &GraphQLSourceSpan {
        match self {
            Value::Variable(name) | Value::Enum(name) => &name.span,
            Value::Null(span) => span,
            Value::Int { span, .. }
            | Value::Float { span, .. }
            | Value::String { span, .. }
            | Value::Boolean { span, .. }
            | Value::List { span, .. }
            | Value::Object { span, .. } => span,
        }
    }

    /// Names of every variable referenced anywhere inside this value.
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Value::Variable(name) => vec![name.as_str()],
            Value::List { values, .. } => values.iter().flat_map(Value::variables).collect(),
            Value::Object { fields, .. } => {
                fields.iter().flat_map(|field| field.value.variables()).collect()
            },
            _ => Vec::new(),
        }
    }
}

/// One `name: value` entry of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectField {
    pub name: Name,
    pub value: Value,
    pub span: GraphQLSourceSpan,
}
