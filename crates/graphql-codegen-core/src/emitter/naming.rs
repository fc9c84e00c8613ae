//! GraphQL names to Rust identifiers.

use heck::ToSnakeCase;
use heck::ToUpperCamelCase;
use proc_macro2::Ident;
use proc_macro2::Span;
use std::collections::HashSet;

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

pub(crate) fn is_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// An identifier for `name` exactly as written: `type` becomes `r#type`,
/// `self` becomes `self_`.
pub(crate) fn rust_ident(name: &str) -> Ident {
    if NON_RAW_KEYWORDS.contains(&name) {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else if is_keyword(name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// Module names never use raw identifiers: per-operation output writes a
/// file per module, and `r#mod` would land in `mod.rs`.
pub(crate) fn module_name(name: &str) -> String {
    let snake = non_empty(name.to_snake_case(), "operation");
    if is_keyword(&snake) {
        format!("{snake}_")
    } else {
        snake
    }
}

pub(crate) fn field_name(name: &str) -> String {
    non_empty(name.to_snake_case(), "field")
}

pub(crate) fn pascal_name(name: &str) -> String {
    non_empty(name.to_upper_camel_case(), "Value")
}

/// The Rust name of a schema type. GraphQL type names are already valid
/// identifiers, so only keywords need escaping.
pub(crate) fn type_ident(graphql_name: &str) -> Ident {
    rust_ident(graphql_name)
}

/// Names like `_` have no letters to keep after case conversion.
fn non_empty(converted: String, fallback: &str) -> String {
    if converted.is_empty() || converted.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{fallback}{converted}")
    } else {
        converted
    }
}

/// Hands out unique names within one Rust namespace.
#[derive(Debug, Default)]
pub(crate) struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub(crate) fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    /// Returns `base`, or `base2`, `base3`, ... if it is taken.
    pub(crate) fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
