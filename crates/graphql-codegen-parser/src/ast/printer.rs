//! Prints AST nodes back out as normalized GraphQL.
//!
//! The output depends only on the AST: comments, commas and original
//! whitespace are dropped, selection sets are indented by two spaces, block
//! strings are printed as ordinary escaped strings. Two documents that differ
//! only in formatting print identically.

use crate::ast::Argument;
use crate::ast::Definition;
use crate::ast::DirectiveAnnotation;
use crate::ast::Document;
use crate::ast::FragmentDefinition;
use crate::ast::OperationDefinition;
use crate::ast::Selection;
use crate::ast::SelectionSet;
use crate::ast::Value;
use std::fmt::Write;

const INDENT: &str = "  ";

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn operation(&mut self, op: &OperationDefinition) {
        let mut head = String::new();
        if !op.shorthand {
            head.push_str(op.operation_kind.as_str());
            if let Some(name) = &op.name {
                head.push(' ');
                head.push_str(name.as_str());
            }
            if !op.variable_definitions.is_empty() {
                let vars: Vec<String> = op
                    .variable_definitions
                    .iter()
                    .map(|var| {
                        let mut text = format!("${}: {}", var.variable, var.var_type);
                        if let Some(default) = &var.default_value {
                            text.push_str(" = ");
                            text.push_str(&print_value(default));
                        }
                        text.push_str(&print_directives(&var.directives));
                        text
                    })
                    .collect();
                head.push('(');
                head.push_str(&vars.join(", "));
                head.push(')');
            }
            head.push_str(&print_directives(&op.directives));
            head.push(' ');
        }
        head.push('{');
        self.line(&head);
        self.selections(&op.selection_set);
        self.line("}");
    }

    fn fragment(&mut self, frag: &FragmentDefinition) {
        self.line(&format!(
            "fragment {} on {}{} {{",
            frag.name,
            frag.type_condition,
            print_directives(&frag.directives),
        ));
        self.selections(&frag.selection_set);
        self.line("}");
    }

    /// Prints the contents of a selection set (not its braces) one level
    /// deeper than the current depth.
    fn selections(&mut self, set: &SelectionSet) {
        self.depth += 1;
        for selection in &set.selections {
            match selection {
                Selection::Field(field) => {
                    let mut text = String::new();
                    if let Some(alias) = &field.alias {
                        let _ = write!(text, "{alias}: ");
                    }
                    text.push_str(field.name.as_str());
                    text.push_str(&print_arguments(&field.arguments));
                    text.push_str(&print_directives(&field.directives));
                    match &field.selection_set {
                        Some(nested) => {
                            text.push_str(" {");
                            self.line(&text);
                            self.selections(nested);
                            self.line("}");
                        },
                        None => self.line(&text),
                    }
                },
                Selection::FragmentSpread(spread) => {
                    self.line(&format!(
                        "...{}{}",
                        spread.name,
                        print_directives(&spread.directives),
                    ));
                },
                Selection::InlineFragment(inline) => {
                    let mut text = "...".to_string();
                    if let Some(type_condition) = &inline.type_condition {
                        let _ = write!(text, " on {type_condition}");
                    }
                    text.push_str(&print_directives(&inline.directives));
                    text.push_str(" {");
                    self.line(&text);
                    self.selections(&inline.selection_set);
                    self.line("}");
                },
            }
        }
        self.depth -= 1;
    }
}

fn print_arguments(arguments: &[Argument]) -> String {
    if arguments.is_empty() {
        return String::new();
    }
    let args: Vec<String> = arguments
        .iter()
        .map(|arg| format!("{}: {}", arg.name, print_value(&arg.value)))
        .collect();
    format!("({})", args.join(", "))
}

fn print_directives(directives: &[DirectiveAnnotation]) -> String {
    directives
        .iter()
        .map(|dir| format!(" @{}{}", dir.name, print_arguments(&dir.arguments)))
        .collect()
}

/// Prints a value literal on a single line.
pub fn print_value(value: &Value) -> String {
    match value {
        Value::Variable(name) => format!("${name}"),
        Value::Int { value, .. } => value.to_string(),
        Value::Float { value, .. } => format!("{value:?}"),
        Value::String { value, .. } => print_string(value),
        Value::Boolean { value, .. } => value.to_string(),
        Value::Null(_) => "null".to_string(),
        Value::Enum(name) => name.value.clone(),
        Value::List { values, .. } => {
            let items: Vec<String> = values.iter().map(print_value).collect();
            format!("[{}]", items.join(", "))
        },
        Value::Object { fields, .. } => {
            let items: Vec<String> = fields
                .iter()
                .map(|field| format!("{}: {}", field.name, print_value(&field.value)))
                .collect();
            format!("{{{}}}", items.join(", "))
        },
    }
}

/// Quotes `value` as a single-line GraphQL string literal.
pub fn print_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c < ' ' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            },
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl std::fmt::Display for OperationDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut printer = Printer::default();
        printer.operation(self);
        f.write_str(&printer.out)
    }
}

impl std::fmt::Display for FragmentDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut printer = Printer::default();
        printer.fragment(self);
        f.write_str(&printer.out)
    }
}

impl std::fmt::Display for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Definition::Operation(op) => op.fmt(f),
            Definition::Fragment(frag) => frag.fmt(f),
        }
    }
}

/// Definitions are separated by one blank line.
impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, def) in self.definitions.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            def.fmt(f)?;
        }
        Ok(())
    }
}
