//! Resolves operations against the schema and flattens their fragments.

use crate::CodegenError;
use crate::loc::SourceLocation;
use crate::operation::BoundField;
use crate::operation::BoundOperation;
use crate::operation::BoundSelectionSet;
use crate::operation::BoundVariable;
use crate::operation::FragmentRegistry;
use crate::operation::OperationDocument;
use crate::schema::FieldDefinition;
use crate::schema::SchemaDocument;
use crate::schema::TypeRef;
use graphql_codegen_parser::ast;
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::collections::HashSet;

/// A field seen one or more times under the same response key, waiting
/// for its sub-selections to be merged and bound.
struct PendingField<'ast> {
    field_name: String,

    /// The type the first selection of this response key was made on.
    parent_type: String,
    definition: FieldDefinition,
    conditional: bool,

    /// Each selection set with whether it was reached only through a
    /// narrowing fragment or `@skip`/`@include`.
    sub_selections: Vec<(&'ast ast::SelectionSet, bool)>,
    location: SourceLocation,
}

/// Variables an operation declares. `None` while checking a fragment on
/// its own, where any variable may be in scope.
type DeclaredVariables<'v> = Option<&'v HashSet<&'v str>>;

pub struct Binder<'a> {
    schema: &'a SchemaDocument,
    fragments: &'a FragmentRegistry<'a>,
}

impl<'a> Binder<'a> {
    pub fn new(schema: &'a SchemaDocument, fragments: &'a FragmentRegistry<'a>) -> Self {
        Self { schema, fragments }
    }

    /// Binds one operation. Stops at the first problem.
    pub fn bind_operation(&self, operation: &OperationDocument) -> crate::Result<BoundOperation> {
        let Some(kind) = operation.operation_kind() else {
            return Err(CodegenError::InvalidSelection {
                message: format!("`{}` is a fragment, not an operation", operation.name),
                location: operation.location.clone(),
            });
        };
        let root_type = self.schema.root_type_name(kind).ok_or_else(|| {
            CodegenError::MissingRootType {
                operation_name: operation.name.clone(),
                operation_kind: kind,
                location: operation.location.clone(),
            }
        })?;

        let variables = self.bind_variables(operation)?;
        let declared: HashSet<&str> = variables.iter().map(|var| var.name.as_str()).collect();
        check_directive_variables(&operation.directives, Some(&declared))?;
        let selection = self.bind_selection_sets(
            root_type,
            &[(&operation.selection_set, false)],
            Some(&declared),
        )?;

        let fragment_names: Vec<String> = self
            .fragments
            .transitive_fragments(&operation.selection_set)
            .into_iter()
            .collect();
        let mut document = operation.source_text.clone();
        for name in &fragment_names {
            if let Some(fragment) = self.fragments.get(name) {
                document.push('\n');
                document.push_str(&fragment.source_text);
            }
        }

        tracing::debug!("bound {} `{}`", kind, operation.name);
        Ok(BoundOperation {
            name: operation.name.clone(),
            kind,
            root_type: root_type.to_string(),
            variables,
            selection,
            document,
            fragment_names,
            location: operation.location.clone(),
        })
    }

    /// Checks a fragment's selections against its type condition, so that
    /// fragments no operation uses are still validated.
    pub fn check_fragment(&self, fragment: &OperationDocument) -> crate::Result<()> {
        let Some(type_condition) = fragment.type_condition() else {
            return Ok(());
        };
        self.check_type_condition(type_condition, type_condition, &fragment.location)?;
        self.bind_selection_sets(type_condition, &[(&fragment.selection_set, false)], None)?;
        Ok(())
    }

    fn bind_variables(&self, operation: &OperationDocument) -> crate::Result<Vec<BoundVariable>> {
        let mut variables: Vec<BoundVariable> = Vec::new();
        for definition in &operation.variable_definitions {
            let location = SourceLocation::from_span(&definition.span);
            let name = definition.variable.value.clone();
            if variables.iter().any(|var| var.name == name) {
                return Err(CodegenError::InvalidSelection {
                    message: format!("variable `${name}` is declared more than once"),
                    location,
                });
            }

            let type_ref = TypeRef::from_annotation(&definition.var_type);
            let type_name = type_ref.innermost_name();
            match self.schema.type_(type_name) {
                None => {
                    return Err(CodegenError::UnknownTypeError {
                        type_name: type_name.to_string(),
                        location,
                    });
                },
                Some(type_def) if !type_def.is_input_type() => {
                    return Err(CodegenError::InvalidSelection {
                        message: format!(
                            "variable `${name}` has {} type `{type_name}`, which is not an input type",
                            type_def.kind_name(),
                        ),
                        location,
                    });
                },
                Some(_) => (),
            }

            variables.push(BoundVariable {
                name,
                type_ref,
                default_value: definition.default_value.clone(),
            });
        }
        Ok(variables)
    }

    /// Binds the merged `selection_sets` of one field. A set flagged as
    /// conditional contributes fields that may be absent from the response.
    fn bind_selection_sets(
        &self,
        type_name: &str,
        selection_sets: &[(&ast::SelectionSet, bool)],
        variables: DeclaredVariables<'_>,
    ) -> crate::Result<BoundSelectionSet> {
        let mut pending = IndexMap::new();
        for (selection_set, conditional) in selection_sets {
            self.collect_fields(type_name, selection_set, *conditional, &mut pending, variables)?;
        }

        let fields = pending
            .into_iter()
            .map(|(response_key, field)| self.bind_field(response_key, field, variables))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(BoundSelectionSet {
            type_name: type_name.to_string(),
            fields,
        })
    }

    /// Gathers the fields `selection_set` selects on `type_name`, merging
    /// fragments into the same field list.
    fn collect_fields<'ast>(
        &self,
        type_name: &str,
        selection_set: &'ast ast::SelectionSet,
        conditional: bool,
        pending: &mut IndexMap<String, PendingField<'ast>>,
        variables: DeclaredVariables<'_>,
    ) -> crate::Result<()>
    where
        'a: 'ast,
    {
        for selection in &selection_set.selections {
            match selection {
                ast::Selection::Field(field) => {
                    self.collect_field(type_name, field, conditional, pending, variables)?;
                },
                ast::Selection::FragmentSpread(spread) => {
                    let location = SourceLocation::from_span(&spread.span);
                    let fragment = self.fragments.get(spread.name.as_str()).ok_or_else(|| {
                        CodegenError::UnknownFragment {
                            fragment_name: spread.name.value.clone(),
                            location: location.clone(),
                        }
                    })?;
                    check_directive_variables(&spread.directives, variables)?;
                    let condition = fragment.type_condition().unwrap_or(type_name);
                    let narrows = self.check_type_condition(condition, type_name, &location)?;
                    self.collect_fields(
                        condition,
                        &fragment.selection_set,
                        conditional || narrows || has_conditional_directive(&spread.directives),
                        pending,
                        variables,
                    )?;
                },
                ast::Selection::InlineFragment(inline) => {
                    let location = SourceLocation::from_span(&inline.span);
                    check_directive_variables(&inline.directives, variables)?;
                    let condition = inline
                        .type_condition
                        .as_ref()
                        .map_or(type_name, |name| name.as_str());
                    let narrows = self.check_type_condition(condition, type_name, &location)?;
                    self.collect_fields(
                        condition,
                        &inline.selection_set,
                        conditional || narrows || has_conditional_directive(&inline.directives),
                        pending,
                        variables,
                    )?;
                },
            }
        }
        Ok(())
    }

    fn collect_field<'ast>(
        &self,
        type_name: &str,
        field: &'ast ast::Field,
        conditional: bool,
        pending: &mut IndexMap<String, PendingField<'ast>>,
        variables: DeclaredVariables<'_>,
    ) -> crate::Result<()> {
        let location = SourceLocation::from_span(&field.span);
        let definition = self
            .field_definition(type_name, field.name.as_str())
            .ok_or_else(|| CodegenError::UnknownFieldError {
                type_name: type_name.to_string(),
                field_name: field.name.value.clone(),
                location: location.clone(),
            })?;

        for argument in &field.arguments {
            if !definition.arguments.contains_key(argument.name.as_str()) {
                return Err(CodegenError::InvalidSelection {
                    message: format!(
                        "field `{type_name}.{}` has no argument `{}`",
                        field.name, argument.name,
                    ),
                    location: SourceLocation::from_span(&argument.span),
                });
            }
        }
        check_argument_variables(&field.arguments, variables)?;
        check_directive_variables(&field.directives, variables)?;

        let conditional = conditional || has_conditional_directive(&field.directives);
        match pending.entry(field.response_key().to_string()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                // Selections on two different object types never apply to
                // the same value, so only their response shapes must agree.
                let same_field_required =
                    !self.disjoint_object_types(&existing.parent_type, type_name);
                if (same_field_required && existing.field_name != field.name.value)
                    || existing.definition.type_ref != definition.type_ref
                {
                    return Err(CodegenError::InvalidSelection {
                        message: format!(
                            "response key `{}` selects both `{}: {}` and `{}: {}`",
                            field.response_key(),
                            existing.field_name,
                            existing.definition.type_ref,
                            field.name,
                            definition.type_ref,
                        ),
                        location,
                    });
                }
                existing.conditional &= conditional;
                existing
                    .sub_selections
                    .extend(field.selection_set.iter().map(|set| (set, conditional)));
            },
            Entry::Vacant(entry) => {
                entry.insert(PendingField {
                    field_name: field.name.value.clone(),
                    parent_type: type_name.to_string(),
                    definition,
                    conditional,
                    sub_selections: field
                        .selection_set
                        .iter()
                        .map(|set| (set, conditional))
                        .collect(),
                    location,
                });
            },
        }
        Ok(())
    }

    fn bind_field(
        &self,
        response_key: String,
        field: PendingField<'_>,
        variables: DeclaredVariables<'_>,
    ) -> crate::Result<BoundField> {
        let type_ref = field.definition.type_ref;
        let type_name = type_ref.innermost_name();
        let field_type = self.schema.type_(type_name).ok_or_else(|| {
            CodegenError::UnknownTypeError {
                type_name: type_name.to_string(),
                location: field.location.clone(),
            }
        })?;

        let selection = if field_type.is_composite() {
            if field.sub_selections.is_empty() {
                return Err(CodegenError::InvalidSelection {
                    message: format!(
                        "field `{}` of type `{type_ref}` must have a selection of subfields",
                        field.field_name,
                    ),
                    location: field.location,
                });
            }
            // A field selected along a single path is present exactly when
            // its sub-fields are, even if that path is conditional.
            let single_path = field.sub_selections.len() == 1;
            let sub_selections: Vec<(&ast::SelectionSet, bool)> = field
                .sub_selections
                .iter()
                .map(|(set, conditional)| (*set, *conditional && !single_path))
                .collect();
            Some(self.bind_selection_sets(type_name, &sub_selections, variables)?)
        } else {
            if !field.sub_selections.is_empty() {
                return Err(CodegenError::InvalidSelection {
                    message: format!(
                        "field `{}` of {} type `{type_ref}` cannot have a selection of subfields",
                        field.field_name,
                        field_type.kind_name(),
                    ),
                    location: field.location,
                });
            }
            None
        };

        Ok(BoundField {
            response_key,
            field_name: field.field_name,
            type_ref,
            selection,
            conditional: field.conditional,
            location: field.location,
        })
    }

    fn disjoint_object_types(&self, first: &str, second: &str) -> bool {
        let is_object = |name: &str| {
            self.schema
                .type_(name)
                .is_some_and(|type_def| type_def.as_object().is_some())
        };
        first != second && is_object(first) && is_object(second)
    }

    /// `__typename` resolves on every composite type.
    fn field_definition(&self, type_name: &str, field_name: &str) -> Option<FieldDefinition> {
        if field_name == "__typename" {
            return Some(FieldDefinition::typename());
        }
        self.schema
            .type_(type_name)?
            .fields()?
            .get(field_name)
            .cloned()
    }

    /// Checks that a fragment on `condition` may appear where a
    /// `parent_type` is selected. Returns whether it narrows the type, i.e.
    /// applies to only some values of `parent_type`.
    fn check_type_condition(
        &self,
        condition: &str,
        parent_type: &str,
        location: &SourceLocation,
    ) -> crate::Result<bool> {
        let Some(condition_type) = self.schema.type_(condition) else {
            return Err(CodegenError::UnknownTypeError {
                type_name: condition.to_string(),
                location: location.clone(),
            });
        };
        if !condition_type.is_composite() {
            return Err(CodegenError::InvalidSelection {
                message: format!(
                    "fragment type condition `{condition}` is a {} type, not an object, interface or union",
                    condition_type.kind_name(),
                ),
                location: location.clone(),
            });
        }
        if !self.schema.fragment_can_apply(condition, parent_type) {
            return Err(CodegenError::InvalidSelection {
                message: format!("a fragment on `{condition}` can never apply to `{parent_type}`"),
                location: location.clone(),
            });
        }
        Ok(!self.schema.fragment_always_applies(condition, parent_type))
    }
}

fn check_directive_variables(
    directives: &[ast::DirectiveAnnotation],
    variables: DeclaredVariables<'_>,
) -> crate::Result<()> {
    for directive in directives {
        check_argument_variables(&directive.arguments, variables)?;
    }
    Ok(())
}

fn check_argument_variables(
    arguments: &[ast::Argument],
    variables: DeclaredVariables<'_>,
) -> crate::Result<()> {
    let Some(declared) = variables else {
        return Ok(());
    };
    for argument in arguments {
        if let Some(name) = argument
            .value
            .variables()
            .into_iter()
            .find(|name| !declared.contains(name))
        {
            return Err(CodegenError::InvalidSelection {
                message: format!("variable `${name}` is not declared by the operation"),
                location: SourceLocation::from_span(&argument.span),
            });
        }
    }
    Ok(())
}

fn has_conditional_directive(directives: &[ast::DirectiveAnnotation]) -> bool {
    directives
        .iter()
        .any(|directive| matches!(directive.name.as_str(), "skip" | "include"))
}
