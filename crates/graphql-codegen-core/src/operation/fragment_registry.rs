use crate::CodegenError;
use crate::loc::SourceLocation;
use crate::operation::OperationDocument;
use graphql_codegen_parser::ast;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

/// Every fragment of a codegen run, by name.
///
/// Building the registry checks names and spreads across all documents:
/// duplicate operation or fragment names, fragment cycles, and spreads of
/// fragments that do not exist, in that order.
#[derive(Debug)]
pub struct FragmentRegistry<'doc> {
    fragments: BTreeMap<&'doc str, &'doc OperationDocument>,
}

impl<'doc> FragmentRegistry<'doc> {
    pub fn build(documents: &'doc [OperationDocument]) -> crate::Result<Self> {
        check_unique_names(documents)?;

        let fragments: BTreeMap<&str, &OperationDocument> = documents
            .iter()
            .filter(|doc| doc.is_fragment())
            .map(|doc| (doc.name.as_str(), doc))
            .collect();
        let registry = Self { fragments };

        if let Some(cycle_path) = registry.find_cycle() {
            return Err(CodegenError::FragmentCycleError { cycle_path });
        }
        for document in documents {
            registry.check_fragment_refs(&document.selection_set)?;
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&'doc OperationDocument> {
        self.fragments.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Names of every fragment `selection_set` uses, directly or through
    /// other fragments, sorted.
    pub fn transitive_fragments(&self, selection_set: &ast::SelectionSet) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut pending: Vec<&ast::Name> = selection_set.fragment_spreads();
        while let Some(name) = pending.pop() {
            if !found.insert(name.value.clone()) {
                continue;
            }
            if let Some(fragment) = self.get(name.as_str()) {
                pending.extend(fragment.selection_set.fragment_spreads());
            }
        }
        found
    }

    /// The first fragment cycle found, normalized to start at its
    /// lexicographically smallest fragment. Fragments are visited in name
    /// order, so the answer is deterministic.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut finished = HashSet::new();
        for name in self.fragments.keys().copied() {
            let mut path = Vec::new();
            let mut visiting = HashSet::new();
            let cycle = self.check_fragment_cycles(name, &mut path, &mut visiting, &mut finished);
            if let Some(cycle) = cycle {
                return Some(normalize_cycle(&cycle));
            }
        }
        None
    }

    fn check_fragment_cycles(
        &self,
        fragment_name: &'doc str,
        path: &mut Vec<&'doc str>,
        visiting: &mut HashSet<&'doc str>,
        finished: &mut HashSet<&'doc str>,
    ) -> Option<Vec<String>> {
        if visiting.contains(fragment_name) {
            let start = path.iter().position(|name| *name == fragment_name).unwrap_or(0);
            let mut cycle: Vec<String> =
                path[start..].iter().map(|name| name.to_string()).collect();
            cycle.push(fragment_name.to_string());
            return Some(cycle);
        }
        if finished.contains(fragment_name) {
            return None;
        }
        // Unknown fragments are reported by the reference check.
        let fragment = self.get(fragment_name)?;

        path.push(fragment_name);
        visiting.insert(fragment_name);
        for spread in fragment.selection_set.fragment_spreads() {
            let spread_name = self
                .fragments
                .get_key_value(spread.as_str())
                .map(|(name, _)| *name);
            if let Some(spread_name) = spread_name
                && let Some(cycle) =
                    self.check_fragment_cycles(spread_name, path, visiting, finished)
            {
                return Some(cycle);
            }
        }
        path.pop();
        visiting.remove(fragment_name);
        finished.insert(fragment_name);
        None
    }

    fn check_fragment_refs(&self, selection_set: &ast::SelectionSet) -> crate::Result<()> {
        for selection in &selection_set.selections {
            match selection {
                ast::Selection::FragmentSpread(spread) => {
                    if !self.fragments.contains_key(spread.name.as_str()) {
                        return Err(CodegenError::UnknownFragment {
                            fragment_name: spread.name.value.clone(),
                            location: SourceLocation::from_span(&spread.span),
                        });
                    }
                },
                ast::Selection::InlineFragment(inline) => {
                    self.check_fragment_refs(&inline.selection_set)?;
                },
                ast::Selection::Field(field) => {
                    if let Some(nested) = &field.selection_set {
                        self.check_fragment_refs(nested)?;
                    }
                },
            }
        }
        Ok(())
    }
}

/// Operations and fragments share one namespace across all files.
fn check_unique_names(documents: &[OperationDocument]) -> crate::Result<()> {
    let mut seen: HashMap<&str, &SourceLocation> = HashMap::new();
    for document in documents {
        if let Some(first_location) = seen.insert(&document.name, &document.location) {
            return Err(CodegenError::DuplicateDefinition {
                name: document.name.clone(),
                first_location: first_location.clone(),
                second_location: document.location.clone(),
            });
        }
    }
    Ok(())
}

/// Rotates a cycle (`[B, C, A, B]`) to start at its smallest name
/// (`[A, B, C, A]`) so the same cycle always reads the same way.
fn normalize_cycle(cycle: &[String]) -> Vec<String> {
    let Some((_, without_repeat)) = cycle.split_last() else {
        return Vec::new();
    };
    let min_idx = without_repeat
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&without_repeat[min_idx..]);
    normalized.extend_from_slice(&without_repeat[..min_idx]);
    if let Some(first) = normalized.first().cloned() {
        normalized.push(first);
    }
    normalized
}
