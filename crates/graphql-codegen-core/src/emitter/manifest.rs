use crate::emitter::operation_module::operation_id;
use crate::operation::BoundOperation;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    name: &'a str,
    source: &'a str,
}

/// The operation-ID manifest: `{"<id>": {"name": ..., "source": ...}}`,
/// sorted by id, for servers that accept persisted queries.
pub(crate) fn render_manifest(operations: &[&BoundOperation]) -> Result<String, serde_json::Error> {
    let entries: BTreeMap<String, ManifestEntry<'_>> = operations
        .iter()
        .map(|operation| {
            let entry = ManifestEntry {
                name: &operation.name,
                source: &operation.document,
            };
            (operation_id(&operation.document), entry)
        })
        .collect();
    let mut json = serde_json::to_string_pretty(&entries)?;
    json.push('\n');
    Ok(json)
}
