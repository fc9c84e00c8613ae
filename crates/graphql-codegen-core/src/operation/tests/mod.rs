mod binder_tests;

use crate::operation::OperationDocument;
use graphql_codegen_parser::GraphQLParser;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// Parses each `(path, source)` pair and splits the results into
/// operation documents, in order.
pub(super) fn documents(files: &[(&str, &str)]) -> Vec<OperationDocument> {
    files
        .iter()
        .flat_map(|(path, source)| {
            let document = GraphQLParser::with_file_path(source, Arc::new(PathBuf::from(path)))
                .parse_executable_document()
                .into_result()
                .expect("test source parses");
            OperationDocument::from_document(Path::new(path), document)
        })
        .collect()
}
