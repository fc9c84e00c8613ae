//! The two end-to-end flows: downloading a schema, and generating code for
//! the operation documents next to it.

use crate::CodegenError;
use crate::CodegenOptions;
use crate::OutputFormat;
use crate::SchemaDownloadOptions;
use crate::SyntaxError;
use crate::atomic_write::write_atomic;
use crate::emitter::Emitter;
use crate::emitter::GENERATED_HEADER;
use crate::emitter::GeneratedFile;
use crate::fetcher::SchemaFetcher;
use crate::file_reader::ReadContentError;
use crate::file_reader::read_content;
use crate::operation::Binder;
use crate::operation::BoundOperation;
use crate::operation::FragmentRegistry;
use crate::operation::OperationDocument;
use crate::schema::load_schema_file;
use graphql_codegen_parser::GraphQLParser;
use rayon::prelude::IntoParallelRefIterator;
use rayon::prelude::ParallelIterator;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

/// What a successful [`run_codegen`] did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodegenSummary {
    pub operation_files: usize,
    pub operations: usize,
    pub fragments: usize,
    pub written_files: Vec<PathBuf>,
}

/// Fetches the schema and persists it as introspection JSON. The schema
/// file is only touched once the fetched schema has been validated.
pub async fn download_schema(options: &SchemaDownloadOptions) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(&options.output_folder).map_err(|source| {
        CodegenError::EmissionIOError {
            path: options.output_folder.clone(),
            source,
        }
    })?;

    let fetcher = SchemaFetcher::new(options.clone())?;
    let schema = fetcher.fetch().await?;

    let schema_path = options.schema_path();
    let json = schema
        .to_introspection_json()
        .map_err(|err| CodegenError::EmissionIOError {
            path: schema_path.clone(),
            source: err.into(),
        })?;
    write_atomic(&schema_path, json.as_bytes()).map_err(|source| {
        CodegenError::EmissionIOError {
            path: schema_path.clone(),
            source,
        }
    })?;

    tracing::info!(
        "saved schema with {} types to {}",
        schema.types().len(),
        schema_path.display(),
    );
    Ok(schema_path)
}

/// Loads the schema, parses and binds every operation file beneath the
/// schema folder, and writes the generated code.
///
/// Syntax errors from all files are reported together; every later stage
/// stops at its first error. Nothing is written unless every stage
/// succeeded.
pub fn run_codegen(options: &CodegenOptions) -> crate::Result<CodegenSummary> {
    let schema = load_schema_file(options.schema_path())?;

    let file_paths = discover_operation_files(options)?;
    tracing::debug!("found {} operation file(s)", file_paths.len());
    let documents = parse_operation_files(&file_paths)?;

    let registry = FragmentRegistry::build(&documents)?;
    let binder = Binder::new(&schema, &registry);

    let mut operations: Vec<&OperationDocument> =
        documents.iter().filter(|doc| !doc.is_fragment()).collect();
    operations.sort_by(|a, b| a.name.cmp(&b.name));
    let bound = operations
        .into_iter()
        .map(|operation| binder.bind_operation(operation))
        .collect::<crate::Result<Vec<BoundOperation>>>()?;
    for fragment in documents.iter().filter(|doc| doc.is_fragment()) {
        binder.check_fragment(fragment)?;
    }

    let files = Emitter::new(&schema, options)?.emit(&bound)?;
    write_generated_files(&files)?;
    if let OutputFormat::PerOperation(dir) = &options.output_format {
        remove_stale_generated_files(dir, &files)?;
    }

    let summary = CodegenSummary {
        operation_files: file_paths.len(),
        operations: bound.len(),
        fragments: registry.len(),
        written_files: files.into_iter().map(|file| file.path).collect(),
    };
    tracing::info!(
        "generated {} operation(s) and {} fragment(s) from {} file(s)",
        summary.operations,
        summary.fragments,
        summary.operation_files,
    );
    Ok(summary)
}

/// Operation files under the schema folder, symlinks followed, sorted by
/// path.
fn discover_operation_files(options: &CodegenOptions) -> crate::Result<Vec<PathBuf>> {
    let mut file_paths = Vec::new();
    for entry in WalkDir::new(&options.schema_folder).follow_links(true) {
        let entry = entry.map_err(|err| CodegenError::OperationFileError {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| options.schema_folder.clone()),
            message: err.to_string(),
        })?;
        if entry.file_type().is_file() && options.is_operation_file(entry.path()) {
            tracing::trace!("found operation file {}", entry.path().display());
            file_paths.push(entry.into_path());
        }
    }
    file_paths.sort();
    Ok(file_paths)
}

enum ParsedFile {
    Documents(Vec<OperationDocument>),
    SyntaxErrors(Vec<SyntaxError>),
    Unreadable(ReadContentError),
}

/// Parses every file on the rayon pool. Results keep the order of
/// `file_paths`, so errors and definitions come out deterministically.
fn parse_operation_files(file_paths: &[PathBuf]) -> crate::Result<Vec<OperationDocument>> {
    let parsed: Vec<ParsedFile> = file_paths
        .par_iter()
        .map(|path| parse_operation_file(path))
        .collect();

    let mut documents = Vec::new();
    let mut syntax_errors = Vec::new();
    for file in parsed {
        match file {
            ParsedFile::Documents(docs) => documents.extend(docs),
            ParsedFile::SyntaxErrors(errors) => syntax_errors.extend(errors),
            ParsedFile::Unreadable(err) => {
                return Err(CodegenError::OperationFileError {
                    path: err.path().to_path_buf(),
                    message: err.to_string(),
                });
            },
        }
    }

    if syntax_errors.is_empty() {
        Ok(documents)
    } else {
        Err(CodegenError::SyntaxErrors(syntax_errors))
    }
}

fn parse_operation_file(path: &Path) -> ParsedFile {
    let source = match read_content(path) {
        Ok(source) => source,
        Err(err) => return ParsedFile::Unreadable(err),
    };
    let parser = GraphQLParser::with_file_path(&source, Arc::new(path.to_path_buf()));
    match parser.parse_executable_document().into_result() {
        Ok(document) => ParsedFile::Documents(OperationDocument::from_document(path, document)),
        Err(errors) => ParsedFile::SyntaxErrors(
            errors
                .iter()
                .map(|err| SyntaxError::from_parse_error(path.to_path_buf(), err))
                .collect(),
        ),
    }
}

fn write_generated_files(files: &[GeneratedFile]) -> crate::Result<()> {
    for file in files {
        write_atomic(&file.path, file.contents.as_bytes()).map_err(|source| {
            CodegenError::EmissionIOError {
                path: file.path.clone(),
                source,
            }
        })?;
    }
    Ok(())
}

/// Deletes `.rs` files in `dir` left behind by an earlier run, such as the
/// module of a renamed operation. Only files starting with
/// [`GENERATED_HEADER`] are touched.
fn remove_stale_generated_files(dir: &Path, written: &[GeneratedFile]) -> crate::Result<()> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| CodegenError::EmissionIOError { path, source }
    };

    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        let is_rust_file = path.is_file() && path.extension().is_some_and(|ext| ext == "rs");
        if !is_rust_file || written.iter().any(|file| file.path == path) {
            continue;
        }
        let contents = std::fs::read(&path).map_err(io_error(&path))?;
        if contents.starts_with(GENERATED_HEADER.as_bytes()) {
            tracing::info!("removing stale generated file {}", path.display());
            std::fs::remove_file(&path).map_err(io_error(&path))?;
        }
    }
    Ok(())
}
