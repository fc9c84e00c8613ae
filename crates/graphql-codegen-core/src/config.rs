//! Options for the two pipelines. The CLI fills these in from its flags;
//! library callers build them directly.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SCHEMA_FILE_NAME: &str = "schema.json";
pub const DEFAULT_SINGLE_FILE_NAME: &str = "API.rs";
pub const DEFAULT_GRAPHQL_FILE_EXTENSION: &str = "graphql";
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Everything [`download_schema`](crate::pipeline::download_schema) needs.
#[derive(Clone, Debug)]
pub struct SchemaDownloadOptions {
    pub endpoint: Url,
    pub output_folder: PathBuf,
    pub schema_file_name: String,

    /// Sent with the introspection request, in order.
    pub headers: Vec<(String, String)>,

    /// Applies to each attempt separately. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Extra attempts after a timeout, connection failure or 5xx response.
    pub max_retries: u32,

    /// Wait before the first retry; doubled before each further one.
    pub retry_backoff: Duration,
}

impl SchemaDownloadOptions {
    pub fn new(endpoint: Url, output_folder: impl Into<PathBuf>) -> Self {
        Self {
            endpoint,
            output_folder: output_folder.into(),
            schema_file_name: DEFAULT_SCHEMA_FILE_NAME.to_string(),
            headers: Vec::new(),
            timeout: None,
            max_retries: 0,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn schema_path(&self) -> PathBuf {
        self.output_folder.join(&self.schema_file_name)
    }
}

/// Where generated code goes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// One file holding the shared types and every operation module.
    SingleFile(PathBuf),

    /// A directory with `mod.rs`, `schema_types.rs` and one file per
    /// operation.
    PerOperation(PathBuf),
}

/// How schema scalars other than the five built-ins are typed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CustomScalarFormat {
    /// Every custom scalar is a `String`.
    #[default]
    None,

    /// A custom scalar `DateTime` is referred to as `DateTime`; the crate
    /// using the generated code provides that type.
    Passthrough,

    /// Like `Passthrough`, with a prefix: `Api` turns `DateTime` into
    /// `ApiDateTime`.
    PassthroughWithPrefix(String),
}

/// Everything [`run_codegen`](crate::pipeline::run_codegen) needs.
#[derive(Clone, Debug)]
pub struct CodegenOptions {
    /// Holds the schema file; operation documents are searched for
    /// beneath it.
    pub schema_folder: PathBuf,
    pub schema_file_name: String,

    /// Without the leading dot.
    pub graphql_file_extensions: Vec<String>,

    pub output_format: OutputFormat,
    pub custom_scalar_format: CustomScalarFormat,

    /// Scalar name to Rust type path; wins over `custom_scalar_format` and
    /// over the built-in mappings.
    pub scalar_overrides: BTreeMap<String, String>,

    pub omit_deprecated_enum_cases: bool,

    /// Where to write the operation ID manifest, if anywhere.
    pub operation_ids_path: Option<PathBuf>,
}

impl CodegenOptions {
    pub fn new(schema_folder: impl Into<PathBuf>) -> Self {
        let schema_folder = schema_folder.into();
        Self {
            output_format: OutputFormat::SingleFile(schema_folder.join(DEFAULT_SINGLE_FILE_NAME)),
            schema_folder,
            schema_file_name: DEFAULT_SCHEMA_FILE_NAME.to_string(),
            graphql_file_extensions: vec![DEFAULT_GRAPHQL_FILE_EXTENSION.to_string()],
            custom_scalar_format: CustomScalarFormat::default(),
            scalar_overrides: BTreeMap::new(),
            omit_deprecated_enum_cases: false,
            operation_ids_path: None,
        }
    }

    pub fn schema_path(&self) -> PathBuf {
        self.schema_folder.join(&self.schema_file_name)
    }

    /// Extensions compare case-insensitively.
    pub fn is_operation_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.graphql_file_extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}
