use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use graphql_codegen_core::CodegenOptions;
use graphql_codegen_core::CustomScalarFormat;
use graphql_codegen_core::OutputFormat;
use graphql_codegen_core::config::DEFAULT_GRAPHQL_FILE_EXTENSION;
use graphql_codegen_core::config::DEFAULT_SCHEMA_FILE_NAME;
use graphql_codegen_core::config::DEFAULT_SINGLE_FILE_NAME;
use graphql_codegen_core::pipeline;
use std::path::PathBuf;

const DEFAULT_PER_OPERATION_DIR: &str = "generated";

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormatArg {
    SingleFile,
    PerOperation,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ScalarFormatArg {
    None,
    Passthrough,
    Prefix,
}

#[derive(Debug, clap::Args)]
pub(crate) struct GenerateCmd {
    #[arg(
        help="Folder holding the schema file. Operation documents are \
             searched for recursively beneath it.",
        name="SCHEMA_FOLDER",
        value_parser=super::parse_schema_folder,
    )]
    schema_folder: PathBuf,

    #[arg(
        default_value="single-file",
        help="Emit one file, or a directory with one file per operation.",
        long,
        value_enum,
    )]
    output_format: OutputFormatArg,

    #[arg(
        help="Output file (single-file) or directory (per-operation). \
             Defaults to `API.rs` or `generated/` inside SCHEMA_FOLDER.",
        long,
    )]
    output: Option<PathBuf>,

    #[arg(
        help="Map a scalar to a Rust type, as `NAME=RUST_TYPE`. May be \
             repeated.",
        long="scalar",
        value_parser=parse_scalar,
    )]
    scalars: Vec<(String, String)>,

    #[arg(
        default_value="none",
        help="How custom scalars without a --scalar mapping are typed.",
        long,
        value_enum,
    )]
    custom_scalar_format: ScalarFormatArg,

    #[arg(
        help="Prefix for custom scalar type names with \
             `--custom-scalar-format prefix`.",
        long,
        required_if_eq("custom_scalar_format", "prefix"),
    )]
    custom_scalar_prefix: Option<String>,

    #[arg(
        help="Leave deprecated enum values out of generated enums.",
        long,
    )]
    omit_deprecated_enum_cases: bool,

    #[arg(
        help="Also write a JSON manifest mapping operation IDs to their \
             documents.",
        long,
    )]
    operation_ids: Option<PathBuf>,

    #[arg(
        default_values_t=[DEFAULT_GRAPHQL_FILE_EXTENSION.to_string()],
        help="Set of file extensions to filter to when searching for \
             operation documents.",
        long,
        value_delimiter = ',',
    )]
    graphql_file_exts: Vec<String>,

    #[arg(
        default_value=DEFAULT_SCHEMA_FILE_NAME,
        help="Name of the schema file within SCHEMA_FOLDER.",
        long,
    )]
    schema_file_name: String,
}

impl GenerateCmd {
    fn codegen_options(self, cli: &Cli) -> CodegenOptions {
        let schema_folder = cli.resolve_path(&self.schema_folder);
        let mut options = CodegenOptions::new(schema_folder.clone());
        options.schema_file_name = self.schema_file_name;
        options.graphql_file_extensions = self
            .graphql_file_exts
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();

        options.output_format = match self.output_format {
            OutputFormatArg::SingleFile => OutputFormat::SingleFile(
                self.output
                    .map(|path| cli.resolve_path(&path))
                    .unwrap_or_else(|| schema_folder.join(DEFAULT_SINGLE_FILE_NAME)),
            ),
            OutputFormatArg::PerOperation => OutputFormat::PerOperation(
                self.output
                    .map(|path| cli.resolve_path(&path))
                    .unwrap_or_else(|| schema_folder.join(DEFAULT_PER_OPERATION_DIR)),
            ),
        };

        options.custom_scalar_format = match self.custom_scalar_format {
            ScalarFormatArg::None => CustomScalarFormat::None,
            ScalarFormatArg::Passthrough => CustomScalarFormat::Passthrough,
            ScalarFormatArg::Prefix => CustomScalarFormat::PassthroughWithPrefix(
                self.custom_scalar_prefix.unwrap_or_default(),
            ),
        };
        options.scalar_overrides = self.scalars.into_iter().collect();
        options.omit_deprecated_enum_cases = self.omit_deprecated_enum_cases;
        options.operation_ids_path = self.operation_ids.map(|path| cli.resolve_path(&path));
        options
    }
}

#[inherent::inherent]
impl RunnableCommand for GenerateCmd {
    pub async fn run(self, cli: Cli) -> CommandResult {
        let options = self.codegen_options(&cli);

        if let Err(e) = std::fs::create_dir_all(&options.schema_folder) {
            return CommandResult::stderr(format_args!(
                "{} Could not create {:#?}: {e}",
                output_utils::RED_X,
                options.schema_folder,
            ));
        }

        log::debug!(
            "Generating code for operations beneath {:#?}...",
            options.schema_folder,
        );
        let result =
            tokio::task::spawn_blocking(move || pipeline::run_codegen(&options)).await;

        match result {
            Ok(Ok(summary)) => {
                let written: Vec<String> = summary
                    .written_files
                    .iter()
                    .map(|path| format!("  * Wrote {}", path.display()))
                    .collect();
                CommandResult::stdout(format_args!(
                    concat!(
                        "{} Generated code successfully:\n",
                        "  * Analyzed {} operation files.\n",
                        "  * Bound {} operations and {} fragments.\n",
                        "{}",
                    ),
                    output_utils::GREEN_CHECK,
                    summary.operation_files,
                    summary.operations,
                    summary.fragments,
                    written.join("\n"),
                ))
            },

            Ok(Err(e)) => CommandResult::stderr(format_args!(
                "{} Code generation failed:\n{e}",
                output_utils::RED_X,
            )),

            Err(e) => CommandResult::stderr(format_args!(
                "{} Code generation did not finish: {e}",
                output_utils::RED_X,
            )),
        }
    }
}

fn parse_scalar(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, rust_type)) if !name.trim().is_empty() && !rust_type.trim().is_empty() => {
            Ok((name.trim().to_string(), rust_type.trim().to_string()))
        },
        _ => Err(format!("expected `NAME=RUST_TYPE`, got `{raw}`")),
    }
}
