use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use graphql_codegen_core::SchemaDownloadOptions;
use graphql_codegen_core::config::DEFAULT_SCHEMA_FILE_NAME;
use graphql_codegen_core::pipeline;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, clap::Args)]
pub(crate) struct DownloadSchemaCmd {
    #[arg(
        help="Folder to save the schema in. Created if it does not exist.",
        name="SCHEMA_FOLDER",
        value_parser=super::parse_schema_folder,
    )]
    schema_folder: PathBuf,

    #[arg(
        help="URL of the GraphQL endpoint to introspect.",
        name="ENDPOINT_URL",
        value_parser=parse_endpoint,
    )]
    endpoint: Url,

    #[arg(
        help="Extra request header, as `NAME:VALUE`. May be repeated.",
        long="header",
        value_parser=parse_header,
    )]
    headers: Vec<(String, String)>,

    #[arg(
        help="Give up on an attempt after this many seconds.",
        long,
    )]
    timeout_secs: Option<u64>,

    #[arg(
        default_value_t=0,
        help="Retry this many times after a timeout, connection failure or \
             5xx response.",
        long,
    )]
    max_retries: u32,

    #[arg(
        default_value=DEFAULT_SCHEMA_FILE_NAME,
        help="Name of the schema file within SCHEMA_FOLDER.",
        long,
    )]
    schema_file_name: String,
}

#[inherent::inherent]
impl RunnableCommand for DownloadSchemaCmd {
    pub async fn run(self, cli: Cli) -> CommandResult {
        let schema_folder = cli.resolve_path(&self.schema_folder);

        let mut options = SchemaDownloadOptions::new(self.endpoint, schema_folder);
        options.schema_file_name = self.schema_file_name;
        options.headers = self.headers;
        options.timeout = self.timeout_secs.map(Duration::from_secs);
        options.max_retries = self.max_retries;

        log::debug!(
            "Downloading schema from `{}` into {:#?}...",
            options.endpoint,
            options.schema_path(),
        );
        match pipeline::download_schema(&options).await {
            Ok(path) => CommandResult::stdout(format_args!(
                "{} Saved schema to {}.",
                output_utils::GREEN_CHECK,
                path.display(),
            )),

            Err(e) => CommandResult::stderr(format_args!(
                "{} Schema download failed: {e}",
                output_utils::RED_X,
            )),
        }
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, String> {
    if raw.trim().is_empty() {
        return Err("the endpoint URL must not be empty".to_string());
    }
    let url = Url::parse(raw).map_err(|e| format!("`{raw}` is not a valid URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported URL scheme `{other}`; expected http or https")),
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        },
        _ => Err(format!("expected `NAME:VALUE`, got `{raw}`")),
    }
}
