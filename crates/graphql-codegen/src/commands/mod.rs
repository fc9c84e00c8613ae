mod download_schema;
mod generate;

use crate::Cli;
use crate::CommandResult;
use download_schema::DownloadSchemaCmd;
use generate::GenerateCmd;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "graphql-codegen")]
pub(crate) enum CommandEnum {
    /// Download a schema through introspection and save it as JSON.
    DownloadSchema(Box<DownloadSchemaCmd>),

    /// Generate Rust for every operation document beneath a schema folder.
    Generate(Box<GenerateCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::DownloadSchema(cmd) => cmd.run(cli).await,
            Self::Generate(cmd) => cmd.run(cli).await,
        }
    }
}

fn parse_schema_folder(raw: &str) -> Result<PathBuf, String> {
    if raw.trim().is_empty() {
        return Err("the schema folder must not be empty".to_string());
    }
    Ok(PathBuf::from(raw))
}
