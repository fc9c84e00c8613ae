use clap::CommandFactory;
use crate::commands;
use std::path::Path;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "graphql-codegen", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    #[arg(
        default_value=".",
        global=true,
        help="Directory that relative schema folders and output paths are \
             resolved against.",
        long,
    )]
    pub source_root: PathBuf,

    #[arg(
        global=true,
        help="Enable verbose output.",
        long,
        short='v',
    )]
    pub verbose: bool,
}
impl Cli {
    pub(crate) async fn run_default(self) -> anyhow::Result<()> {
        Self::command().print_help()?;
        Ok(())
    }

    /// `path` as seen from `--source-root`. Absolute paths are kept as-is.
    pub(crate) fn resolve_path(&self, path: &Path) -> PathBuf {
        self.source_root.join(path)
    }
}
