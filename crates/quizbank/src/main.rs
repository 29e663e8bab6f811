use crate::prelude::*;
use clap::Parser;

mod error;
mod extract;
mod merge;
mod parse;
mod prelude;
mod store;
mod summary;
mod verify;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Build, merge and check the EPSF quiz question bank"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "QUIZBANK_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Parse a raw question text file into a JSON collection
    Parse(crate::parse::App),

    /// Merge several collections into one, renumbering questions
    Merge(crate::merge::App),

    /// Print health statistics for a collection
    Verify(crate::verify::App),

    /// List the collections found in a data directory
    Summary(crate::summary::App),

    /// Build draft questions from a PDF, one question per page
    Extract(crate::extract::App),
}

fn init_logging(global: &Global) {
    let default_level = if global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    init_logging(&app.global);

    match app.command {
        SubCommands::Parse(sub_app) => crate::parse::run(sub_app, app.global),
        SubCommands::Merge(sub_app) => crate::merge::run(sub_app, app.global),
        SubCommands::Verify(sub_app) => crate::verify::run(sub_app, app.global),
        SubCommands::Summary(sub_app) => crate::summary::run(sub_app, app.global),
        SubCommands::Extract(sub_app) => crate::extract::run(sub_app, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
