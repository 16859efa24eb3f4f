use crate::grade_cmd::run_grade;
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use warroom_scoring::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "War Room Scoring Service",
    about = "Run and exercise the Market Intelligence War Room scoring service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Grade a submission JSON file offline and print the result
    Grade(GradeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Path to the submission JSON document
    pub(crate) submission: PathBuf,
    /// Reference dataset overriding the embedded default
    #[arg(long)]
    pub(crate) reference: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Grade(args) => run_grade(args),
    }
}
