use crate::demo::{
    run_demo, run_status_check, run_transcript, DemoArgs, StatusCheckArgs, TranscriptArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gradebook::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Gradebook",
    about = "Issue academic transcripts and check grade workflow transitions",
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
    /// Build a transcript from an enrollment CSV export
    Transcript(TranscriptArgs),
    /// Workflow status guard utilities
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
    /// Print transcripts for the seeded demo cohort
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    /// Check whether a status change is permitted
    Check(StatusCheckArgs),
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

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Transcript(args) => run_transcript(args),
        Command::Status {
            command: StatusCommand::Check(args),
        } => run_status_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
