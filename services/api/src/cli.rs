use crate::report::{run_analyze, run_rubric, run_score, AnalyzeArgs, ScoreArgs};
use crate::server;
use call_qa::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "call-qa",
    about = "Score recorded collection calls against the quality-assurance rubric",
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
    /// Print the evaluation rubric and the maximum attainable score
    Rubric,
    /// Validate a saved analysis JSON file and print its totals
    Score(ScoreArgs),
    /// Transcribe and score a local recording with the configured providers
    Analyze(AnalyzeArgs),
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
        Command::Rubric => {
            run_rubric();
            Ok(())
        }
        Command::Score(args) => run_score(args).await,
        Command::Analyze(args) => run_analyze(args).await,
    }
}
