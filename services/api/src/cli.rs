use crate::demo::{run_demo, run_exam_assess, AssessArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ocular_triage::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Ocular Triage Console",
    about = "Serve and exercise the neuro-ophthalmic differential engine from the command line",
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
    /// Score exam findings without starting the service
    Exam {
        #[command(subcommand)]
        command: ExamCommand,
    },
    /// Run an end-to-end CLI demo over canned exam sessions
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ExamCommand {
    /// Assess a session findings file and print the ranked differential
    Assess(AssessArgs),
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
        Command::Exam {
            command: ExamCommand::Assess(args),
        } => run_exam_assess(args),
        Command::Demo(args) => run_demo(args),
    }
}
