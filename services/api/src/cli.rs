use crate::demo::{run_checklist_report, run_demo, ChecklistReportArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lawcheck::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "lawcheck",
    about = "Track law-school credits and check bar-exam eligibility from the command line",
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
    /// Work with a course checklist exported as CSV
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommand,
    },
    /// Walk through a sample student's checklist end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ChecklistCommand {
    /// Print credit totals, graduation progress and exam eligibility
    Report(ChecklistReportArgs),
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
        Command::Checklist {
            command: ChecklistCommand::Report(args),
        } => run_checklist_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
