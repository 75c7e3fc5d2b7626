use crate::demo::{run_demo, run_eligibility_check, DemoArgs, EligibilityArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use khen_thuong::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Quản lý Khen thưởng",
    about = "Run the award proposal service or exercise its rules from the command line",
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
    /// Check the medal eligibility rules against the seeded roster
    Eligibility {
        #[command(subcommand)]
        command: EligibilityCommand,
    },
    /// Run an end-to-end CLI demo covering eligibility and proposal assembly
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum EligibilityCommand {
    /// Check one person against one medal tier
    Check(EligibilityArgs),
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
        Command::Eligibility {
            command: EligibilityCommand::Check(args),
        } => run_eligibility_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
