use crate::demo::{run_demo, run_stats, DemoArgs, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Portal",
    about = "Run the club recruitment portal or inspect applicant records from the command line",
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
    /// Print dashboard statistics for a JSON export of applicant records
    Stats(StatsArgs),
    /// Walk a few synthetic applicants through the portal and print what admins would see
    Demo(DemoArgs),
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
        Command::Stats(args) => run_stats(args),
        Command::Demo(args) => run_demo(args),
    }
}
