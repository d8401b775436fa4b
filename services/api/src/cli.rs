use crate::preview::{run_locations, run_schedule_preview, LocationsArgs, SchedulePreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use enrollment_admin::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Enrollment Admin",
    about = "Run the enrollment admin backend or preview exam schedules from the command line",
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
    /// Work with exam schedules without the dashboard
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// List exam locations from the enrollment API
    Locations(LocationsArgs),
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Resolve dates, default hours and per-date overrides into the submission payload
    Preview(SchedulePreviewArgs),
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
        Command::Schedule {
            command: ScheduleCommand::Preview(args),
        } => run_schedule_preview(args),
        Command::Locations(args) => run_locations(args).await,
    }
}
