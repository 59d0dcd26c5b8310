use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "workday-cli", version, about = "Workday Alerts CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule (or replace) the workday alerts
    Schedule(commands::schedule::ScheduleArgs),
    /// Show upcoming alerts
    List(commands::list::ListArgs),
    /// Cancel alerts whose fire time has passed
    Purge,
    /// Foreground reconciliation: stop the loop alarm, reset the badge
    Activate,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule(args) => commands::schedule::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Purge => commands::purge::run(),
        Commands::Activate => commands::activate::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
