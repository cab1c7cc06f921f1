use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shiftgrid-cli", version, about = "Weekly shift grid CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit one employee's day
    Slots {
        #[command(subcommand)]
        action: commands::slots::SlotsAction,
    },
    /// Show side-by-side columns for one day
    Layout(commands::layout::LayoutArgs),
    /// Drive the gesture controller with recorded input events
    Replay(commands::replay::ReplayArgs),
    /// Week overview with holidays and slot counts
    Week(commands::week::WeekArgs),
    /// Employee roster
    Employees {
        #[command(subcommand)]
        action: commands::employees::EmployeesAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHIFTGRID_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Slots { action } => commands::slots::run(action),
        Commands::Layout(args) => commands::layout::run(args),
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Week(args) => commands::week::run(args),
        Commands::Employees { action } => commands::employees::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "shiftgrid-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
