use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Taskdeck task-planning CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the planning pipeline over a request
    Plan(commands::plan::PlanArgs),
    /// Task board operations
    Board(commands::board::BoardArgs),
    /// Calendar views over a board
    Calendar(commands::calendar::CalendarArgs),
    /// Quick actions (deep block, snooze, deadline, tags)
    Action(commands::action::ActionArgs),
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

/// Log to stderr so stdout stays machine readable. `TASKDECK_LOG` takes an
/// env-filter directive; the default is `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASKDECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Board(args) => commands::board::run(args),
        Commands::Calendar(args) => commands::calendar::run(args),
        Commands::Action(args) => commands::action::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "taskdeck", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
