use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod runner;

#[derive(Parser)]
#[command(name = "hs", version, about = "A minimal terminal meditation timer")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Without a subcommand, a numbered menu is shown
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a breath awareness session (default length from config)
    Breathe {
        /// Session length, e.g. "5", "90s", "5m", "1h30m"
        duration: Option<String>,
        /// Breathing pattern: a built-in id or custom seconds like "4-2-6"
        #[arg(short, long, default_value = "4-4-4")]
        pattern: String,
        /// Skip the instructions and start immediately
        #[arg(long)]
        no_intro: bool,
    },
    /// Start a mindful break (default: 2m)
    Break {
        /// Break length, e.g. "2m", "90s"
        duration: Option<String>,
        /// Skip the instructions and start immediately
        #[arg(long)]
        no_intro: bool,
    },
    /// Box breathing: 4s inhale, hold, exhale, hold
    BoxBreathing {
        /// Number of 16-second rounds
        #[arg(short, long, default_value_t = 4)]
        rounds: u32,
        /// Skip the instructions and start immediately
        #[arg(long)]
        no_intro: bool,
    },
    /// Show your meditation statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recent sessions
    History {
        /// Number of sessions to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List built-in breathing patterns
    Patterns {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export the full session history
    Export {
        /// Output format: json or csv
        #[arg(short, long, default_value = "json")]
        format: hush_core::ExportFormat,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("HUSH_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        if let Err(e) = commands::menu::run() {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        return;
    };

    let result = match command {
        Commands::Breathe {
            duration,
            pattern,
            no_intro,
        } => commands::session::breathe(duration.as_deref(), &pattern, !no_intro),
        Commands::Break { duration, no_intro } => {
            commands::session::mindful_break(duration.as_deref(), !no_intro)
        }
        Commands::BoxBreathing { rounds, no_intro } => {
            commands::session::box_breathing(rounds, !no_intro)
        }
        Commands::Stats { json } => commands::stats::run(json),
        Commands::History { limit, json } => commands::history::run(limit, json),
        Commands::Patterns { json } => commands::patterns::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Export { format } => commands::export::run(format),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
