mod args;
mod config;
mod global;
mod handlers;

use clap::{Parser, Subcommand};

use args::{ConfigAction, ParseArgs};
use global::GlobalArgs;

#[derive(Parser)]
#[command(name = "nested-params")]
#[command(version)]
#[command(about = "Expand request parameters with dotted names into nested maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a parameter map from a query string or URI and print it as JSON
    Parse(ParseArgs),

    /// Inspect effective settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = config::load_settings(&cli.global)?;

    match cli.command {
        Commands::Parse(args) => handlers::parse::handle(args, &cli.global, &settings),
        Commands::Config { action } => handlers::config::handle(action, &settings),
    }
}
