mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::catalog::CatalogSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stagecue",
    about = "Plan chargeable broadcast steps from a paid viewer instruction",
    version,
    propagate_version = true
)]
struct Cli {
    /// Catalog file with actions and membership plans (YAML)
    #[arg(long, global = true, env = "STAGECUE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the chargeable steps for one instruction
    Plan {
        /// The viewer instruction, verbatim
        instruction: String,

        /// Step ceiling (default 5, clamped to 1-10)
        #[arg(long)]
        max_steps: Option<usize>,

        /// Viewer handle carried into donation and question steps
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Inspect the channel catalog
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Plan {
            instruction,
            max_steps,
            display_name,
        } => cmd::plan::run(
            cli.catalog.as_deref(),
            &instruction,
            max_steps,
            display_name.as_deref(),
            cli.json,
        ),
        Commands::Catalog { subcommand } => {
            cmd::catalog::run(cli.catalog.as_deref(), subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
