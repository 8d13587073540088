mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stoker",
    about = "Trigger named jobs on a task-queue backend",
    version,
    propagate_version = true
)]
struct Cli {
    /// Catalog file (default: walk upward from the cwd for stoker.yaml)
    #[arg(long, global = true, env = "STOKER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold stoker.yaml with the stock catalog
    Init,

    /// List the actions in the catalog
    List {
        /// Only show actions in this namespace
        #[arg(long)]
        namespace: Option<String>,
    },

    /// Show one action in full
    Show {
        /// Action name as listed in the catalog
        name: String,
    },

    /// Check the catalog for common mistakes
    Validate,

    /// Build the request for one action and submit it
    Trigger {
        /// Action name as listed in the catalog
        name: String,

        /// User parameter as KEY=VALUE (repeatable; empty values allowed)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Override the catalog's backend base URL
        #[arg(long)]
        backend: Option<String>,

        /// Print the endpoint and payload instead of sending
        #[arg(long)]
        dry_run: bool,
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

    let catalog = cli.catalog.as_deref();

    let result = match cli.command {
        Commands::Init => cmd::init::run(catalog),
        Commands::List { namespace } => cmd::list::run(catalog, namespace.as_deref(), cli.json),
        Commands::Show { name } => cmd::show::run(catalog, &name, cli.json),
        Commands::Validate => cmd::validate::run(catalog, cli.json),
        Commands::Trigger {
            name,
            params,
            backend,
            dry_run,
        } => cmd::trigger::run(catalog, &name, &params, backend.as_deref(), dry_run, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
