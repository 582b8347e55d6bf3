//! # hub - HR Tasks Hub CLI
//!
//! Command-line board over a remote todo API. Tasks are fetched once,
//! decorated for the board, cached under `~/.hub/`, and changed
//! optimistically: the local copy changes first and is put back if the API
//! call fails.
//!
//! ## Quick Start
//!
//! ```bash
//! # List tasks, newest end date first, grouped by column
//! hub list --group
//!
//! # Add a task to the In Progress column
//! hub add "Prepare onboarding pack" --status in-progress --end "next friday"
//!
//! # Keep a task on this machine only
//! hub add "Personal reminder" --local
//!
//! # Move a task and mark it completed
//! hub update 12 --status done --done
//! ```
//!
//! Set `HUB_LOG=debug` to see store transitions on stderr.

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tasks_hub::enhance::Enhancer;
use tasks_hub::gateway::HttpGateway;
use tasks_hub::storage::FileStore;
use tasks_hub::store::TaskStore;

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("HUB_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let config = cli.config();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        process::exit(2);
    }

    let slots = match FileStore::open(&config.data_dir) {
        Ok(slots) => slots,
        Err(e) => {
            eprintln!("Failed to open data directory {}: {e}", config.data_dir.display());
            process::exit(1);
        }
    };
    let gateway = match HttpGateway::new(&config.api_url, config.timeout) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Failed to set up API client: {e}");
            process::exit(1);
        }
    };
    let mut store = TaskStore::new(gateway, Arc::new(slots), Enhancer::default()).with_page_size(config.page_size);

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Remote { id } => cmd_remote(&store, id).await,
        Commands::Reset => cmd_reset(&mut store, &config),
        command => {
            if let Err(e) = store.init().await {
                eprintln!("Could not load tasks from {}: {e}", config.api_url);
            }
            match command {
                Commands::List { status, sort, search, group, limit } =>
                    cmd_list(&store, status, sort, search, group, limit),

                Commands::View { id } => cmd_view(&store, &config, id),

                Commands::Add { title, desc, status, start, end, local } =>
                    cmd_add(&mut store, title, desc, status, start, end, local).await,

                Commands::Update { id, title, desc, status, done, undone, start, end } =>
                    cmd_update(&mut store, id, title, desc, status, done, undone, start, end).await,

                Commands::Delete { id } => cmd_delete(&mut store, id).await,

                Commands::Remote { .. } | Commands::Reset | Commands::Completions { .. } =>
                    unreachable!("handled before cold start"),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}
