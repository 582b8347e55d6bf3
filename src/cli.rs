use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use tasks_hub::config::{default_data_dir, HubConfig, DEFAULT_API_URL};
use tasks_hub::fields::Locale;

use crate::cmd::Commands;

/// HR Tasks Hub: task board over a remote todo API, cached locally.
/// Storage defaults to ~/.hub or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "hub", version, about = "HR task board CLI")]
pub struct Cli {
    /// Base URL of the todo API.
    #[arg(long, global = true, env = "HUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bound on every remote call, in milliseconds.
    #[arg(long, global = true, env = "HUB_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Number of tasks fetched on a cold start.
    #[arg(long, global = true, env = "HUB_PAGE_SIZE", default_value_t = 50)]
    pub page_size: u64,

    /// Directory holding the cached tasks and local ids.
    #[arg(long, global = true, env = "HUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Language for long dates.
    #[arg(long, global = true, value_enum, default_value_t = Locale::En)]
    pub locale: Locale,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> HubConfig {
        HubConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            page_size: self.page_size,
            data_dir: self.data_dir.clone().unwrap_or_else(default_data_dir),
            locale: self.locale,
        }
    }
}
