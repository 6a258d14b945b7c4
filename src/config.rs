//! Command-line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::views::orders::OrderSortKey;

#[derive(Parser, Debug)]
#[command(name = "storefront_admin")]
#[command(about = "Read-only admin dashboard for a headless-CMS storefront")]
pub struct Cli {
    #[command(flatten)]
    pub cms: CmsArgs,

    #[arg(
        long,
        env = "ADMIN_SESSION_FILE",
        default_value = ".storefront-admin/session.json",
        global = true
    )]
    pub session_file: PathBuf,

    /// Quiet period before suggestions are recomputed
    #[arg(long, default_value_t = 300, global = true)]
    pub debounce_ms: u64,

    /// Delay before suggestions hide after the search box loses focus
    #[arg(long, default_value_t = 200, global = true)]
    pub blur_grace_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct CmsArgs {
    #[arg(long, env = "SANITY_PROJECT_ID", global = true)]
    pub project_id: Option<String>,

    #[arg(long, env = "SANITY_DATASET", default_value = "production", global = true)]
    pub dataset: String,

    #[arg(long, env = "SANITY_API_VERSION", default_value = "2023-05-03", global = true)]
    pub api_version: String,

    #[arg(long, env = "SANITY_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Query the edge cache instead of the live API
    #[arg(long, env = "SANITY_USE_CDN", global = true)]
    pub use_cdn: bool,

    /// Overrides the URL derived from the project id
    #[arg(long, env = "SANITY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[arg(long, default_value_t = 10, global = true)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Filter the table by this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Also print debounced suggestions for the search text
    #[arg(long)]
    pub suggest: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Business overview counters (/admin)
    Overview,
    /// Product table (/admin/product)
    Products(SearchArgs),
    /// Order table (/admin/orders)
    Orders {
        #[command(flatten)]
        search: SearchArgs,
        /// Exact status to keep, e.g. pending or delivered
        #[arg(long)]
        status: Option<String>,
        #[arg(long, value_enum, default_value_t = OrderSortKey::Date)]
        sort: OrderSortKey,
    },
    /// Customer directory (/admin/customers)
    Customers(SearchArgs),
    /// Inventory analytics per category (/admin/categories)
    Categories,
    /// Render whichever view serves this path
    Open { path: String },
    /// Set the local session flag
    Login,
    /// Clear the local session flag
    Logout,
}

/// Resolved connection settings for the CMS client.
#[derive(Debug, Clone, PartialEq)]
pub struct CmsSettings {
    pub base_url: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl CmsArgs {
    pub fn resolve(&self) -> Result<CmsSettings, ConfigError> {
        let base_url = match (&self.base_url, &self.project_id) {
            (Some(url), _) if !url.trim().is_empty() => url.trim().to_string(),
            (_, Some(project)) if !project.trim().is_empty() => {
                let host = if self.use_cdn { "apicdn" } else { "api" };
                format!("https://{}.{}.sanity.io", project.trim(), host)
            }
            _ => return Err(ConfigError::MissingProject),
        };

        if self.dataset.trim().is_empty() {
            return Err(ConfigError::Invalid("dataset must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout must be at least one second".to_string()));
        }

        Ok(CmsSettings {
            base_url,
            dataset: self.dataset.trim().to_string(),
            api_version: self.api_version.trim().to_string(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            timeout_secs: self.timeout_secs,
        })
    }
}

/// Timing knobs for the incremental search module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub blur_grace: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            blur_grace: Duration::from_millis(200),
        }
    }
}

impl Cli {
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            blur_grace: Duration::from_millis(self.blur_grace_ms),
        }
    }
}
