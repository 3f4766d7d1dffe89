//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod lookup;
pub(crate) mod nav;
pub(crate) mod summary;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use quire_config::{CliSettings, Config, NavigationConfig};
use quire_content::NavigationOptions;
use quire_site::{Site, SiteConfig};
use quire_storage_fs::FsStorage;

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use lookup::LookupArgs;
pub(crate) use nav::NavArgs;
pub(crate) use summary::SummaryArgs;

/// Project options shared by all commands.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(short = 'd', long, env = "QUIRE_CONTENT_DIR")]
    content_dir: Option<PathBuf>,
}

impl ProjectArgs {
    /// Load configuration, applying `settings` and the shared overrides.
    pub(crate) fn load_config(&self, settings: CliSettings) -> Result<Config, CliError> {
        let content_dir = self
            .content_dir
            .as_deref()
            .map(std::path::absolute)
            .transpose()?;
        let settings = CliSettings {
            content_dir,
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Create a site over the filesystem for a loaded configuration.
pub(crate) fn create_site(config: &Config) -> Site {
    let site_config = SiteConfig {
        content_dir: config.content_resolved.dir.clone(),
        navigation: navigation_options(config.navigation),
    };
    Site::new(Arc::new(FsStorage::new()), site_config)
}

fn navigation_options(navigation: NavigationConfig) -> NavigationOptions {
    NavigationOptions {
        sort_by_title: navigation.sort_by_title,
        group_by_category: navigation.group_by_category,
        include_description: navigation.include_description,
    }
}
