//! `quire lookup` command implementation.

use clap::Args;
use quire_config::CliSettings;

use crate::commands::{ProjectArgs, create_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the lookup command.
#[derive(Args)]
pub(crate) struct LookupArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Route to look up (e.g. /docs/installation).
    route: String,
}

impl LookupArgs {
    /// Execute the lookup command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::RouteNotFound`] if no content has the route.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.project.load_config(CliSettings::default())?;
        let site = create_site(&config);
        let snapshot = site.reload_if_needed()?;

        let record = snapshot
            .find(&self.route)
            .ok_or_else(|| CliError::RouteNotFound(self.route.clone()))?;

        output.data(&serde_json::to_string_pretty(record)?)?;
        Ok(())
    }
}
