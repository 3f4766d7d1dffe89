//! `quire nav` command implementation.

use clap::Args;
use quire_config::CliSettings;

use crate::commands::{ProjectArgs, create_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Print flat navigation for one top-level directory instead of the
    /// whole tree.
    #[arg(long)]
    directory: Option<String>,

    /// Group flat navigation by category.
    #[arg(long, requires = "directory")]
    group: bool,

    /// Include front-matter descriptions.
    #[arg(long)]
    descriptions: bool,

    /// Keep enumeration order instead of sorting by title.
    #[arg(long)]
    no_sort: bool,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a content file cannot be
    /// read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            sort_by_title: self.no_sort.then_some(false),
            group_by_category: self.group.then_some(true),
            include_description: self.descriptions.then_some(true),
            ..CliSettings::default()
        };
        let config = self.project.load_config(cli_settings)?;

        let site = create_site(&config);
        let snapshot = site.reload_if_needed()?;

        let items = match &self.directory {
            Some(directory) => {
                let items = snapshot.directory_navigation(directory);
                if items.is_empty() {
                    output.warning(&format!("No content in directory {directory}"));
                }
                items
            }
            None => snapshot.navigation().to_vec(),
        };

        output.data(&serde_json::to_string_pretty(&items)?)?;
        Ok(())
    }
}
