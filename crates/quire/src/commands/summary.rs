//! `quire summary` command implementation.

use clap::Args;
use quire_config::CliSettings;

use crate::commands::{ProjectArgs, create_site};
use crate::error::CliError;
use crate::output::Output;

const TOTAL_LABEL: &str = "total";

/// Arguments for the summary command.
#[derive(Args)]
pub(crate) struct SummaryArgs {
    #[command(flatten)]
    project: ProjectArgs,
}

impl SummaryArgs {
    /// Execute the summary command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a content file cannot be
    /// read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.project.load_config(CliSettings::default())?;
        let site = create_site(&config);
        let snapshot = site.reload_if_needed()?;

        output.highlight(&config.content_resolved.dir.display().to_string());

        let summary = snapshot.directory_summary();
        if snapshot.record_count() == 0 {
            output.warning("No content files found");
            return Ok(());
        }

        let width = summary
            .keys()
            .map(String::len)
            .chain([TOTAL_LABEL.len()])
            .max()
            .unwrap_or(0);
        for (directory, count) in &summary {
            output.data(&format!("{directory:<width$}  {count}"))?;
        }
        output.data(&format!(
            "{TOTAL_LABEL:<width$}  {}",
            snapshot.record_count()
        ))?;

        Ok(())
    }
}
