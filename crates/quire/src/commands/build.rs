//! `quire build` command implementation.

use std::path::PathBuf;

use clap::Args;
use quire_config::CliSettings;
use quire_content::write_manifest;

use crate::commands::{ProjectArgs, create_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Manifest output path (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the manifest to stdout instead of writing it.
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a content file cannot be
    /// read, or the manifest cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            manifest_output: self.output.map(std::path::absolute).transpose()?,
            ..CliSettings::default()
        };
        let config = self.project.load_config(cli_settings)?;

        if !self.stdout {
            output.info(&format!(
                "Content: {}",
                config.content_resolved.dir.display()
            ));
        }

        let site = create_site(&config);
        let snapshot = site.reload_if_needed()?;
        let manifest = snapshot.manifest();

        if self.stdout {
            output.data(&manifest.to_json(true)?)?;
            return Ok(());
        }

        if manifest.entries.is_empty() {
            output.warning("No content files found");
        }

        let path = &config.manifest_resolved.output;
        write_manifest(&manifest, path)?;
        output.success(&format!(
            "Wrote {} entries to {}",
            manifest.entries.len(),
            path.display()
        ));

        Ok(())
    }
}
