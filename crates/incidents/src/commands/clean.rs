use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::prelude::*;
use crate::writer::Writer;

/// Remove the generated lookup table and incident documents.
#[derive(Debug, Default, Parser)]
pub(crate) struct Clean {
    /// Don't ask for confirmation.
    #[arg(short, long)]
    force: bool,
}

impl Clean {
    pub(crate) fn execute(self) -> IncidentsResult<()> {
        let project = Project::discover()?;
        let config = project.config()?;
        let output_dir = project.output_dir(&config);
        let writer = Writer::new(&output_dir, config.output.batch_size);

        let count = writer.outputs()?.len();

        if count == 0 {
            log::info!("nothing to clean in {}", output_dir.display());
            return Ok(());
        }

        let confirm = self.force
            || Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!(
                    "Delete {count} generated document(s)?"
                ))
                .default(true)
                .show_default(true)
                .interact()?;

        if confirm {
            writer.clean()?;
            log::info!("removed {count} document(s)");
        }

        Ok(())
    }
}
