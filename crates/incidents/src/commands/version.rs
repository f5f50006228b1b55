use std::fs;

use clap::Parser;
use curator::IncidentLookupTable;
use semver::Version as SemVer;

use crate::prelude::*;

/// Get or bump the dataset version.
///
/// The version is stamped into the lookup table on every build, so a
/// bump only reaches the output with the next `incidents build`.
#[derive(Debug, Parser)]
pub(crate) struct Version {
    /// Accept a new version, which isn't greater than the current one.
    #[arg(short, long)]
    force: bool,

    /// Fail if the lookup table wasn't built from the current version.
    #[arg(long, conflicts_with = "version")]
    check: bool,

    /// The new dataset version.
    version: Option<SemVer>,
}

fn check_bump(
    current: &SemVer,
    next: &SemVer,
    force: bool,
) -> IncidentsResult<()> {
    if !force && next <= current {
        bail!("{next} must be greater than {current}");
    }

    Ok(())
}

/// Returns the version stamped into `lookup`, if any.
fn built_version(
    lookup: &IncidentLookupTable,
) -> IncidentsResult<Option<SemVer>> {
    match lookup.version {
        Some(ref version) => SemVer::parse(version).map(Some).map_err(|e| {
            IncidentsError::other(format!(
                "invalid version `{version}` in lookup table: {e}"
            ))
        }),
        None => Ok(None),
    }
}

impl Version {
    pub(crate) fn execute(self) -> IncidentsResult<()> {
        let project = Project::discover()?;
        let mut config = project.config()?;
        let current = config.metadata.version.clone();

        if let Some(next) = self.version {
            check_bump(&current, &next, self.force)?;
            config.metadata.version = next;
            config.save()?;

            log::info!(
                "bumped version {current} -> {}, run `incidents build` \
                 to update the lookup table",
                config.metadata.version
            );

            return Ok(());
        }

        if !self.check {
            println!("{current}");
            return Ok(());
        }

        let lookup: IncidentLookupTable =
            serde_json::from_slice(&fs::read(project.index()?)?)?;

        match built_version(&lookup)? {
            Some(built) if built == current => {
                println!("{current}");
                Ok(())
            }
            Some(built) => bail!(
                "lookup table was built from version {built}, but the \
                 project is at {current}"
            ),
            None => bail!("lookup table carries no version"),
        }
    }
}
