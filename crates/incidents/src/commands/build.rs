use std::io::{stdout, Write};
use std::path::PathBuf;

use clap::Parser;
use curator::{Curation, DateRange, Options, Publish, Report};
use humansize::{make_format, BINARY};

use crate::loader::load_sources;
use crate::prelude::*;
use crate::writer::Writer;

/// Build the lookup table and the incident documents.
#[derive(Debug, Default, Parser)]
pub(crate) struct Build {
    /// If set, the lookup table will be written in JSON format to the
    /// standard output (stdout) and no incident documents are written.
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Write the output into `path`. By default (if `--stdout` isn't
    /// set), the output directory of the config is used.
    #[arg(short, long, value_name = "path")]
    output: Option<PathBuf>,

    /// Publish all incidents within the date range, regardless of
    /// their content.
    #[arg(long)]
    all: bool,

    /// Restrict the incidents to the given year. This option overrides
    /// the `filter` section of the config.
    #[arg(long)]
    year: Option<i32>,
}

fn log_report(report: &Report) {
    if !report.invalid_ids.is_empty() {
        log::warn!(
            "skipped {} primary rows with an invalid id",
            report.invalid_ids.len()
        );
    }

    if !report.duplicate_ids.is_empty() {
        log::warn!(
            "skipped {} primary rows repeating an earlier id",
            report.duplicate_ids.len()
        );
    }

    if !report.ambiguities.is_empty() {
        log::warn!(
            "{} ids are referred to by more than one row",
            report.ambiguities.len()
        );
    }

    log::info!(
        "{} rows, {} repaired embeds, {} undated",
        report.rows,
        report.repaired,
        report.undated
    );
    log::info!(
        "{} of {} incidents have sufficient content, {} published",
        report.satisfied,
        report.retained,
        report.published
    );
}

impl Build {
    pub(crate) fn execute(self, quiet: bool) -> IncidentsResult<()> {
        let project = Project::discover()?;
        let config = project.config()?;

        let range = match self.year {
            Some(year) => Some(DateRange::year(year)?),
            None => config.filter.range()?,
        };

        let publish = if self.all {
            Publish::All
        } else {
            config.output.publish
        };

        let description = config
            .metadata
            .description
            .clone()
            .unwrap_or_else(|| config.metadata.name.clone());

        let sources = load_sources(&config.sources, project.base_dir())?;
        let curation = Curation::new(Options {
            description,
            version: Some(config.metadata.version.to_string()),
            join_policy: config.sources.join_policy,
            range,
            publish,
            track_missing: config.output.track_missing,
        });

        let curated = curation.run(&sources)?;
        log_report(&curated.report);

        for group in curated.lookup.groups.iter() {
            log::debug!(
                "{}/{}: {} of {} with content",
                group.race,
                group.armed,
                group.satisfied(),
                group.n
            );
        }

        if self.stdout {
            let mut out = stdout().lock();
            serde_json::to_writer_pretty(&mut out, &curated.lookup)?;
            writeln!(out)?;
            return Ok(());
        }

        let output_dir = match self.output {
            Some(path) => path,
            None => project.output_dir(&config),
        };

        let writer =
            Writer::new(&output_dir, config.output.batch_size).quiet(quiet);
        writer.clean()?;

        let mut size = writer.write_index(&curated.lookup)?;
        size += writer.write_incidents(&curated.incidents)?;

        let formatter = make_format(BINARY);
        log::info!(
            "wrote {} incidents to {} ({})",
            curated.incidents.len(),
            output_dir.display(),
            formatter(size)
        );

        Ok(())
    }
}
