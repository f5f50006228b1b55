use std::fs;
use std::path::{Path, PathBuf};

use curator::{Incident, IncidentLookupTable};
use glob::glob;
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::prelude::*;

const PBAR_WRITE: &str = "Writing incidents: {human_pos} ({percent}%) | \
        elapsed: {elapsed_precise}{msg}";

/// Writes the lookup table and the incident documents into an output
/// directory.
///
/// ```text
/// <dir>/index.json
/// <dir>/incidents/<id>.json
/// ```
pub(crate) struct Writer {
    dir: PathBuf,
    batch_size: usize,
    quiet: bool,
}

impl Writer {
    pub(crate) fn new<P: AsRef<Path>>(dir: P, batch_size: usize) -> Self {
        Self {
            dir: dir.as_ref().into(),
            batch_size: batch_size.max(1),
            quiet: false,
        }
    }

    /// Hides the progress bar.
    pub(crate) fn quiet(mut self, yes: bool) -> Self {
        self.quiet = yes;
        self
    }

    #[inline]
    pub(crate) fn index_path(&self) -> PathBuf {
        self.dir.join(Project::INDEX)
    }

    #[inline]
    pub(crate) fn incidents_dir(&self) -> PathBuf {
        self.dir.join(Project::INCIDENTS_DIR)
    }

    /// Returns the files [Writer::clean] would remove.
    pub(crate) fn outputs(&self) -> IncidentsResult<Vec<PathBuf>> {
        let mut paths = vec![];

        let index = self.index_path();
        if index.is_file() {
            paths.push(index);
        }

        let pattern = self.incidents_dir().join("**").join("*");
        let pattern = pattern.to_str().ok_or_else(|| {
            IncidentsError::other(format!(
                "invalid output path {}",
                pattern.display()
            ))
        })?;

        for entry in glob(pattern).map_err(IncidentsError::other)? {
            let path = entry.map_err(IncidentsError::other)?;
            if path.is_file() {
                paths.push(path);
            }
        }

        Ok(paths)
    }

    /// Removes the output of a previous run.
    pub(crate) fn clean(&self) -> IncidentsResult<()> {
        let incidents_dir = self.incidents_dir();
        if incidents_dir.is_dir() {
            fs::remove_dir_all(&incidents_dir)?;
        }

        let index = self.index_path();
        if index.is_file() {
            fs::remove_file(&index)?;
        }

        Ok(())
    }

    /// Writes the lookup table and returns the number of bytes
    /// written.
    pub(crate) fn write_index(
        &self,
        table: &IncidentLookupTable,
    ) -> IncidentsResult<u64> {
        fs::create_dir_all(&self.dir)?;

        let content = serde_json::to_vec_pretty(table)?;
        fs::write(self.index_path(), &content)?;
        Ok(content.len() as u64)
    }

    /// Writes one document per incident and returns the number of
    /// bytes written.
    ///
    /// The incidents are written in batches of `batch_size`; the
    /// documents of a batch are written in parallel.
    pub(crate) fn write_incidents(
        &self,
        incidents: &[Incident],
    ) -> IncidentsResult<u64> {
        let incidents_dir = self.incidents_dir();
        fs::create_dir_all(&incidents_dir)?;

        let pbar = ProgressBarBuilder::new(PBAR_WRITE, self.quiet)
            .len(incidents.len() as u64)
            .build();

        let mut size = 0;
        for (idx, batch) in incidents.chunks(self.batch_size).enumerate() {
            log::debug!("write batch {} ({} incidents)", idx, batch.len());

            size += batch
                .par_iter()
                .progress_with(pbar.clone())
                .map(|incident| -> IncidentsResult<u64> {
                    let path =
                        incidents_dir.join(format!("{}.json", incident.id));
                    let content = serde_json::to_vec(incident)?;
                    fs::write(path, &content)?;
                    Ok(content.len() as u64)
                })
                .collect::<IncidentsResult<Vec<u64>>>()?
                .into_iter()
                .sum::<u64>();
        }

        pbar.finish_using_style();
        Ok(size)
    }
}
