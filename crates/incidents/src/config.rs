use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use curator::{DateRange, JoinPolicy, Publish};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{bail, IncidentsError, IncidentsResult};

/// Project config.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The path of the config.
    #[serde(skip)]
    path: PathBuf,

    /// Project metadata.
    pub(crate) metadata: Metadata,

    /// Runtime options.
    pub(crate) runtime: Option<Runtime>,

    /// The locations of the source tables.
    #[serde(default)]
    pub(crate) sources: Sources,

    /// Restricts the published incidents to a date range.
    #[serde(default)]
    pub(crate) filter: Filter,

    /// Output options.
    #[serde(default)]
    pub(crate) output: Output,

    /// This structure should always be constructed using a public
    /// constructor or using the update syntax:
    ///
    /// ```ignore
    /// use crate::config::Config;
    ///
    /// let config = Config {
    ///     ..Default::default()
    /// };
    /// ```
    #[doc(hidden)]
    #[serde(skip)]
    __non_exhaustive: (),
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Metadata {
    /// The name of the project.
    pub(crate) name: String,

    /// The version of the project.
    pub(crate) version: Version,

    /// A short blurb about the dataset, which is used as the
    /// description of the lookup table.
    pub(crate) description: Option<String>,

    /// A list of people or organizations, which are considered as the
    /// authors of the project.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub(crate) authors: Vec<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: "".into(),
            version: Version::new(0, 1, 0),
            description: None,
            authors: vec![],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Runtime {
    /// Number of threads to use. If this options isn't set or a value
    /// of "0" is chosen, the maximum number of available threads
    /// is used.
    pub(crate) num_jobs: Option<usize>,
}

/// Paths of the source tables, relative to the project root.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Sources {
    /// The primary incident registry.
    pub(crate) incidents: PathBuf,

    /// The image/description registry.
    pub(crate) descriptions: PathBuf,

    /// The news-reference registry.
    pub(crate) news: PathBuf,

    /// The video-reference registry.
    pub(crate) videos: PathBuf,

    /// An optional registry of manual corrections, keyed by the
    /// incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) overrides: Option<PathBuf>,

    /// How to resolve ids referred to by more than one row of a
    /// supplementary table.
    pub(crate) join_policy: JoinPolicy,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            incidents: "assets/wapo_data.csv".into(),
            descriptions: "assets/mpv_data.csv".into(),
            news: "assets/unarmed_newsapi.csv".into(),
            videos: "assets/unarmed_youtube.csv".into(),
            overrides: None,
            join_policy: JoinPolicy::default(),
        }
    }
}

/// The date range of the published incidents. Either a `year` or the
/// (inclusive) bounds `from` and `to` can be set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) from: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) to: Option<NaiveDate>,
}

impl Filter {
    /// Returns the configured date range or `None` if the incidents
    /// shouldn't be restricted.
    pub(crate) fn range(&self) -> IncidentsResult<Option<DateRange>> {
        match (self.year, self.from, self.to) {
            (None, None, None) => Ok(None),
            (Some(year), None, None) => Ok(Some(DateRange::year(year)?)),
            (Some(_), _, _) => {
                bail!("filter.year conflicts with filter.from/filter.to")
            }
            (None, from, to) => Ok(Some(DateRange::new(
                from.unwrap_or(NaiveDate::MIN),
                to.unwrap_or(NaiveDate::MAX),
            )?)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Output {
    /// The output directory, relative to the project root.
    pub(crate) dir: PathBuf,

    /// The number of incident documents written per batch.
    pub(crate) batch_size: usize,

    /// Which incidents are written as full documents.
    pub(crate) publish: Publish,

    /// Whether to list the ids of incidents lacking sufficient content
    /// in the index.
    pub(crate) track_missing: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: "dist".into(),
            batch_size: 500,
            publish: Publish::default(),
            track_missing: true,
        }
    }
}

impl Config {
    /// Creates a new default config and sets the file location.
    pub(crate) fn create<P>(path: P) -> IncidentsResult<Self>
    where
        P: AsRef<Path>,
    {
        Ok(Self {
            path: path.as_ref().into(),
            ..Default::default()
        })
    }

    /// Loads an existing config from a path.
    pub(crate) fn from_path<P>(path: P) -> IncidentsResult<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().into();
        let content = fs::read_to_string(&path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.path = path;

        if config.output.batch_size == 0 {
            return Err(IncidentsError::other(
                "output.batch_size must be greater than 0",
            ));
        }

        Ok(config)
    }

    /// Saves the config.
    pub(crate) fn save(&self) -> IncidentsResult<()> {
        let content = toml::to_string(self)?;
        let mut out = File::create(&self.path)?;
        out.write_all(content.as_bytes())?;
        Ok(())
    }
}
