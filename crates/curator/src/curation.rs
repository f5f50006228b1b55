use std::collections::HashSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collate::{collate, Ambiguity, JoinPolicy, Sources};
use crate::error::{CuratorError, CuratorResult};
use crate::gate::is_sufficient;
use crate::group::group;
use crate::incident::Incident;
use crate::lookup::IncidentLookupTable;
use crate::merge::merge;
use crate::period::{filter, DateRange};
use crate::repair::{repair, Repaired};

/// Which of the filtered incidents are published as full records.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Publish {
    /// Only incidents with sufficient content.
    #[default]
    Sufficient,
    /// Every incident within the date range.
    All,
}

impl Display for Publish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sufficient => write!(f, "sufficient"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for Publish {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sufficient" => Ok(Self::Sufficient),
            "all" => Ok(Self::All),
            _ => Err(CuratorError::other(format!(
                "invalid publish policy '{s}'"
            ))),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Options {
    /// The description of the lookup table.
    pub description: String,
    /// The dataset version stamped into the lookup table.
    pub version: Option<String>,
    pub join_policy: JoinPolicy,
    /// Restricts the incidents to a date range. No restriction if
    /// unset.
    pub range: Option<DateRange>,
    pub publish: Publish,
    /// Whether to keep the ids lacking sufficient content in the
    /// lookup table.
    pub track_missing: bool,
}

/// Counts and anomalies of a curation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Number of primary rows.
    pub rows: usize,
    pub ambiguities: Vec<Ambiguity>,
    /// The raw ids of primary rows, which couldn't be parsed.
    pub invalid_ids: Vec<String>,
    /// Ids of primary rows skipped because an earlier row already
    /// has the same id.
    pub duplicate_ids: Vec<u64>,
    /// Number of successfully repaired embeds.
    pub repaired: usize,
    /// Number of incidents dropped due to an unparseable date.
    pub undated: usize,
    /// Number of incidents within the date range.
    pub retained: usize,
    /// Number of retained incidents with sufficient content.
    pub satisfied: usize,
    /// Number of published incidents.
    pub published: usize,
}

/// The outputs of a curation run.
#[derive(Debug, Clone)]
pub struct Curated {
    pub lookup: IncidentLookupTable,
    /// The published incidents, in the order of the primary table.
    pub incidents: Vec<Incident>,
    pub report: Report,
}

#[derive(Debug, Default)]
pub struct Curation {
    options: Options,
}

impl Curation {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Runs all stages on `sources`.
    ///
    /// Single bad records never fail the run: rows without a valid id
    /// and rows repeating the id of an earlier row are excluded and
    /// listed in the [Report]. The run only fails if
    /// the join policy is [JoinPolicy::ErrorOnAmbiguous] and a key is
    /// ambiguous.
    pub fn run(&self, sources: &Sources) -> CuratorResult<Curated> {
        let options = &self.options;
        let mut report = Report {
            rows: sources.incidents.len(),
            ..Default::default()
        };

        let collation = collate(sources, options.join_policy)?;
        report.ambiguities = collation.ambiguities;

        let merged: Vec<CuratorResult<Incident>> =
            collation.tuples.par_iter().map(merge).collect();

        let mut seen = HashSet::with_capacity(merged.len());
        let mut incidents = Vec::with_capacity(merged.len());
        for result in merged {
            match result {
                Ok(incident) if !seen.insert(incident.id) => {
                    log::warn!(
                        "skip primary row with duplicate id {}",
                        incident.id
                    );
                    report.duplicate_ids.push(incident.id);
                }
                Ok(incident) => incidents.push(incident),
                Err(CuratorError::InvalidId(raw)) => {
                    log::warn!("skip primary row with invalid id '{raw}'");
                    report.invalid_ids.push(raw);
                }
                Err(e) => return Err(e),
            }
        }

        let repaired: Vec<Repaired> =
            incidents.into_par_iter().map(repair).collect();
        report.repaired = repaired.iter().filter(|r| r.repaired).count();

        let incidents: Vec<Incident> =
            repaired.into_iter().map(|r| r.record).collect();

        log::debug!(
            "merged {} incidents ({} embeds repaired)",
            incidents.len(),
            report.repaired
        );

        let (incidents, undated) = filter(incidents, options.range.as_ref());
        report.undated = undated;
        report.retained = incidents.len();

        let lookup = {
            let groups = group(&incidents);
            IncidentLookupTable::build(
                options.description.as_str(),
                &groups,
                options.track_missing,
            )
            .with_version(options.version.clone())
        };

        report.satisfied = lookup.summary().satisfied;

        let incidents: Vec<Incident> = match options.publish {
            Publish::Sufficient => {
                incidents.into_iter().filter(is_sufficient).collect()
            }
            Publish::All => incidents,
        };

        report.published = incidents.len();

        log::debug!(
            "retained {} incidents, {} with sufficient content",
            report.retained,
            report.satisfied
        );

        Ok(Curated {
            lookup,
            incidents,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::category::{Armed, Race};
    use crate::row;
    use crate::table::Table;

    type TestResult = anyhow::Result<()>;

    fn sources() -> Sources {
        Sources {
            incidents: Table::new(
                "wapo",
                vec![
                    row! {
                        "id" => "12",
                        "date" => "3/4/2019",
                        "race" => "B",
                        "armed" => "unarmed",
                    },
                    row! {
                        "id" => "13",
                        "name" => "Jane Doe",
                        "date" => "2019-06-01",
                        "race" => "W",
                        "armed" => "gun",
                    },
                    row! {
                        "id" => "14",
                        "date" => "2018-06-01",
                        "race" => "H",
                        "armed" => "knife",
                    },
                    row! { "id" => "x15", "date" => "2019-06-01" },
                    row! { "id" => "16", "date" => "unknown" },
                ],
            ),
            descriptions: Table::new(
                "mpv",
                vec![row! {
                    "wapo_id" => "13",
                    "photo" => "https://example.org/13.jpg",
                    "description" => "A description.",
                }],
            ),
            news: Table::new(
                "newsapi",
                vec![row! {
                    "wapo_id" => "13",
                    "video" => "https://youtu.be/dQw4w9WgXcQ",
                    "news" => "https://example.org/news/13",
                }],
            ),
            videos: Table::new("youtube", vec![]),
            overrides: None,
        }
    }

    fn options() -> CuratorResult<Options> {
        Ok(Options {
            description: "2019 shootings".into(),
            range: Some(DateRange::year(2019)?),
            track_missing: true,
            ..Default::default()
        })
    }

    #[test]
    fn run_scenario() -> TestResult {
        let curated = Curation::new(options()?).run(&sources())?;
        let report = &curated.report;

        assert_eq!(report.rows, 5);
        assert_eq!(report.invalid_ids, vec!["x15".to_string()]);
        assert_eq!(report.repaired, 1);
        assert_eq!(report.undated, 1);
        assert_eq!(report.retained, 2);
        assert_eq!(report.satisfied, 1);
        assert_eq!(report.published, 1);

        let black_unarmed = curated
            .lookup
            .groups
            .iter()
            .find(|g| g.race == Race::Black && g.armed == Armed::Unarmed)
            .unwrap();
        assert_eq!(black_unarmed.n, 1);
        assert!(black_unarmed.ids.is_empty());
        assert_eq!(black_unarmed.missing, Some(vec![12]));

        let published = &curated.incidents[0];
        assert_eq!(published.id, 13);
        assert_eq!(published.video, "dQw4w9WgXcQ");
        assert!(published.embed.is_empty());
        assert_eq!(published.name, "Jane Doe");
        Ok(())
    }

    #[test]
    fn run_exhaustive_partition() -> TestResult {
        let curated = Curation::new(options()?).run(&sources())?;

        let mut seen = BTreeSet::new();
        let mut total = 0;
        for group in curated.lookup.groups.iter() {
            let missing = group.missing.clone().unwrap_or_default();
            assert_eq!(group.n, group.ids.len() + missing.len());
            total += group.n;

            for id in group.ids.iter().chain(missing.iter()) {
                assert!(seen.insert(*id), "id {id} listed twice");
            }
        }

        assert_eq!(total, curated.report.retained);
        assert_eq!(seen, BTreeSet::from([12, 13]));

        let sizes: Vec<_> =
            curated.lookup.groups.iter().map(|g| g.n).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn run_publish_all_without_range() -> TestResult {
        let publish_all = Options {
            publish: Publish::All,
            ..Default::default()
        };

        let curated = Curation::new(publish_all).run(&sources())?;
        let ids: Vec<_> = curated.incidents.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![12, 13, 14, 16]);
        assert_eq!(curated.report.undated, 0);
        assert!(curated.lookup.groups.iter().all(|g| g.missing.is_none()));
        Ok(())
    }

    #[test]
    fn run_error_on_ambiguous() -> TestResult {
        let mut sources = sources();
        sources.descriptions.push(row! { "wapo_id" => "13" });

        let strict = Options {
            join_policy: JoinPolicy::ErrorOnAmbiguous,
            ..options()?
        };

        let result = Curation::new(strict).run(&sources);
        assert!(matches!(result, Err(CuratorError::AmbiguousJoin { .. })));

        let curated = Curation::new(options()?).run(&sources)?;
        assert_eq!(curated.report.ambiguities.len(), 1);
        assert_eq!(curated.report.satisfied, 1);
        Ok(())
    }

    #[test]
    fn run_skips_duplicate_ids() -> TestResult {
        let mut sources = sources();
        sources.incidents.push(row! {
            "id" => "012",
            "date" => "2019-07-01",
            "race" => "W",
            "armed" => "knife",
        });
        sources.incidents.push(row! { "id" => " 13", "date" => "2019-01-01" });

        let curated = Curation::new(options()?).run(&sources)?;
        assert_eq!(curated.report.duplicate_ids, vec![12, 13]);
        assert_eq!(curated.report.retained, 2);

        let mut ids: Vec<u64> = curated
            .lookup
            .groups
            .iter()
            .flat_map(|g| {
                g.ids.iter().chain(g.missing.iter().flatten()).copied()
            })
            .collect();
        ids.sort();
        assert_eq!(ids, vec![12, 13]);

        // the first row wins
        let white_knife = curated
            .lookup
            .groups
            .iter()
            .find(|g| g.race == Race::White && g.armed == Armed::Knife)
            .unwrap();
        assert_eq!(white_knife.n, 0);
        assert_eq!(curated.incidents[0].name, "Jane Doe");
        Ok(())
    }

    #[test]
    fn run_stamps_version() -> TestResult {
        let versioned = Options {
            version: Some("1.2.0".into()),
            ..options()?
        };

        let curated = Curation::new(versioned).run(&sources())?;
        assert_eq!(curated.lookup.version.as_deref(), Some("1.2.0"));

        let curated = Curation::new(options()?).run(&sources())?;
        assert_eq!(curated.lookup.version, None);
        Ok(())
    }

    #[test]
    fn publish_from_str() -> TestResult {
        assert_eq!(Publish::from_str("sufficient")?, Publish::Sufficient);
        assert_eq!(Publish::from_str("all")?, Publish::All);
        assert!(Publish::from_str("none").is_err());
        assert_eq!(Publish::All.to_string(), "all");
        Ok(())
    }
}
