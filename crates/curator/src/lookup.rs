use serde::{Deserialize, Serialize};

use crate::category::{Armed, Race};
use crate::gate::is_sufficient;
use crate::group::Group;

/// A lightweight reference to the incidents of one cell of the
/// race × armed-status cross-product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentGroup {
    pub race: Race,
    pub armed: Armed,
    /// The total number of incidents in this cell.
    pub n: usize,
    /// The ids of the incidents with sufficient content.
    pub ids: Vec<u64>,
    /// The ids of the incidents lacking sufficient content, if tracked.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub missing: Option<Vec<u64>>,
}

impl IncidentGroup {
    /// Returns the number of incidents with sufficient content.
    #[inline]
    pub fn satisfied(&self) -> usize {
        self.ids.len()
    }
}

/// All incidents binned by race and armed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentLookupTable {
    /// A short blurb, e.g. "2019 shootings, wapo database, sampled".
    pub description: String,
    /// The version of the dataset the table was built from.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
    pub groups: Vec<IncidentGroup>,
}

/// Satisfied vs. total counts of a lookup table, for reporting only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub satisfied: usize,
    pub total: usize,
}

impl Summary {
    /// Returns the share of incidents with sufficient content. The
    /// ratio of an empty table is defined to `0.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        self.satisfied as f64 / self.total as f64
    }
}

impl IncidentLookupTable {
    /// Builds the lookup table from grouped incidents.
    ///
    /// The order of `groups` is kept. The ids of each group are split
    /// by [is_sufficient]; the unsatisfied ids are only kept if
    /// `track_missing` is set.
    pub fn build<S: Into<String>>(
        description: S,
        groups: &[Group<'_>],
        track_missing: bool,
    ) -> Self {
        let groups = groups
            .iter()
            .map(|group| {
                let (ids, missing): (Vec<u64>, Vec<u64>) = group
                    .members
                    .iter()
                    .map(|incident| (incident.id, is_sufficient(incident)))
                    .fold((vec![], vec![]), |mut acc, (id, ok)| {
                        if ok {
                            acc.0.push(id);
                        } else {
                            acc.1.push(id);
                        }
                        acc
                    });

                IncidentGroup {
                    race: group.race,
                    armed: group.armed,
                    n: group.n(),
                    ids,
                    missing: track_missing.then_some(missing),
                }
            })
            .collect();

        Self {
            description: description.into(),
            version: None,
            groups,
        }
    }

    /// Sets the dataset version of the table.
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Returns the aggregated satisfied vs. total counts.
    pub fn summary(&self) -> Summary {
        self.groups.iter().fold(Summary::default(), |acc, group| Summary {
            satisfied: acc.satisfied + group.satisfied(),
            total: acc.total + group.n,
        })
    }
}
