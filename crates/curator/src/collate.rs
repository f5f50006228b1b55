use std::collections::HashMap;
use std::fmt::{self, Display};
use std::slice;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CuratorError, CuratorResult};
use crate::table::{Row, Table};

/// The field of the primary table holding the correlation key.
pub const PRIMARY_KEY: &str = "id";

/// The field of a supplementary table referring to [PRIMARY_KEY].
pub const FOREIGN_KEY: &str = "wapo_id";

/// The field of the override table, which is keyed directly by the
/// primary id.
pub const OVERRIDE_KEY: &str = "id";

/// How to resolve a primary row matched by more than one row of the
/// same supplementary table.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Take the first match in table order.
    #[default]
    FirstMatch,
    /// Fail the collation.
    ErrorOnAmbiguous,
    /// Keep every match in table order.
    CollectAll,
}

impl Display for JoinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMatch => write!(f, "first-match"),
            Self::ErrorOnAmbiguous => write!(f, "error-on-ambiguous"),
            Self::CollectAll => write!(f, "collect-all"),
        }
    }
}

impl FromStr for JoinPolicy {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-match" => Ok(Self::FirstMatch),
            "error-on-ambiguous" => Ok(Self::ErrorOnAmbiguous),
            "collect-all" => Ok(Self::CollectAll),
            _ => Err(CuratorError::other(format!(
                "invalid join policy '{s}'"
            ))),
        }
    }
}

/// Identifies one of the source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// The primary incident registry.
    Incidents,
    /// The image/description registry.
    Descriptions,
    /// The news-reference registry.
    News,
    /// The video-reference registry.
    Videos,
    /// The manual-override registry.
    Overrides,
}

/// The in-memory source tables of a curation run.
#[derive(Debug, Default, Clone)]
pub struct Sources {
    pub incidents: Table,
    pub descriptions: Table,
    pub news: Table,
    pub videos: Table,
    pub overrides: Option<Table>,
}

/// One primary row together with its matches in the supplementary
/// tables. An empty slot means there was no match.
#[derive(Debug, Clone)]
pub struct JoinedTuple<'a> {
    pub primary: &'a Row,
    pub descriptions: Vec<&'a Row>,
    pub news: Vec<&'a Row>,
    pub videos: Vec<&'a Row>,
    pub overrides: Vec<&'a Row>,
}

impl<'a> JoinedTuple<'a> {
    /// Returns the rows joined from `source`.
    pub fn slot(&self, source: Source) -> &[&'a Row] {
        match source {
            Source::Incidents => slice::from_ref(&self.primary),
            Source::Descriptions => &self.descriptions,
            Source::News => &self.news,
            Source::Videos => &self.videos,
            Source::Overrides => &self.overrides,
        }
    }
}

/// A primary key matched by more than one row of a supplementary
/// table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    pub table: String,
    pub key: String,
    pub count: usize,
}

#[derive(Debug)]
pub struct Collation<'a> {
    pub tuples: Vec<JoinedTuple<'a>>,
    pub ambiguities: Vec<Ambiguity>,
}

struct KeyIndex<'a> {
    table: &'a Table,
    positions: HashMap<&'a str, Vec<usize>>,
}

impl<'a> KeyIndex<'a> {
    /// Indexes the rows of `table` by the value of `field`. Rows with
    /// an empty reference don't refer to any primary row.
    fn new(table: &'a Table, field: &str) -> Self {
        let mut positions: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, row) in table.iter().enumerate() {
            let key = row.get(field);
            if !key.is_empty() {
                positions.entry(key).or_default().push(idx);
            }
        }

        Self { table, positions }
    }

    fn join(
        &self,
        key: &str,
        policy: JoinPolicy,
        ambiguities: &mut Vec<Ambiguity>,
    ) -> CuratorResult<Vec<&'a Row>> {
        let Some(matches) = self.positions.get(key) else {
            return Ok(vec![]);
        };

        if matches.len() > 1 {
            let ambiguity = Ambiguity {
                table: self.table.name().to_string(),
                key: key.to_string(),
                count: matches.len(),
            };

            match policy {
                JoinPolicy::ErrorOnAmbiguous => {
                    return Err(CuratorError::AmbiguousJoin {
                        table: ambiguity.table,
                        key: ambiguity.key,
                        count: ambiguity.count,
                    });
                }
                JoinPolicy::FirstMatch => log::warn!(
                    "{} rows of '{}' refer to id '{}', using the first",
                    ambiguity.count,
                    ambiguity.table,
                    ambiguity.key
                ),
                JoinPolicy::CollectAll => log::debug!(
                    "{} rows of '{}' refer to id '{}'",
                    ambiguity.count,
                    ambiguity.table,
                    ambiguity.key
                ),
            }

            ambiguities.push(ambiguity);
        }

        let rows = self.table.rows();
        Ok(match policy {
            JoinPolicy::FirstMatch => {
                matches.iter().take(1).map(|&idx| &rows[idx]).collect()
            }
            _ => matches.iter().map(|&idx| &rows[idx]).collect(),
        })
    }
}

/// Correlates every primary row with the rows of the supplementary
/// tables referring to it.
///
/// Exactly one [JoinedTuple] is produced per primary row, in the order
/// of the primary table. Keys are compared by exact string equality.
pub fn collate(
    sources: &Sources,
    policy: JoinPolicy,
) -> CuratorResult<Collation<'_>> {
    let descriptions = KeyIndex::new(&sources.descriptions, FOREIGN_KEY);
    let news = KeyIndex::new(&sources.news, FOREIGN_KEY);
    let videos = KeyIndex::new(&sources.videos, FOREIGN_KEY);
    let override_index = sources
        .overrides
        .as_ref()
        .map(|table| KeyIndex::new(table, OVERRIDE_KEY));

    let mut ambiguities = vec![];
    let mut tuples = Vec::with_capacity(sources.incidents.len());

    for primary in sources.incidents.iter() {
        let key = primary.get(PRIMARY_KEY);

        let overrides = match override_index {
            Some(ref index) => index.join(key, policy, &mut ambiguities)?,
            None => vec![],
        };

        tuples.push(JoinedTuple {
            primary,
            descriptions: descriptions.join(key, policy, &mut ambiguities)?,
            news: news.join(key, policy, &mut ambiguities)?,
            videos: videos.join(key, policy, &mut ambiguities)?,
            overrides,
        });
    }

    log::debug!(
        "collated {} primary rows ({} ambiguous joins)",
        tuples.len(),
        ambiguities.len()
    );

    Ok(Collation {
        tuples,
        ambiguities,
    })
}
