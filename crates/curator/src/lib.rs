//! # Curator
//!
//! This crate joins the independently sourced extracts of a
//! police-use-of-force dataset into one canonical record per incident
//! and decides which records are published in full.
//!
//! A curation run is a single in-memory pass over the source tables:
//!
//! 1. [collate](collate::collate) correlates the supplementary tables
//!    with the primary incident table,
//! 2. [merge](merge::merge) flattens each joined tuple into an
//!    [Incident],
//! 3. [repair](repair::repair) folds video URLs into canonical video
//!    ids,
//! 4. [filter](period::filter) restricts the incidents to a date range,
//! 5. [group](group::group) bins the incidents by race and armed
//!    status,
//! 6. [IncidentLookupTable::build] splits every bin into incidents with
//!    and without sufficient content ([is_sufficient]).
//!
//! [Curation] runs all stages. Reading the source files and writing
//! the results is left to the caller.
//!
//! ```
//! use curator::{row, Curation, Options, Sources, Table};
//!
//! let sources = Sources {
//!     incidents: Table::new(
//!         "wapo",
//!         vec![row! { "id" => "12", "date" => "2019-03-04" }],
//!     ),
//!     ..Default::default()
//! };
//!
//! let curated = Curation::new(Options::default()).run(&sources).unwrap();
//! assert_eq!(curated.lookup.groups.len(), 16);
//! assert!(curated.incidents.is_empty());
//! ```

pub use category::{classify_armed, classify_race, Armed, Race};
pub use collate::{Ambiguity, JoinPolicy, Sources};
pub use curation::{Curated, Curation, Options, Publish, Report};
pub use error::{CuratorError, CuratorResult};
pub use gate::is_sufficient;
pub use incident::Incident;
pub use lookup::{IncidentGroup, IncidentLookupTable, Summary};
pub use period::DateRange;
pub use table::{Row, Table};

pub mod category;
pub mod collate;
pub mod curation;
mod error;
pub mod gate;
pub mod group;
pub mod incident;
pub mod lookup;
pub mod merge;
pub mod period;
pub mod repair;
pub mod table;
