use std::fs;
use std::path::PathBuf;

use clap::Parser;
use comfy_table::{presets, Row, Table};
use curator::{IncidentGroup, IncidentLookupTable};

use crate::prelude::*;

/// Prints a summary of the lookup table.
#[derive(Debug, Default, Parser)]
pub(crate) struct Summary {
    /// The lookup table to summarize. By default the index of the
    /// project's output directory is used.
    #[arg(value_name = "filename")]
    path: Option<PathBuf>,
}

/// Returns the number of incidents of `group` lacking content. Tables
/// built without tracking only carry the counts.
fn missing(group: &IncidentGroup) -> usize {
    match group.missing {
        Some(ref ids) => ids.len(),
        None => group.n.saturating_sub(group.satisfied()),
    }
}

fn render(lookup: &IncidentLookupTable) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(Row::from(vec![
        "race", "armed", "n", "content", "missing",
    ]));

    for group in lookup.groups.iter() {
        table.add_row(vec![
            group.race.to_string(),
            group.armed.to_string(),
            group.n.to_string(),
            group.satisfied().to_string(),
            missing(group).to_string(),
        ]);
    }

    table
}

impl Summary {
    pub(crate) fn execute(self) -> IncidentsResult<()> {
        let path = match self.path {
            Some(path) => path,
            None => Project::discover()?.index()?,
        };

        let lookup: IncidentLookupTable =
            serde_json::from_slice(&fs::read(&path)?)?;
        let summary = lookup.summary();

        if !lookup.description.is_empty() {
            eprintln!("{}\n", lookup.description);
        }

        println!("{}", render(&lookup));
        println!(
            "{} of {} incidents ({:.1}%) have sufficient content.",
            summary.satisfied,
            summary.total,
            summary.ratio() * 100.0
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use curator::{Armed, Race};

    use super::*;

    #[test]
    fn render_groups() {
        let lookup = IncidentLookupTable {
            description: "".into(),
            version: None,
            groups: vec![
                IncidentGroup {
                    race: Race::Hispanic,
                    armed: Armed::Knife,
                    n: 0,
                    ids: vec![],
                    missing: Some(vec![]),
                },
                IncidentGroup {
                    race: Race::Black,
                    armed: Armed::Unarmed,
                    n: 3,
                    ids: vec![4],
                    missing: None,
                },
            ],
        };

        let table = render(&lookup);
        assert_eq!(table.row_iter().count(), 2);

        let output = table.to_string();
        assert!(output.contains("Hispanic"));
        assert!(output.contains("Unarmed"));
    }

    #[test]
    fn missing_from_inconsistent_counts() {
        let mut group = IncidentGroup {
            race: Race::White,
            armed: Armed::Gun,
            n: 1,
            ids: vec![1, 2, 3],
            missing: None,
        };
        assert_eq!(missing(&group), 0);

        group.n = 5;
        assert_eq!(missing(&group), 2);

        group.missing = Some(vec![4]);
        assert_eq!(missing(&group), 1);
    }
}
