use std::path::Path;

use csv::{ReaderBuilder, Trim};
use curator::{Sources, Table};

use crate::config;
use crate::error::IncidentsResult;

/// Reads a CSV file with a header row into a [Table].
///
/// Every row becomes a mapping from the header names to the raw field
/// values. Short rows are accepted; their missing fields read as empty.
pub(crate) fn read_table<P: AsRef<Path>>(
    name: &str,
    path: P,
) -> IncidentsResult<Table> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut table = Table::new(name, vec![]);

    for result in reader.records() {
        let record = result?;
        table.push(headers.iter().zip(record.iter()).collect());
    }

    log::info!("...{} {} rows", path.display(), table.len());
    Ok(table)
}

/// Loads all source tables configured in `sources`. Relative paths are
/// resolved against `base_dir`.
pub(crate) fn load_sources<P: AsRef<Path>>(
    sources: &config::Sources,
    base_dir: P,
) -> IncidentsResult<Sources> {
    let base_dir = base_dir.as_ref();
    log::info!("Loading...");

    let overrides = match sources.overrides {
        Some(ref path) => {
            Some(read_table("overrides", base_dir.join(path))?)
        }
        None => None,
    };

    let sources = Sources {
        incidents: read_table("incidents", base_dir.join(&sources.incidents))?,
        descriptions: read_table(
            "descriptions",
            base_dir.join(&sources.descriptions),
        )?,
        news: read_table("news", base_dir.join(&sources.news))?,
        videos: read_table("videos", base_dir.join(&sources.videos))?,
        overrides,
    };

    log::info!("Done.");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn read_table_rows() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("wapo.csv");
        fs::write(
            &path,
            " id ,name,date,race\n\
             12,\"Doe, John\",2019-03-04,B\n\
             13,Jane Doe\n",
        )?;

        let table = read_table("wapo", &path)?;
        assert_eq!(table.name(), "wapo");
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].get("id"), "12");
        assert_eq!(table[0].get("name"), "Doe, John");
        assert_eq!(table[0].get("race"), "B");
        assert_eq!(table[1].get("name"), "Jane Doe");
        assert_eq!(table[1].get("date"), "");
        Ok(())
    }

    #[test]
    fn read_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_table("wapo", dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn load_sources_relative_paths() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("assets"))?;

        for (name, content) in [
            ("wapo_data.csv", "id,name\n1,A\n2,B\n"),
            ("mpv_data.csv", "id,wapo_id,photo\n7,1,p.jpg\n"),
            ("unarmed_newsapi.csv", "wapo_id,video,news\n"),
            ("unarmed_youtube.csv", "video_id,wapo_id\n"),
        ] {
            fs::write(dir.path().join("assets").join(name), content)?;
        }

        let sources = load_sources(&config::Sources::default(), dir.path())?;
        assert_eq!(sources.incidents.len(), 2);
        assert_eq!(sources.descriptions.len(), 1);
        assert!(sources.news.is_empty());
        assert!(sources.overrides.is_none());
        Ok(())
    }
}
