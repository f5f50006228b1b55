use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{bail, CuratorError, CuratorResult};
use crate::incident::Incident;

/// Parses a calendar date.
///
/// Accepts ISO dates (`2019-03-04`), US-style dates (`3/4/2019`,
/// `3/4/19`) and RFC 3339 timestamps. Returns `None` if the value
/// isn't a date in any of these formats.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains('/') {
        // `%Y` would read a two-digit year literally (19 => 0019).
        let year = value.rsplit('/').next().unwrap_or_default();
        let fmt = if year.len() == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
        return NaiveDate::parse_from_str(value, fmt).ok();
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Returns the ISO representation of `value`, if it is a valid date,
/// or the trimmed input otherwise.
pub fn normalize_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.trim().to_string(),
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> CuratorResult<Self> {
        if from > to {
            bail!("invalid date range: {from} is after {to}");
        }

        Ok(Self { from, to })
    }

    /// Creates the range covering the calendar year `year`.
    pub fn year(year: i32) -> CuratorResult<Self> {
        let from = NaiveDate::from_ymd_opt(year, 1, 1);
        let to = NaiveDate::from_ymd_opt(year, 12, 31);

        match (from, to) {
            (Some(from), Some(to)) => Ok(Self { from, to }),
            _ => Err(CuratorError::InvalidDate(year.to_string())),
        }
    }

    #[inline]
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.from <= *date && *date <= self.to
    }

    /// Returns `true` if the date of `incident` parses and falls into
    /// the range. Unparseable dates are out of range.
    pub fn includes(&self, incident: &Incident) -> bool {
        parse_date(&incident.date)
            .map(|date| self.contains(&date))
            .unwrap_or(false)
    }
}

/// Keeps the incidents dated within `range`.
///
/// Returns the retained incidents and the number of incidents dropped
/// because their date didn't parse.
pub fn filter(
    incidents: Vec<Incident>,
    range: Option<&DateRange>,
) -> (Vec<Incident>, usize) {
    let Some(range) = range else {
        return (incidents, 0);
    };

    let mut undated = 0;
    let retained = incidents
        .into_iter()
        .filter(|incident| {
            if parse_date(&incident.date).is_none() {
                undated += 1;
                return false;
            }

            range.includes(incident)
        })
        .collect();

    (retained, undated)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn incident(id: u64, date: &str) -> Incident {
        Incident {
            id,
            date: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2019-03-04"), Some(ymd(2019, 3, 4)));
        assert_eq!(parse_date("3/4/2019"), Some(ymd(2019, 3, 4)));
        assert_eq!(parse_date(" 12/31/2019 "), Some(ymd(2019, 12, 31)));
        assert_eq!(
            parse_date("2019-03-04T10:00:00Z"),
            Some(ymd(2019, 3, 4))
        );
        assert_eq!(parse_date("3/4/19"), Some(ymd(2019, 3, 4)));

        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("March 4th"), None);
        assert_eq!(parse_date("2019-02-30"), None);
    }

    #[test]
    fn normalize_date_keeps_unparseable() {
        assert_eq!(normalize_date("3/4/2019"), "2019-03-04");
        assert_eq!(normalize_date(" unknown "), "unknown");
    }

    #[test]
    fn date_range_year() -> TestResult {
        let range = DateRange::year(2019)?;
        assert!(range.contains(&ymd(2019, 1, 1)));
        assert!(range.contains(&ymd(2019, 12, 31)));
        assert!(!range.contains(&ymd(2018, 12, 31)));
        assert!(!range.contains(&ymd(2020, 1, 1)));
        Ok(())
    }

    #[test]
    fn date_range_invalid() {
        assert!(DateRange::new(ymd(2020, 1, 1), ymd(2019, 1, 1)).is_err());
        assert!(DateRange::year(i32::MAX).is_err());
    }

    #[test]
    fn filter_excludes_unparseable_dates() -> TestResult {
        let range = DateRange::year(2019)?;
        let incidents = vec![
            incident(1, "2019-03-04"),
            incident(2, "2018-12-31"),
            incident(3, ""),
            incident(4, "n/a"),
            incident(5, "3/4/2019"),
        ];

        let (retained, undated) = filter(incidents, Some(&range));
        let ids: Vec<_> = retained.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(undated, 2);
        Ok(())
    }

    #[test]
    fn filter_without_range() {
        let incidents = vec![incident(1, ""), incident(2, "2019-01-01")];
        let (retained, undated) = filter(incidents, None);
        assert_eq!(retained.len(), 2);
        assert_eq!(undated, 0);
    }
}
