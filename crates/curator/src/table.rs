use std::collections::HashMap;
use std::ops::Deref;

/// A single row of a source table.
///
/// Source tables carry no type guarantees: every value is kept as the
/// text found in the source and a missing field reads as the empty
/// string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Row(HashMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of the field `name` or an empty string, if the
    /// row doesn't have such a field.
    #[inline]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(name.into(), value.into())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A named, ordered sequence of rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<S: Into<String>>(name: S, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Returns the name of the table, which is used in log messages
    /// and reports.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }
}

impl Deref for Table {
    type Target = [Row];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

/// Creates a [Row] from a list of `field => value` pairs.
///
/// ```
/// use curator::row;
///
/// let row = row! { "id" => "12", "race" => "B" };
/// assert_eq!(row.get("race"), "B");
/// assert_eq!(row.get("armed"), "");
/// ```
#[macro_export]
macro_rules! row {
    ($($name:expr => $value:expr),* $(,)?) => {{
        let mut row = $crate::table::Row::new();
        $(let _ = row.insert($name, $value);)*
        row
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_missing_field_is_empty() {
        let row = row! { "id" => "1" };
        assert_eq!(row.get("id"), "1");
        assert_eq!(row.get("name"), "");
        assert!(!row.contains("name"));
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn table_keeps_row_order() {
        let table = Table::new(
            "wapo",
            vec![row! { "id" => "2" }, row! { "id" => "1" }],
        );

        let ids: Vec<_> = table.iter().map(|r| r.get("id")).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(table.name(), "wapo");
    }
}
