//! Timeline rows and the ordered row list backing the entry form.

use serde::{Deserialize, Serialize};

/// One entry on the timeline: a name, an optional comment, and a
/// `MM.YYYY` range.
///
/// Field names follow the stored JSON shape (`startTime`/`endTime`), and
/// every field defaults to empty so rows written without a `comment` by
/// older data still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl TimelineRow {
    pub fn new(
        name: impl Into<String>,
        comment: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.comment.is_empty()
            && self.start_time.is_empty()
            && self.end_time.is_empty()
    }
}

/// The four editable fields of a row, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Name,
    Comment,
    StartTime,
    EndTime,
}

impl RowField {
    pub const ALL: [RowField; 4] = [
        RowField::Name,
        RowField::Comment,
        RowField::StartTime,
        RowField::EndTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RowField::Name => "Name",
            RowField::Comment => "Comment",
            RowField::StartTime => "Start",
            RowField::EndTime => "End",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, RowField::StartTime | RowField::EndTime)
    }
}

/// Ordered list of timeline rows.
///
/// The list is never empty: the form always shows at least one
/// (possibly blank) row, so every mutation that could empty it leaves
/// a single blank row behind instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStore {
    rows: Vec<TimelineRow>,
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RowStore {
    /// Create a store holding a single blank row.
    pub fn new() -> Self {
        Self {
            rows: vec![TimelineRow::default()],
        }
    }

    pub fn rows(&self) -> &[TimelineRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; the store never drops below one row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimelineRow> {
        self.rows.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TimelineRow> {
        self.rows.get_mut(index)
    }

    /// Read one field of one row. Out-of-range indexes read as empty.
    pub fn field(&self, index: usize, field: RowField) -> &str {
        self.rows.get(index).map_or("", |row| match field {
            RowField::Name => row.name.as_str(),
            RowField::Comment => row.comment.as_str(),
            RowField::StartTime => row.start_time.as_str(),
            RowField::EndTime => row.end_time.as_str(),
        })
    }

    /// Overwrite one field of one row. Out-of-range indexes are ignored.
    pub fn set_field(&mut self, index: usize, field: RowField, value: impl Into<String>) {
        if let Some(row) = self.rows.get_mut(index) {
            let value = value.into();
            match field {
                RowField::Name => row.name = value,
                RowField::Comment => row.comment = value,
                RowField::StartTime => row.start_time = value,
                RowField::EndTime => row.end_time = value,
            }
        }
    }

    /// Append exactly one blank row.
    pub fn add_row(&mut self) {
        self.rows.push(TimelineRow::default());
    }

    /// Remove the last row. No-op while only one row remains.
    pub fn remove_last(&mut self) {
        if self.rows.len() > 1 {
            self.rows.pop();
        }
    }

    /// Remove the row at `index`. No-op while only one row remains or
    /// when `index` is out of range.
    pub fn remove(&mut self, index: usize) {
        if self.rows.len() > 1 && index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Reset to a single blank row.
    pub fn clear(&mut self) {
        self.rows = vec![TimelineRow::default()];
    }

    /// Replace the whole list. An empty replacement leaves a single blank
    /// row so the form stays editable.
    pub fn replace_all(&mut self, rows: Vec<TimelineRow>) {
        if rows.is_empty() {
            self.clear();
        } else {
            self.rows = rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_single_blank_row() {
        let store = RowStore::new();
        assert_eq!(store.len(), 1);
        assert!(store.rows()[0].is_empty());
    }

    #[test]
    fn test_add_row_appends_one_blank_row() {
        let mut store = RowStore::new();
        store.set_field(0, RowField::Name, "Project 1");

        store.add_row();

        assert_eq!(store.len(), 2);
        assert_eq!(store.rows()[0].name, "Project 1");
        assert!(store.rows()[1].is_empty());
    }

    #[test]
    fn test_remove_last_is_noop_at_one_row() {
        let mut store = RowStore::new();
        store.remove_last();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_last_pops() {
        let mut store = RowStore::new();
        store.add_row();
        store.add_row();

        store.remove_last();
        assert_eq!(store.len(), 2);
        store.remove_last();
        assert_eq!(store.len(), 1);
        store.remove_last();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_at_index() {
        let mut store = RowStore::new();
        store.set_field(0, RowField::Name, "a");
        store.add_row();
        store.set_field(1, RowField::Name, "b");
        store.add_row();
        store.set_field(2, RowField::Name, "c");

        store.remove(1);

        assert_eq!(store.len(), 2);
        assert_eq!(store.rows()[0].name, "a");
        assert_eq!(store.rows()[1].name, "c");
    }

    #[test]
    fn test_remove_at_index_respects_floor() {
        let mut store = RowStore::new();
        store.set_field(0, RowField::Name, "only");

        store.remove(0);

        assert_eq!(store.len(), 1);
        assert_eq!(store.rows()[0].name, "only");
    }

    #[test]
    fn test_clear_resets_to_single_blank_row() {
        let mut store = RowStore::new();
        store.set_field(0, RowField::Name, "Project 1");
        store.add_row();
        store.add_row();

        store.clear();

        assert_eq!(store.len(), 1);
        assert!(store.rows()[0].is_empty());
    }

    #[test]
    fn test_replace_all_empty_leaves_blank_row() {
        let mut store = RowStore::new();
        store.add_row();

        store.replace_all(Vec::new());

        assert_eq!(store.len(), 1);
        assert!(store.rows()[0].is_empty());
    }

    #[test]
    fn test_replace_all_takes_rows_verbatim() {
        let mut store = RowStore::new();
        store.replace_all(vec![
            TimelineRow::new("Project 1", "Comment", "01.2024", "12.2024"),
            TimelineRow::new("Project 2", "", "02.2024", "11.2024"),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.rows()[0].start_time, "01.2024");
        assert_eq!(store.rows()[1].name, "Project 2");
    }

    #[test]
    fn test_row_json_uses_camel_case_keys() {
        let row = TimelineRow::new("P", "C", "01.2024", "02.2024");
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"startTime\""));
        assert!(json.contains("\"endTime\""));
        assert!(json.contains("\"comment\""));
    }

    #[test]
    fn test_row_json_missing_fields_backfill_empty() {
        let row: TimelineRow =
            serde_json::from_str(r#"{"name":"P","startTime":"01.2024"}"#).unwrap();
        assert_eq!(row.name, "P");
        assert_eq!(row.comment, "");
        assert_eq!(row.start_time, "01.2024");
        assert_eq!(row.end_time, "");
    }

    #[test]
    fn test_field_accessors() {
        let mut store = RowStore::new();
        store.set_field(0, RowField::StartTime, "03.2024");
        assert_eq!(store.field(0, RowField::StartTime), "03.2024");
        assert_eq!(store.field(0, RowField::EndTime), "");
        assert_eq!(store.field(7, RowField::Name), "");

        // out-of-range writes are dropped
        store.set_field(7, RowField::Name, "x");
        assert_eq!(store.len(), 1);
    }
}
