//! Import and export of the comma-separated timeline format.
//!
//! The format is one metadata line followed by one line per row:
//!
//! ```text
//! title,height,width
//! name,comment,MM.YYYY,MM.YYYY
//! ```
//!
//! There is no quoting, so the writer refuses values that contain the
//! separator or line breaks instead of emitting a file that cannot be
//! read back. The reader reports malformed lines by number instead of
//! loading undefined fields.

use thiserror::Error;

use crate::chart::ChartSettings;
use crate::date::MonthYear;
use crate::rows::TimelineRow;

/// Error type for reading the exchange format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Line 1: expected title,height,width, got {0} fields")]
    BadHeader(usize),

    #[error("Line 1: height and width must be numeric, got: {0}")]
    BadDimension(String),

    #[error("Line {line}: expected name,comment,start,end, got {found} fields")]
    BadLine { line: usize, found: usize },

    #[error("Line {line}: correct date format is MM.YYYY, got: {value}")]
    BadDate { line: usize, value: String },
}

/// Error type for writing the exchange format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Line {line}: {field} contains a comma or line break and cannot be encoded")]
    UnencodableField { field: &'static str, line: usize },
}

/// A parsed exchange file: the chart settings carried by the metadata
/// line plus the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub height: String,
    pub width: String,
    pub rows: Vec<TimelineRow>,
}

impl Document {
    /// Copy the metadata into chart settings, leaving the fields the
    /// format does not carry (palette, label visibility) untouched.
    pub fn apply_to_settings(&self, settings: &mut ChartSettings) {
        settings.title.clone_from(&self.title);
        settings.height.clone_from(&self.height);
        settings.width.clone_from(&self.width);
    }
}

/// Parse exchange text into a document.
///
/// Carriage returns are stripped first, blank lines are skipped, and
/// missing or empty metadata fields fall back to the defaults
/// (`Timeline`/`400`/`900`). Data lines must have exactly four fields;
/// non-empty dates must parse as `MM.YYYY` and are normalized to
/// zero-padded form. Errors carry 1-based line numbers.
pub fn parse_document(text: &str) -> Result<Document, ParseError> {
    let defaults = ChartSettings::default();
    let text = text.replace('\r', "");
    let mut lines = text.split('\n').enumerate();

    // First non-blank line is metadata
    let (mut title, mut height, mut width) =
        (defaults.title, defaults.height, defaults.width);
    for (_, line) in lines.by_ref() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() > 3 {
            return Err(ParseError::BadHeader(fields.len()));
        }
        let field = |i: usize| fields.get(i).copied().unwrap_or("");
        if !field(0).is_empty() {
            title = field(0).to_string();
        }
        for value in [field(1), field(2)] {
            if !value.is_empty() && !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::BadDimension(value.to_string()));
            }
        }
        if !field(1).is_empty() {
            height = field(1).to_string();
        }
        if !field(2).is_empty() {
            width = field(2).to_string();
        }
        break;
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            return Err(ParseError::BadLine {
                line: index + 1,
                found: fields.len(),
            });
        }
        rows.push(TimelineRow::new(
            fields[0],
            fields[1],
            normalize_date(fields[2], index + 1)?,
            normalize_date(fields[3], index + 1)?,
        ));
    }

    Ok(Document {
        title,
        height,
        width,
        rows,
    })
}

/// Empty dates pass through; anything else must parse and comes back
/// zero-padded.
fn normalize_date(value: &str, line: usize) -> Result<String, ParseError> {
    if value.is_empty() {
        return Ok(String::new());
    }
    match MonthYear::parse(value) {
        Ok(my) => Ok(my.to_string()),
        Err(_) => Err(ParseError::BadDate {
            line,
            value: value.to_string(),
        }),
    }
}

/// Serialize settings and rows to exchange text.
///
/// Refuses any value containing a comma, newline, or carriage return;
/// the format has no escaping and such a file would not round-trip.
pub fn serialize_document(
    settings: &ChartSettings,
    rows: &[TimelineRow],
) -> Result<String, ExportError> {
    check_encodable(&settings.title, "title", 1)?;
    check_encodable(&settings.height, "height", 1)?;
    check_encodable(&settings.width, "width", 1)?;

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!(
        "{},{},{}",
        settings.title, settings.height, settings.width
    ));

    for (index, row) in rows.iter().enumerate() {
        let line = index + 2;
        check_encodable(&row.name, "name", line)?;
        check_encodable(&row.comment, "comment", line)?;
        check_encodable(&row.start_time, "start", line)?;
        check_encodable(&row.end_time, "end", line)?;
        lines.push(format!(
            "{},{},{},{}",
            row.name, row.comment, row.start_time, row.end_time
        ));
    }

    Ok(lines.join("\n"))
}

fn check_encodable(value: &str, field: &'static str, line: usize) -> Result<(), ExportError> {
    if value.contains(',') || value.contains('\n') || value.contains('\r') {
        return Err(ExportError::UnencodableField { field, line });
    }
    Ok(())
}
