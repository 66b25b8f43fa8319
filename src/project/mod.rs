pub mod fields;
pub mod models;

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use fields::{split_fields, strip_braces, unquote_name};
use models::{MarkerRow, MarkerTable, Position, RowText};

/// Keyword that starts every marker and region line.
pub const MARKER_KEYWORD: &str = "MARKER";

/// Fewest fields a marker line may carry (region end lines stop after the flags).
const MIN_FIELDS: usize = 5;
/// `tag number start name flags color 1 R {guid} 0`
const MAX_FIELDS: usize = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Malformed MARKER line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;

// A line whose first non-indentation token is exactly MARKER.
static MARKER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*MARKER(?:\s|$)").unwrap());

/// Whether a line (with or without its terminator) is a marker line.
pub fn is_marker_line(line: &str) -> bool {
    MARKER_LINE_RE.is_match(line)
}

/// Parse every marker line of a project into a table.
///
/// Rows keep file order. End positions are derived from the following row
/// before unnamed rows (region end lines) are dropped, so each region ends
/// where the next line in the file starts.
pub fn parse(text: &str) -> Result<MarkerTable> {
    let mut rows: Vec<MarkerRow> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if !is_marker_line(line) {
            continue;
        }
        rows.push(parse_line(line, idx + 1)?);
    }

    // Derive ends while every row is still in file order
    let starts: Vec<Position> = rows.iter().map(|r| r.start_position.clone()).collect();
    for (i, row) in rows.iter_mut().enumerate() {
        row.end_position = if row.is_region {
            starts.get(i + 1).cloned()
        } else {
            None
        };
    }

    let total = rows.len();
    rows.retain(|r| !r.name.is_empty());
    log::debug!(
        "Parsed {total} MARKER lines, {} named rows kept",
        rows.len()
    );

    Ok(MarkerTable { rows })
}

/// Drop every point marker, keeping regions in their original order.
pub fn strip_point_markers(table: &MarkerTable) -> MarkerTable {
    let rows: Vec<MarkerRow> = table.regions().cloned().collect();
    log::info!(
        "Removed {} point markers, {} regions remaining",
        table.len() - rows.len(),
        rows.len()
    );
    MarkerTable { rows }
}

fn parse_line(line: &str, line_no: usize) -> Result<MarkerRow> {
    let malformed = |reason: String| ParseError::MalformedLine { line: line_no, reason };

    let fields = split_fields(line);
    if fields.len() < MIN_FIELDS || fields.len() > MAX_FIELDS {
        return Err(malformed(format!(
            "expected {MIN_FIELDS} to {MAX_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let number: u32 = fields[1]
        .parse()
        .map_err(|_| malformed(format!("marker number {:?} is not an integer", fields[1])))?;

    let start_position = Position::parse(fields[2])
        .ok_or_else(|| malformed(format!("position {:?} is not a number", fields[2])))?;

    let flags: i64 = fields[4]
        .parse()
        .map_err(|_| malformed(format!("region flag {:?} is not an integer", fields[4])))?;

    let color_text = fields.get(5).copied().unwrap_or("0");
    let color: i64 = color_text
        .parse()
        .map_err(|_| malformed(format!("color {color_text:?} is not an integer")))?;

    let uuid = fields.get(8).map(|u| strip_braces(u)).unwrap_or_default();

    Ok(MarkerRow {
        number,
        start_position,
        name: unquote_name(fields[3]),
        is_region: flags & 1 != 0,
        color,
        uuid,
        end_position: None,
        text: RowText {
            number: fields[1].to_string(),
            flags: fields[4].to_string(),
            color: color_text.to_string(),
        },
    })
}
