use regex::Regex;
use std::sync::LazyLock;

use crate::project::fields::is_field_break;
use crate::project::models::MarkerRow;
use crate::project::{is_marker_line, MARKER_KEYWORD};

/// Section that ends the marker area of a project.
pub const ANCHOR_SECTION: &str = "<PROJBAY";

// Constant columns every marker row carries after the color.
const ROW_CONSTANT: &str = "1";
const ROW_LANE: &str = "R";
const ROW_TRAILER: &str = "0";

// Closing `>` of the project, on its own line.
static CLOSING_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>[ \t]*\r?$").unwrap());

/// Line terminator used by a document: CRLF if any line ends with it.
pub fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Serialize export rows as a block of marker lines.
///
/// The first row has no indentation, the rest are indented two spaces.
/// Regions are followed by their closing line.
pub fn render_rows(rows: &[MarkerRow], eol: &str) -> String {
    let mut out = String::new();

    for (i, row) in rows.iter().enumerate() {
        let indent = if i == 0 { "" } else { "  " };
        let uuid = if row.uuid.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", row.uuid)
        };

        out.push_str(&format!(
            "{indent}{MARKER_KEYWORD} {} {} {} {} {} {ROW_CONSTANT} {ROW_LANE} {uuid} {ROW_TRAILER}{eol}",
            row.text.number,
            row.start_position,
            quote_name(&row.name),
            row.text.flags,
            row.text.color,
        ));

        if row.is_region {
            let end = row
                .end_position
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_default();
            out.push_str(&format!(
                "  {MARKER_KEYWORD} {} {end} \"\" 1{eol}",
                row.text.number
            ));
        }
    }

    out
}

/// Quote a name only when it would not read back as one field.
///
/// Names holding `"` are wrapped in `'...'`, or `` `...` `` if they also
/// hold `'`. Names with a field break, or starting with a quote, get `"..."`.
fn quote_name(name: &str) -> String {
    if name.contains('"') {
        let q = if name.contains('\'') { '`' } else { '\'' };
        format!("{q}{name}{q}")
    } else if name.chars().any(is_field_break) || name.starts_with(['\'', '`']) {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

/// Replace every marker line of `original` with `block`.
///
/// The block goes where the first marker line was. Lines before the anchor
/// section lose their leading indentation.
pub fn splice(original: &str, block: &str) -> String {
    let mut cleaned = String::with_capacity(original.len() + block.len());
    let mut insert_at: Option<usize> = None;

    for line in original.split_inclusive('\n') {
        if is_marker_line(line) {
            insert_at.get_or_insert(cleaned.len());
        } else {
            cleaned.push_str(line);
        }
    }

    let insert_at = insert_at.unwrap_or_else(|| fallback_insert_point(&cleaned));
    cleaned.insert_str(insert_at, block);

    normalize_before_anchor(&cleaned)
}

/// Where to put markers in a project that has none: before the anchor
/// section, else before the project's closing line, else at the end.
fn fallback_insert_point(text: &str) -> usize {
    if let Some(pos) = text.find(ANCHOR_SECTION) {
        return text[..pos].rfind('\n').map_or(0, |nl| nl + 1);
    }
    CLOSING_LINE_RE
        .find_iter(text)
        .last()
        .map_or(text.len(), |m| m.start())
}

/// Strip leading spaces and tabs from every line before the anchor section,
/// including the anchor line itself. Without an anchor the text is unchanged.
pub fn normalize_before_anchor(text: &str) -> String {
    let Some(anchor) = text.find(ANCHOR_SECTION) else {
        log::debug!("No {ANCHOR_SECTION} section, skipping indentation cleanup");
        return text.to_string();
    };

    let (head, tail) = text.split_at(anchor);
    let head: Vec<&str> = head
        .split('\n')
        .map(|l| l.trim_start_matches([' ', '\t']))
        .collect();

    let mut out = head.join("\n");
    out.push_str(tail);
    out
}
