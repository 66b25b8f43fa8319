use std::cmp::Ordering;
use std::fmt;

/// A timeline position as written in the project file.
///
/// The original text is kept so rows round-trip byte-for-byte; ordering uses
/// the parsed value so `"9"` sorts before `"10"`.
#[derive(Debug, Clone)]
pub struct Position {
    raw: String,
    value: f64,
}

impl Position {
    /// Parse a decimal position. Returns `None` for non-numeric or non-finite text.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: f64 = raw.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self { raw: raw.to_string(), value })
    }

    /// A whole-second position, rendered without a fractional part.
    pub fn from_whole(seconds: i64) -> Self {
        Self {
            raw: seconds.to_string(),
            value: seconds as f64,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

/// One marker or region row.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRow {
    pub number: u32,
    pub start_position: Position,
    pub name: String,
    pub is_region: bool,
    pub color: i64,
    /// GUID without braces.
    pub uuid: String,
    /// Start of the next row in file order. Only set for regions.
    pub end_position: Option<Position>,
    pub text: RowText,
}

/// Number, flags and color columns as written in the file.
///
/// Regions are emitted from this text, so zero-padded numbers and extra
/// flag bits survive an export.
#[derive(Debug, Clone, PartialEq)]
pub struct RowText {
    pub number: String,
    pub flags: String,
    pub color: String,
}

impl RowText {
    /// Text for a row built in memory.
    pub fn canonical(number: u32, is_region: bool, color: i64) -> Self {
        Self {
            number: number.to_string(),
            flags: u8::from(is_region).to_string(),
            color: color.to_string(),
        }
    }
}

impl MarkerRow {
    /// A songs-list candidate: a region with a real (non-zero) color.
    pub fn is_song(&self) -> bool {
        self.is_region && self.color != 0
    }
}

/// Marker rows in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerTable {
    pub rows: Vec<MarkerRow>,
}

impl MarkerTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &MarkerRow> {
        self.rows.iter().filter(|r| r.is_region)
    }

    /// First region with exactly this name.
    pub fn find_region(&self, name: &str) -> Option<&MarkerRow> {
        self.regions().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_orders_numerically() {
        let nine = Position::parse("9").unwrap();
        let ten = Position::parse("10").unwrap();
        assert!(nine < ten);
        assert!(Position::parse("100").unwrap() > Position::parse("20.5").unwrap());
    }

    #[test]
    fn test_position_keeps_raw_text() {
        let p = Position::parse("12.50000000000000").unwrap();
        assert_eq!(p.to_string(), "12.50000000000000");
        assert_eq!(p, Position::parse("12.5").unwrap());
    }

    #[test]
    fn test_position_rejects_garbage() {
        assert!(Position::parse("abc").is_none());
        assert!(Position::parse("").is_none());
        assert!(Position::parse("inf").is_none());
        assert!(Position::parse("NaN").is_none());
    }

    #[test]
    fn test_from_whole() {
        let p = Position::from_whole(19);
        assert_eq!(p.as_str(), "19");
        assert_eq!(p.value(), 19.0);
    }
}
