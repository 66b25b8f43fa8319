pub mod actions;
pub mod emit;

use thiserror::Error;
use uuid::Uuid;

use crate::project::models::{MarkerRow, MarkerTable, Position, RowText};
use crate::setlist::Setlist;

/// Number given to the sentinel marker.
pub const SENTINEL_NUMBER: u32 = 99;
/// Position of the sentinel marker, in seconds.
pub const SENTINEL_POSITION: i64 = 1;

#[derive(Error, Debug, PartialEq)]
pub enum SynthError {
    #[error("No region position found for song \"{song}\"")]
    SongPositionNotFound { song: String },
}

pub type Result<T> = std::result::Result<T, SynthError>;

/// Build the rows of the exported marker section.
///
/// Emits the sentinel, then a start marker and a skip marker per setlist
/// entry, merges them with the regions of `table` and sorts by position.
/// Ties keep regions ahead of new markers, and new markers in creation order.
pub fn synthesize(table: &MarkerTable, setlist: &Setlist) -> Result<Vec<MarkerRow>> {
    let n = setlist.len();
    log::info!("Creating markers for {n} songs");

    let mut markers = Vec::with_capacity(2 * n + 1);
    markers.push(point_marker(
        SENTINEL_NUMBER,
        Position::from_whole(SENTINEL_POSITION),
        actions::action_name(actions::SENTINEL_ACTION),
    ));

    for (i, song) in setlist.songs().iter().enumerate() {
        let not_found = || SynthError::SongPositionNotFound { song: song.clone() };

        let region = table.find_region(song).ok_or_else(not_found)?;
        let end = region.end_position.as_ref().ok_or_else(not_found)?;
        let action = actions::skip_action(i, n).ok_or_else(not_found)?;

        markers.push(point_marker(
            marker_number(i + 1),
            region.start_position.clone(),
            song.clone(),
        ));
        markers.push(point_marker(
            marker_number(n + i + 1),
            skip_position(end),
            actions::action_name(action),
        ));
    }

    let mut rows: Vec<MarkerRow> = table.regions().cloned().collect();
    rows.extend(markers);
    rows.sort_by(|a, b| a.start_position.cmp(&b.start_position));

    log::debug!("Export table has {} rows", rows.len());
    Ok(rows)
}

/// One second before the region end, truncated to whole seconds.
pub fn skip_position(end: &Position) -> Position {
    Position::from_whole((end.value() - 1.0).trunc() as i64)
}

fn point_marker(number: u32, start_position: Position, name: String) -> MarkerRow {
    MarkerRow {
        number,
        start_position,
        name,
        is_region: false,
        color: 0,
        uuid: new_guid(),
        end_position: None,
        text: RowText::canonical(number, false, 0),
    }
}

// Setlists are capped well below u32::MAX.
fn marker_number(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn new_guid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}
