use std::path::Path;

use thiserror::Error;

use crate::songs::SongList;

/// Most songs a setlist can hold; one skip action id exists per slot.
pub const MAX_SETLIST_LEN: usize = 30;

#[derive(Error, Debug)]
pub enum SetlistError {
    #[error("Song \"{song}\" not in project")]
    InvalidSetlistEntry { song: String },
    #[error("Setlist has {len} songs, at most {max} are supported")]
    TooLong { len: usize, max: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON setlist: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SetlistError>;

/// An ordered, validated selection of songs. Repeats are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Setlist {
    songs: Vec<String>,
}

impl Setlist {
    pub fn songs(&self) -> &[String] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

/// Validate `requested` against the song list.
///
/// The first unknown name rejects the whole list.
pub fn assign_setlist(songs: &SongList, requested: Vec<String>) -> Result<Setlist> {
    if requested.len() > MAX_SETLIST_LEN {
        log::error!(
            "Setlist has {} songs, limit is {MAX_SETLIST_LEN}",
            requested.len()
        );
        return Err(SetlistError::TooLong {
            len: requested.len(),
            max: MAX_SETLIST_LEN,
        });
    }

    if let Some(song) = requested.iter().find(|s| !songs.contains(s)) {
        log::error!("Song {song} not in project");
        return Err(SetlistError::InvalidSetlistEntry { song: song.clone() });
    }

    log::info!("Setlist created with {} songs", requested.len());
    Ok(Setlist { songs: requested })
}

/// Read requested song names from a file.
///
/// `.json` files hold an array of strings. Anything else is one name per
/// line; blank lines and `#` comments are skipped.
pub fn read_setlist_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(parse_setlist_text(&contents))
    }
}

/// One song name per line.
pub fn parse_setlist_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
