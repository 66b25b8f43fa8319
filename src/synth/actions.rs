//! REAPER action ids written into synthesized marker names.
//!
//! A marker named `!<id>` runs that action when playback crosses it.

/// Action run by the sentinel marker before the first song.
pub const SENTINEL_ACTION: u32 = 40161;

/// Go-to-marker actions, 1-based slot → action id.
/// Slots 1–10 use the numbered "go to marker" block (10 wraps to 40160),
/// slots 11–30 the extended block.
const GOTO_MARKER_ACTIONS: [u32; 30] = [
    40161, 40162, 40163, 40164, 40165, 40166, 40167, 40168, 40169, 40160,
    41251, 41252, 41253, 41254, 41255, 41256, 41257, 41258, 41259, 41260,
    41261, 41262, 41263, 41264, 41265, 41266, 41267, 41268, 41269, 41270,
];

/// Base of the id used by the skip marker of the last song.
const LAST_SONG_ACTION_BASE: u32 = 1016;

/// Action id for a 1-based slot, if the table covers it.
pub fn goto_marker_action(slot: usize) -> Option<u32> {
    slot.checked_sub(1)
        .and_then(|i| GOTO_MARKER_ACTIONS.get(i))
        .copied()
}

/// Action id for the skip marker of setlist entry `index` (0-based) in a
/// setlist of `len` songs.
///
/// Every song but the last jumps to the marker of the next song via the
/// table; the last one uses `1016 + index`.
pub fn skip_action(index: usize, len: usize) -> Option<u32> {
    if index + 1 < len {
        goto_marker_action(index + 2)
    } else {
        u32::try_from(index)
            .ok()
            .and_then(|i| LAST_SONG_ACTION_BASE.checked_add(i))
    }
}

/// Marker name that triggers `action`.
pub fn action_name(action: u32) -> String {
    format!("!{action}")
}
