pub mod config;
pub mod export;
pub mod project;
pub mod session;
pub mod setlist;
pub mod songs;
pub mod synth;

pub use session::Session;

/// Project file extensions we load (compared case-insensitively)
pub const PROJECT_EXTENSIONS: &[&str] = &["rpp"];

/// Application name for XDG paths
pub const APP_NAME: &str = "rpp-setlist";

/// Whether a file name carries a REAPER project extension.
pub fn is_project_file(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            PROJECT_EXTENSIONS
                .iter()
                .any(|p| p.eq_ignore_ascii_case(ext))
        })
}
