use chrono::NaiveDate;
use thiserror::Error;

use crate::export::{self, ExportedProject};
use crate::project::models::MarkerTable;
use crate::project::{self, ParseError};
use crate::setlist::{self, Setlist, SetlistError};
use crate::songs::{self, SongList};
use crate::synth::SynthError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No project loaded")]
    EmptyProject,
    #[error("No marker table to build a setlist from; load a project first")]
    NoSetlistLoaded,
    #[error("Project is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Setlist error: {0}")]
    Setlist(#[from] SetlistError),
    #[error("Synthesis error: {0}")]
    Synth(#[from] SynthError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A project loaded into a session.
#[derive(Debug, Clone)]
struct LoadedProject {
    source: String,
    file_name: Option<String>,
    regions: MarkerTable,
    songs: SongList,
}

/// One project being turned into a setlist.
///
/// Every mutating call either succeeds completely or leaves the session as
/// it was. Not meant to be shared between threads; give each caller its own.
#[derive(Debug, Default)]
pub struct Session {
    project: Option<LoadedProject>,
    setlist: Setlist,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load project content, replacing any previous project and setlist.
    pub fn load(&mut self, content: &[u8], file_name: Option<&str>) -> Result<()> {
        let source = std::str::from_utf8(content)?;
        self.load_str(source, file_name)
    }

    pub fn load_str(&mut self, source: &str, file_name: Option<&str>) -> Result<()> {
        log::info!("Loading REAPER project {}", file_name.unwrap_or("<unnamed>"));

        let table = project::parse(source)?;
        log::info!("Project loaded with {} markers and regions", table.len());
        let regions = project::strip_point_markers(&table);
        let songs = songs::extract_songs(&regions);

        self.project = Some(LoadedProject {
            source: source.to_string(),
            file_name: file_name.map(str::to_string),
            regions,
            songs,
        });
        self.setlist = Setlist::default();
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.project.is_some()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.project.as_ref().and_then(|p| p.file_name.as_deref())
    }

    pub fn song_list(&self) -> Result<&SongList> {
        self.loaded().map(|p| &p.songs)
    }

    /// Regions of the loaded project, in file order.
    pub fn regions(&self) -> Result<&MarkerTable> {
        self.loaded().map(|p| &p.regions)
    }

    pub fn setlist(&self) -> &Setlist {
        &self.setlist
    }

    /// Validate and store a setlist. On error the previous setlist stays.
    pub fn assign_setlist(&mut self, requested: Vec<String>) -> Result<&Setlist> {
        let setlist = setlist::assign_setlist(&self.loaded()?.songs, requested)?;
        self.setlist = setlist;
        Ok(&self.setlist)
    }

    /// Build the exported project for the current setlist, dated today.
    pub fn export(&self) -> Result<ExportedProject> {
        self.export_on(chrono::Local::now().date_naive())
    }

    pub fn export_on(&self, date: NaiveDate) -> Result<ExportedProject> {
        let project = self.project.as_ref().ok_or(SessionError::NoSetlistLoaded)?;
        Ok(export::export(
            &project.source,
            &project.regions,
            &self.setlist,
            project.file_name.as_deref(),
            date,
        )?)
    }

    fn loaded(&self) -> Result<&LoadedProject> {
        self.project.as_ref().ok_or_else(|| {
            log::error!("No project loaded");
            SessionError::EmptyProject
        })
    }
}
