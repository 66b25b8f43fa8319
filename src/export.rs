use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::project::models::MarkerTable;
use crate::setlist::Setlist;
use crate::synth::{self, emit};

/// Stem used when the project came without a file name.
const DEFAULT_STEM: &str = "project";

/// A synthesized project ready to hand back to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedProject {
    pub text: String,
    pub file_name: String,
}

/// Rebuild `original` with markers for `setlist`.
pub fn export(
    original: &str,
    table: &MarkerTable,
    setlist: &Setlist,
    original_name: Option<&str>,
    date: NaiveDate,
) -> synth::Result<ExportedProject> {
    let rows = synth::synthesize(table, setlist)?;
    let block = emit::render_rows(&rows, emit::line_ending(original));
    let text = emit::splice(original, &block);

    let file_name = output_file_name(original_name, date);
    log::info!("Exported {} marker rows as {file_name}", rows.len());
    Ok(ExportedProject { text, file_name })
}

/// `<stem>_setlist_<DD-MM-YYYY>.rpp`
pub fn output_file_name(original_name: Option<&str>, date: NaiveDate) -> String {
    let stem = original_name
        .and_then(|n| Path::new(n).file_stem())
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string());
    format!("{stem}_setlist_{}.rpp", date.format("%d-%m-%Y"))
}

/// Write an export into `dir`, returning the full path.
pub fn write_export(dir: &Path, exported: &ExportedProject) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&exported.file_name);
    std::fs::write(&path, &exported.text)?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{parse, strip_point_markers};
    use crate::setlist::assign_setlist;
    use crate::songs::extract_songs;

    const PROJECT: &str = "\
<REAPER_PROJECT 0.1 \"7.0/linux-x86_64\" 1700000000
  RIPPLE 0
  TEMPO 120 4 4
  MARKER 1 0 Intro 1 5 1 R {R-1} 0
  MARKER 1 10 \"\" 1
  MARKER 7 4 \"old cue\" 0 0 1 B {P-7} 0
  MARKER 2 10 Verse 1 5 1 R {R-2} 0
  MARKER 2 20 \"\" 1
  <PROJBAY
  >
  <TRACK {T-1}
    NAME \"Lead  Vocal\"
  >
>
";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn run(setlist: &[&str]) -> ExportedProject {
        let table = strip_point_markers(&parse(PROJECT).unwrap());
        let songs = extract_songs(&table);
        let requested = setlist.iter().map(|s| s.to_string()).collect();
        let setlist = assign_setlist(&songs, requested).unwrap();
        export(PROJECT, &table, &setlist, Some("Gig.rpp"), date()).unwrap()
    }

    /// Marker lines with the GUID column blanked, for stable comparison.
    fn marker_lines(text: &str) -> Vec<String> {
        text.lines()
            .filter(|l| l.trim_start().starts_with("MARKER"))
            .map(|l| {
                l.split(' ')
                    .map(|f| if f.starts_with('{') { "{*}" } else { f })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name(Some("Show.rpp"), date()),
            "Show_setlist_09-03-2024.rpp"
        );
        assert_eq!(
            output_file_name(Some("/tmp/uploads/Live Set.RPP"), date()),
            "Live Set_setlist_09-03-2024.rpp"
        );
        assert_eq!(output_file_name(None, date()), "project_setlist_09-03-2024.rpp");
    }

    #[test]
    fn test_end_to_end_intro_verse() {
        let out = run(&["Intro", "Verse"]);
        assert_eq!(out.file_name, "Gig_setlist_09-03-2024.rpp");
        assert_eq!(
            marker_lines(&out.text),
            vec![
                "MARKER 1 0 Intro 1 5 1 R {*} 0",
                "MARKER 1 10 \"\" 1",
                "MARKER 1 0 Intro 0 0 1 R {*} 0",
                "MARKER 99 1 !40161 0 0 1 R {*} 0",
                "MARKER 3 9 !40162 0 0 1 R {*} 0",
                "MARKER 2 10 Verse 1 5 1 R {*} 0",
                "MARKER 2 20 \"\" 1",
                "MARKER 2 10 Verse 0 0 1 R {*} 0",
                "MARKER 4 19 !1017 0 0 1 R {*} 0",
            ]
        );
    }

    #[test]
    fn test_region_guids_round_trip_with_braces() {
        let out = run(&[]);
        assert!(out.text.contains("MARKER 1 0 Intro 1 5 1 R {R-1} 0\n"));
        assert!(out.text.contains("MARKER 2 10 Verse 1 5 1 R {R-2} 0\n"));
    }

    #[test]
    fn test_empty_setlist_round_trip() {
        let out = run(&[]);
        let reparsed = parse(&out.text).unwrap();

        let regions: Vec<_> = reparsed.rows.iter().filter(|r| r.is_region).cloned().collect();
        let original = strip_point_markers(&parse(PROJECT).unwrap());
        assert_eq!(regions, original.rows);

        let points: Vec<&str> = reparsed
            .rows
            .iter()
            .filter(|r| !r.is_region)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(points, vec!["!40161"]);
    }

    #[test]
    fn test_other_content_untouched() {
        let out = run(&["Verse"]);
        assert!(out.text.starts_with("<REAPER_PROJECT 0.1 \"7.0/linux-x86_64\" 1700000000\nRIPPLE 0\nTEMPO 120 4 4\nMARKER "));
        assert!(out.text.ends_with("<PROJBAY\n  >\n  <TRACK {T-1}\n    NAME \"Lead  Vocal\"\n  >\n>\n"));
        assert!(!out.text.contains("old cue"));
    }

    fn export_text(text: &str, setlist: &[&str]) -> String {
        let table = strip_point_markers(&parse(text).unwrap());
        let songs = extract_songs(&table);
        let requested = setlist.iter().map(|s| s.to_string()).collect();
        let setlist = assign_setlist(&songs, requested).unwrap();
        export(text, &table, &setlist, Some("Gig.rpp"), date()).unwrap().text
    }

    #[test]
    fn test_awkward_names_survive_reload() {
        let text = "\
<REAPER_PROJECT 0.1
  MARKER 1 0 \"A\tB\" 1 5 1 R {R-1} 0
  MARKER 1 10 \"\" 1
  MARKER 2 10 'Say \"Hi\" now' 1 5 1 R {R-2} 0
  MARKER 2 20 \"\" 1
  MARKER 3 20 `It's \"Live\"` 1 5 1 R {R-3} 0
  MARKER 3 30 \"\" 1
  MARKER 4 30 \"'Round Midnight\" 1 5 1 R {R-4} 0
  MARKER 4 40 \"\" 1
  <PROJBAY
  >
>
";
        let original = extract_songs(&parse(text).unwrap());
        let setlist: Vec<&str> = original.names().iter().map(String::as_str).collect();
        let out = export_text(text, &setlist);

        let reloaded = parse(&out).unwrap();
        let reloaded_songs = extract_songs(&strip_point_markers(&reloaded));
        assert_eq!(reloaded_songs, original);

        // Song-start markers carry the same names
        let mut marker_names: Vec<&str> = reloaded
            .rows
            .iter()
            .filter(|r| !r.is_region && !r.name.starts_with('!'))
            .map(|r| r.name.as_str())
            .collect();
        marker_names.sort();
        assert_eq!(marker_names, setlist);
    }

    #[test]
    fn test_region_columns_kept_verbatim() {
        let text = "\
<REAPER_PROJECT 0.1
  MARKER 01 0 Intro 3 05 1 R {G1} 0
  MARKER 01 10 \"\" 1
  MARKER 2 3 cue 0 0 1 B {P} 0
  <PROJBAY
  >
>
";
        let out = export_text(text, &["Intro"]);
        assert!(out.contains("\nMARKER 01 0 Intro 3 05 1 R {G1} 0\nMARKER 01 10 \"\" 1\n"));
        assert!(!out.contains("cue"));
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let exported = ExportedProject {
            text: "<P\n>\n".to_string(),
            file_name: "Gig_setlist_09-03-2024.rpp".to_string(),
        };
        let path = write_export(&dir.path().join("out"), &exported).unwrap();
        assert_eq!(path.file_name().unwrap(), "Gig_setlist_09-03-2024.rpp");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<P\n>\n");
    }
}
