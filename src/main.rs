use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rpp_setlist::config::AppConfig;
use rpp_setlist::project::models::MarkerTable;
use rpp_setlist::Session;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rpp-setlist", version, about = "Build live setlists from REAPER project regions")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the songs (colored regions) of a project
    Songs {
        /// REAPER project file (.rpp)
        project: PathBuf,

        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show every region of a project with its boundaries
    Regions {
        /// REAPER project file (.rpp)
        project: PathBuf,
    },

    /// Write a copy of the project with setlist markers
    Export {
        /// REAPER project file (.rpp)
        project: PathBuf,

        /// Song to play, in order (repeatable)
        #[arg(short, long = "song")]
        songs: Vec<String>,

        /// File with the setlist: JSON array, or one song per line
        #[arg(long, conflicts_with = "songs")]
        setlist: Option<PathBuf>,

        /// Output directory (defaults to config output_dir, then the project's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the new project to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load();

    match cli.command {
        Commands::Songs { project, json } => {
            let session = open_project(&project, &config)?;
            let songs = session.song_list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(songs)?);
            } else if songs.is_empty() {
                println!("No songs found. Songs are regions with a color set.");
            } else {
                println!("{} songs in {}:", songs.len(), project.display());
                println!();
                for (i, name) in songs.names().iter().enumerate() {
                    println!("{:>3}. {}", i + 1, name);
                }
            }
        }

        Commands::Regions { project } => {
            let session = open_project(&project, &config)?;
            let regions = session.regions()?;

            if regions.is_empty() {
                println!("No regions in {}.", project.display());
                return Ok(());
            }

            print_region_table(regions);
        }

        Commands::Export { project, songs, setlist, output, stdout } => {
            let mut session = open_project(&project, &config)?;

            let requested = match setlist {
                Some(path) => rpp_setlist::setlist::read_setlist_file(&path)
                    .with_context(|| format!("Failed to read setlist {}", path.display()))?,
                None => songs,
            };
            session
                .assign_setlist(requested)
                .context("Setlist rejected")?;

            let exported = session.export().context("Export failed")?;

            if stdout {
                print!("{}", exported.text);
                return Ok(());
            }

            let dir = output
                .or(config.output_dir.clone())
                .unwrap_or_else(|| project_dir(&project));
            let path = rpp_setlist::export::write_export(&dir, &exported)
                .with_context(|| format!("Failed to write export to {}", dir.display()))?;

            let setlist = session.setlist();
            println!("Setlist of {} songs written to {}", setlist.len(), path.display());
            for (i, song) in setlist.songs().iter().enumerate() {
                println!("{:>3}. {}", i + 1, song);
            }
        }
    }

    Ok(())
}

/// Read a project file into a fresh session.
fn open_project(path: &Path, config: &AppConfig) -> Result<Session> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if !config.accepts_file(&file_name) {
        anyhow::bail!(
            "Invalid file type: {}. Please pass an .rpp file (or set accept_any_extension in config).",
            path.display()
        );
    }

    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut session = Session::new();
    session
        .load(&content, Some(&file_name))
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(session)
}

fn project_dir(project: &Path) -> PathBuf {
    project
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Print regions with their boundaries, marking which count as songs.
fn print_region_table(regions: &MarkerTable) {
    println!(
        "{:>4} {:<30} {:>12} {:>12} {:>10}  {}",
        "#", "Name", "Start", "End", "Color", "Song"
    );
    println!("{}", "-".repeat(78));

    for r in &regions.rows {
        // Truncate long names
        let name: String = if r.name.chars().count() > 30 {
            format!("{}...", r.name.chars().take(27).collect::<String>())
        } else {
            r.name.clone()
        };
        let end = r
            .end_position
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:>4} {:<30} {:>12} {:>12} {:>10}  {}",
            r.number,
            name,
            r.start_position.as_str(),
            end,
            r.color,
            if r.is_song() { "yes" } else { "no" },
        );
    }
}
