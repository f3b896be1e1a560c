use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use servicebook::config::AppConfig;
use servicebook::db::Database;
use servicebook::db::models::{AppData, NewServiceRecord, ServiceRecord};
use servicebook::draft::{Proposal, ServiceDraft};
use servicebook::state::AppState;
use servicebook::unplayed::CollectionReport;
use servicebook::{backup, catalog, recency, search, share, stats, unplayed};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "servicebook", version, about = "Worship service song log")]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Base catalog file, one song per line (overrides config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a service with its songs in the order they were sung
    Add {
        /// Songs, in order
        #[arg(required = true)]
        songs: Vec<String>,

        /// Service date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Period label (defaults to the first configured period)
        #[arg(short, long)]
        period: Option<String>,

        /// Add songs sung recently without asking
        #[arg(long)]
        force: bool,

        /// Print a share link for the saved service
        #[arg(long)]
        share: bool,
    },

    /// Replace fields of an existing service
    Edit {
        /// Service id (or unique prefix)
        id: String,

        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// New period label
        #[arg(short, long)]
        period: Option<String>,

        /// New song list, replacing the old one
        #[arg(short, long, num_args = 1..)]
        songs: Option<Vec<String>>,
    },

    /// Delete one service
    Delete {
        /// Service id (or unique prefix)
        id: String,
    },

    /// Delete every service (custom songs are kept)
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// List services, most recent first
    History {
        /// Filter by date, period, or song (substring match)
        #[arg(short, long)]
        search: Option<String>,

        /// Number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Suggest catalog songs for a partial title
    Suggest {
        /// Partial title (blank lists the start of the catalog)
        #[arg(default_value = "")]
        query: String,

        /// Number of results (defaults to config suggest_limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show how often and when a song was sung
    Song {
        /// Exact song title
        name: String,
    },

    /// Most-sung songs (only songs sung more than once)
    Top {
        /// Number of results
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Check whether a song was sung too recently
    Check {
        /// Exact song title
        song: String,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Catalog songs never sung, grouped by section
    Unplayed {
        /// Only list songs containing this text (totals are unaffected)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Add a song to the custom catalog
    Register {
        /// Song title
        song: String,
    },

    /// Write a JSON backup of services and custom songs
    Export {
        /// Output file (defaults to backup_<context>_<date>.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace all data with the contents of a JSON backup
    Import {
        /// Backup file
        file: PathBuf,

        /// Confirm replacing the current data
        #[arg(long)]
        yes: bool,
    },

    /// Print the share text and link for a service
    Share {
        /// Service id (or unique prefix)
        id: String,
    },

    /// Show counts of stored data
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = AppConfig::load();

    // Resolve database path: CLI > config > XDG default
    let db_path = cli
        .db_path
        .or(config.db_path.clone())
        .unwrap_or_else(servicebook::config::default_db_path);
    log::info!("Database: {}", db_path.display());

    let db = Database::open(&db_path).context("Failed to open database")?;

    let base_catalog = match cli.catalog.as_ref().or(config.catalog_file.as_ref()) {
        Some(path) => catalog::load_base_catalog(path)?,
        None => {
            log::warn!("No catalog file configured; only custom songs are known");
            Vec::new()
        }
    };

    let data = db
        .load_state()
        .context("Failed to load saved data")?
        .unwrap_or_default();
    let mut state = AppState::new(base_catalog, data, config.marker_prefix.clone());
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Add { songs, date, period, force, share } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            let period = period
                .or_else(|| config.periods.first().cloned())
                .unwrap_or_default();
            let mut draft = ServiceDraft::new(date, period);

            for name in &songs {
                let proposal =
                    draft.propose(name, state.catalog(), state.stats(), today, config.recency_days);
                match proposal {
                    Proposal::Empty => {}
                    Proposal::Added { song, is_new } => {
                        if is_new {
                            state.register_song(&song);
                            println!("Registered new song: {song}");
                        }
                    }
                    Proposal::NeedsConfirmation { song, is_new, check } => {
                        if is_new {
                            state.register_song(&song);
                        }
                        let when = describe_recency(&check);
                        if force {
                            println!("Note: \"{song}\" was sung {when}; adding anyway.");
                            draft.confirm(&song);
                        } else {
                            println!("Skipped \"{song}\": sung {when}. Use --force to add it.");
                        }
                    }
                }
            }

            let Some(record) = draft.finalize() else {
                save(&db, &state)?;
                anyhow::bail!("No songs to save; nothing recorded.");
            };
            let id = state.add_record(record);
            save(&db, &state)?;

            println!("Saved service {}", short_id(&id));
            if share {
                if let Some(record) = state.records().get(&id) {
                    print_share(&config.report_title, record);
                }
            }
        }

        Commands::Edit { id, date, period, songs } => {
            let Some(existing) = state.records().find_by_prefix(&id) else {
                println!("No service matches \"{id}\".");
                return Ok(());
            };
            let full_id = existing.id.clone();
            let updated = NewServiceRecord {
                date: match date {
                    Some(d) => parse_date(&d)?,
                    None => existing.date,
                },
                description: period.unwrap_or_else(|| existing.description.clone()),
                songs: match songs {
                    Some(list) => list.iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
                    None => existing.songs.clone(),
                },
            };
            if updated.songs.is_empty() {
                anyhow::bail!("A service needs at least one song.");
            }
            for song in &updated.songs {
                state.register_song(song);
            }
            state.update_record(&full_id, updated);
            save(&db, &state)?;
            println!("Updated service {}", short_id(&full_id));
        }

        Commands::Delete { id } => {
            let full_id = state.records().find_by_prefix(&id).map(|r| r.id.clone());
            match full_id {
                Some(full_id) if state.remove_record(&full_id) => {
                    save(&db, &state)?;
                    println!("Deleted service {}", short_id(&full_id));
                }
                _ => println!("No service matches \"{id}\"."),
            }
        }

        Commands::Clear { yes } => {
            if !yes {
                anyhow::bail!(
                    "This deletes all {} services. Re-run with --yes to confirm.",
                    state.records().len()
                );
            }
            state.clear_records();
            save(&db, &state)?;
            println!("History cleared.");
        }

        Commands::History { search, limit } => {
            let records = state.records().search(search.as_deref().unwrap_or(""));
            if records.is_empty() {
                println!("No services found.");
                return Ok(());
            }
            let limit = limit.unwrap_or(records.len());
            for record in records.into_iter().take(limit) {
                print_record(record);
            }
        }

        Commands::Suggest { query, limit } => {
            let limit = limit.unwrap_or(config.suggest_limit);
            let results = search::suggest(state.catalog(), &query, state.marker(), limit);
            if results.is_empty() {
                println!("No catalog songs match \"{}\".", query.trim());
            }
            for song in results {
                println!("{song}");
            }
        }

        Commands::Song { name } => {
            let name = name.trim();
            match state.stats().get(name) {
                Some(stat) => {
                    println!("{}", stat.song);
                    println!("Sung {} time(s)", stat.count);
                    if let Some(last) = stat.last_date {
                        let check = recency::check(name, state.stats(), today, config.recency_days);
                        println!("Last sung: {} ({})", share::format_date(last), describe_recency(&check));
                    }
                    println!();
                    for d in &stat.history {
                        println!("  {}", share::format_date(*d));
                    }
                }
                None => println!("\"{name}\" has never been sung."),
            }
        }

        Commands::Top { limit } => {
            let ranking = stats::ranking(state.stats(), limit);
            if ranking.is_empty() {
                println!("No song has been sung more than once yet.");
                return Ok(());
            }
            println!("{:>4}  {:>5}  {:<10}  Song", "#", "Times", "Last");
            println!("{}", "-".repeat(60));
            for (i, stat) in ranking.iter().enumerate() {
                let last = stat.last_date.map(share::format_date).unwrap_or_default();
                println!("{:>4}  {:>5}  {:<10}  {}", i + 1, stat.count, last, stat.song);
            }
        }

        Commands::Check { song, date } => {
            let reference = match date {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            let song = song.trim();
            let check = recency::check(song, state.stats(), reference, config.recency_days);
            if check.blocked {
                println!("Warning: \"{song}\" was sung {}.", describe_recency(&check));
            } else if check.last_date.is_some() {
                println!("OK: \"{song}\" was last sung {}.", describe_recency(&check));
            } else {
                println!("OK: \"{song}\" has never been sung.");
            }
        }

        Commands::Unplayed { filter } => {
            let result = unplayed::categorize(
                state.catalog(),
                state.history(),
                &config.sections,
                state.marker(),
                filter.as_deref(),
            );
            print_collection("Main", &result.primary);
            println!();
            print_collection(state.marker(), &result.marked);
        }

        Commands::Register { song } => {
            if state.register_song(&song) {
                save(&db, &state)?;
                println!("Registered \"{}\".", song.trim());
            } else {
                println!("\"{}\" is already in the catalog.", song.trim());
            }
        }

        Commands::Export { out } => {
            let data = backup::export(state.history(), state.custom_songs());
            if data.is_empty() {
                println!("Nothing to export.");
                return Ok(());
            }
            let json = backup::to_json(&data)?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(backup::backup_filename(&config.backup_context, today))
            });
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} services and {} custom songs to {}",
                data.history.len(),
                data.custom_songs.len(),
                path.display()
            );
        }

        Commands::Import { file, yes } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let data = backup::import(&text)
                .with_context(|| format!("Invalid backup file {}", file.display()))?;
            if !yes {
                anyhow::bail!(
                    "Importing replaces {} services with {} from the backup. Re-run with --yes to confirm.",
                    state.records().len(),
                    data.history.len()
                );
            }
            let imported = data.history.len();
            state.restore(data);
            save(&db, &state)?;
            println!("Restored {imported} services.");
        }

        Commands::Share { id } => match state.records().find_by_prefix(&id) {
            Some(record) => print_share(&config.report_title, record),
            None => println!("No service matches \"{id}\"."),
        },

        Commands::Status => {
            println!("Services:      {}", state.records().len());
            println!("Custom songs:  {}", state.custom_songs().len());
            println!("Catalog songs: {}", state.catalog().len());
            println!("Database:      {}", db_path.display());
        }
    }

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date \"{s}\" (expected YYYY-MM-DD)"))
}

fn save(db: &Database, state: &AppState) -> Result<()> {
    let data: AppData = state.to_data();
    db.save_state(&data).context("Failed to save data")
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn describe_recency(check: &recency::RecencyCheck) -> String {
    match (check.days_since, check.last_date) {
        (Some(0), Some(_)) => "today".to_string(),
        (Some(days), Some(last)) => format!("{days} day(s) ago on {}", share::format_date(last)),
        _ => "never".to_string(),
    }
}

fn print_record(record: &ServiceRecord) {
    println!(
        "{}  {}  [{}]",
        share::format_date(record.date),
        record.description,
        short_id(&record.id)
    );
    for (i, song) in record.songs.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, song);
    }
    println!();
}

fn print_share(title: &str, record: &ServiceRecord) {
    let message = share::record_message(title, record);
    println!("{message}");
    println!("{}", share::share_link(&message));
}

fn print_collection(label: &str, report: &CollectionReport) {
    println!(
        "{label}: {} of {} never sung ({}% complete)",
        report.total_unplayed, report.total_all, report.percent_complete
    );
    println!("{}", "-".repeat(60));

    for group in &report.groups {
        println!(
            "{} [{}-{}]: {} of {} never sung ({}%)",
            group.section.name,
            group.section.min,
            group.section.max,
            group.unplayed,
            group.total,
            group.percent_complete
        );
        for song in &group.songs {
            println!("    {song}");
        }
    }

    if !report.unsectioned.is_empty() {
        println!("Other ({}):", report.unsectioned.len());
        for song in &report.unsectioned {
            println!("    {song}");
        }
    }

    if report.shown() == 0 {
        println!("    (no songs to show)");
    }
}
