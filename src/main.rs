use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use stride_rank::model::{parse_date, PersonalBest};
use stride_rank::output;
use stride_rank::records::{record_batches, record_faculties, record_years, RecordFilter, RecordMode};
use stride_rank::report;
use stride_rank::scoring::{sort_events_by_distance, SessionDraft};
use stride_rank::time_codec::{format_time, parse_time};
use stride_rank::{Club, NewAthlete};

const EXIT_SUCCESS: i32 = 0;
const EXIT_COMMAND: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List event standards, shortest distance first
    Events,
    /// Current leaderboard of active athletes
    Leaderboard,
    /// Active athletes by rank, then retired athletes by peak
    Roster {
        /// Case-insensitive match on name, faculty or batch
        query: Option<String>,
    },
    /// Show or manage an athlete
    #[command(subcommand)]
    Athlete(AthleteCommand),
    /// Event or course leaderboards
    #[command(subcommand)]
    Records(RecordsCommand),
    /// Score and store a session from a YAML/JSON draft file
    Record {
        file: PathBuf,
    },
    /// Show or delete a stored session
    #[command(subcommand)]
    Session(SessionCommand),
    /// Add an event standard
    Standard {
        name: String,
        /// Gold time as race-clock text, e.g. 16:10
        gold: String,
        /// Power-law exponent (defaults to scoring.default_k_value)
        #[arg(short, long)]
        k: Option<f64>,
    },
    /// Manage routes
    #[command(subcommand)]
    Route(RouteCommand),
    /// Points per session for the given athletes, oldest first
    Trend {
        #[arg(required = true)]
        athletes: Vec<String>,
    },
    /// Athletes who raced the most sessions
    Active {
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Plain-text summaries for coaching
    #[command(subcommand)]
    Report(ReportCommand),
    /// Import a JSON backup; collections it carries replace the current ones
    Import {
        file: PathBuf,
    },
    /// Export all data as a JSON backup
    Export {
        file: PathBuf,
    },
    /// Convert between race-clock text and seconds
    #[command(subcommand)]
    Time(TimeCommand),
}

#[derive(Subcommand, Debug)]
enum AthleteCommand {
    /// Profile with rank, totals, badges and recent results
    Show { id: String },
    /// Register a new athlete
    Add {
        name: String,
        #[arg(long)]
        faculty: Option<String>,
        #[arg(long)]
        batch: Option<String>,
        /// Initial PB as EVENT_ID=TIME[@DATE[@VENUE]], repeatable
        #[arg(long = "pb")]
        pbs: Vec<String>,
    },
    /// Retire or reactivate
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum RecordsCommand {
    /// Records for an event standard
    Event {
        id: String,
        #[command(flatten)]
        opts: RecordOpts,
    },
    /// Records for a route
    Course {
        id: String,
        #[command(flatten)]
        opts: RecordOpts,
    },
    /// List the values the record filters accept
    Options,
}

#[derive(Args, Debug)]
struct RecordOpts {
    /// Every performance instead of one per athlete
    #[arg(long)]
    all: bool,
    #[arg(long)]
    faculty: Option<String>,
    #[arg(long)]
    batch: Option<String>,
    #[arg(long)]
    athlete: Option<String>,
    #[arg(long)]
    year: Option<i32>,
}

impl RecordOpts {
    fn mode(&self) -> RecordMode {
        if self.all {
            RecordMode::All
        } else {
            RecordMode::Best
        }
    }

    fn filter(&self) -> RecordFilter {
        RecordFilter {
            faculty: self.faculty.clone(),
            batch: self.batch.clone(),
            athlete_id: self.athlete.clone(),
            year: self.year,
        }
    }
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    Show { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum RouteCommand {
    Add {
        name: String,
        distance: String,
        #[arg(long)]
        elevation: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    Team,
    Session { id: String },
    Athlete { id: String },
}

#[derive(Subcommand, Debug)]
enum TimeCommand {
    /// Race-clock text to seconds
    Parse { text: String },
    /// Seconds to race-clock text
    Format { seconds: f64 },
}

#[derive(Parser, Debug)]
#[command(name = "stride-rank")]
#[command(about = "Running club scoring, rankings and records", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/stride-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the club data file (overrides data_file from config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match stride_rank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring();
    if let Err(errors) = stride_rank::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path = cli
        .data
        .map(PathBuf::from)
        .unwrap_or_else(|| stride_rank::config::data_path(&config));
    log::debug!("Using data file {}", data_path.display());

    let snapshot = match stride_rank::store::load_snapshot(&data_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };
    let mut club = Club::from_snapshot(snapshot, scoring);

    let changed = match run(cli.command, &mut club) {
        Ok(changed) => changed,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_COMMAND);
        }
    };

    if changed {
        if let Err(e) = stride_rank::store::save_snapshot(&data_path, &club.snapshot()) {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Execute one command; returns whether club data changed and must be saved
fn run(command: Commands, club: &mut Club) -> Result<bool> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Events => {
            let events = sort_events_by_distance(club.standards());
            println!("{}", output::format_events(&events, use_colors));
        }
        Commands::Leaderboard => {
            println!("{}", output::format_leaderboard(&club.leaderboard(), use_colors));
        }
        Commands::Roster { query } => {
            for athlete in club.roster(query.as_deref()) {
                let status = if athlete.is_active { "" } else { " (retired)" };
                println!("{}  {}{}", athlete.id, athlete.name, status);
            }
        }
        Commands::Athlete(cmd) => return run_athlete(cmd, club, use_colors),
        Commands::Records(cmd) => {
            let data = club.data();
            match cmd {
                RecordsCommand::Event { id, opts } => {
                    let rows = club.event_records(&id, opts.mode(), &opts.filter())?;
                    println!("{}", output::format_records(&rows, use_colors));
                }
                RecordsCommand::Course { id, opts } => {
                    let rows = club.course_records(&id, opts.mode(), &opts.filter())?;
                    println!("{}", output::format_records(&rows, use_colors));
                }
                RecordsCommand::Options => {
                    println!("Faculties: {}", record_faculties(&data).join(", "));
                    println!("Batches: {}", record_batches(&data).join(", "));
                    let years: Vec<String> =
                        record_years(&data).iter().map(|y| y.to_string()).collect();
                    println!("Years: {}", years.join(", "));
                }
            }
        }
        Commands::Record { file } => {
            let draft = read_draft(&file)?;
            let (meta, entries) = draft.into_parts();
            let session = club.record_raw_session(meta, &entries)?.clone();
            println!(
                "{}",
                output::format_session_results(&club.data(), &session, use_colors)
            );
            return Ok(true);
        }
        Commands::Session(SessionCommand::Show { id }) => {
            let data = club.data();
            let session = data
                .session(&id)
                .ok_or_else(|| stride_rank::TrackerError::UnknownSession { session_id: id })?;
            println!("{}", output::format_session_results(&data, session, use_colors));
        }
        Commands::Session(SessionCommand::Delete { id }) => {
            club.delete_session(&id)?;
            println!("Deleted session {}", id);
            return Ok(true);
        }
        Commands::Standard { name, gold, k } => {
            let gold_time = parse_time(&gold)?;
            let k_value = k.unwrap_or_else(|| club.config().k_value());
            let id = club.add_standard(&name, gold_time, k_value)?;
            println!("Added standard {} ({}, gold {})", id, name, format_time(gold_time));
            return Ok(true);
        }
        Commands::Route(RouteCommand::Add {
            name,
            distance,
            elevation,
        }) => {
            let id = club.add_route(&name, &distance, elevation.as_deref());
            println!("Added route {} ({})", id, name);
            return Ok(true);
        }
        Commands::Route(RouteCommand::Delete { id }) => {
            club.delete_route(&id)?;
            println!("Deleted route {}", id);
            return Ok(true);
        }
        Commands::Trend { athletes } => {
            let ids: Vec<&str> = athletes.iter().map(String::as_str).collect();
            println!("date\tsession\t{}", athletes.join("\t"));
            for point in club.points_trend(&ids) {
                let cells: Vec<String> = point
                    .points
                    .iter()
                    .map(|p| p.map_or_else(|| "-".to_string(), |p| p.to_string()))
                    .collect();
                println!("{}\t{}\t{}", point.date, point.session_name, cells.join("\t"));
            }
        }
        Commands::Active { limit } => {
            for (athlete, sessions) in club.most_active(limit) {
                println!("{:>4}  {}", sessions, athlete.name);
            }
        }
        Commands::Report(cmd) => {
            let data = club.data();
            let text = match cmd {
                ReportCommand::Team => report::team_summary(&data, club.config().recent_sessions()),
                ReportCommand::Session { id } => report::session_summary(&data, &id)?,
                ReportCommand::Athlete { id } => report::athlete_summary(&data, &id)?,
            };
            println!("{}", text);
        }
        Commands::Import { file } => {
            let snapshot = stride_rank::store::load_snapshot(&file)?;
            if snapshot.is_empty() {
                anyhow::bail!("Nothing to import from {}", file.display());
            }
            club.import(snapshot);
            println!("Imported {}", file.display());
            return Ok(true);
        }
        Commands::Export { file } => {
            stride_rank::store::save_snapshot(&file, &club.snapshot())?;
            println!("Exported to {}", file.display());
        }
        Commands::Time(TimeCommand::Parse { text }) => {
            println!("{}", parse_time(&text)?);
        }
        Commands::Time(TimeCommand::Format { seconds }) => {
            println!("{}", format_time(seconds));
        }
    }
    Ok(false)
}

fn run_athlete(cmd: AthleteCommand, club: &mut Club, use_colors: bool) -> Result<bool> {
    match cmd {
        AthleteCommand::Show { id } => {
            let profile = club.profile(&id)?;
            let recent = club.config().recent_sessions();
            println!(
                "{}",
                output::format_profile(&club.data(), &profile, recent, use_colors)
            );
            Ok(false)
        }
        AthleteCommand::Add {
            name,
            faculty,
            batch,
            pbs,
        } => {
            let personal_bests = pbs
                .iter()
                .map(String::as_str)
                .map(parse_pb_arg)
                .collect::<Result<Vec<_>>>()?;
            let id = club.add_athlete(NewAthlete {
                name: name.clone(),
                faculty,
                batch,
                photo_url: None,
                personal_bests,
            })?;
            println!("Added athlete {} ({})", id, name);
            Ok(true)
        }
        AthleteCommand::Toggle { id } => {
            let active = club.toggle_athlete_status(&id)?;
            println!("{} is now {}", id, if active { "active" } else { "retired" });
            Ok(true)
        }
        AthleteCommand::Delete { id } => {
            club.delete_athlete(&id)?;
            println!("Deleted athlete {}", id);
            Ok(true)
        }
    }
}

/// `EVENT_ID=TIME[@DATE[@VENUE]]`, e.g. `3=16:20@2024-03-02@Lake Loop`
fn parse_pb_arg(arg: &str) -> Result<PersonalBest> {
    let (event_id, rest) = arg
        .split_once('=')
        .with_context(|| format!("Expected EVENT_ID=TIME[@DATE[@VENUE]], got '{}'", arg))?;
    let mut parts = rest.splitn(3, '@').map(str::trim);
    let time = parse_time(parts.next().unwrap_or_default())?;
    let date = parts.next().filter(|d| !d.is_empty());
    if let Some(date) = date {
        if parse_date(date).is_none() {
            bail!("Invalid PB date '{}', expected YYYY-MM-DD", date);
        }
    }
    let venue = parts.next().filter(|v| !v.is_empty());
    Ok(PersonalBest {
        event_id: event_id.trim().to_string(),
        time,
        date: date.map(str::to_string),
        venue: venue.map(str::to_string),
    })
}

/// Read a session draft; `.json` files as JSON, anything else as YAML
fn read_draft(path: &Path) -> Result<SessionDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session draft at {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session draft {}", path.display()))
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse session draft {}", path.display()))
    }
}
