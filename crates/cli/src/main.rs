use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DirectorySource, IngestConfig, IngestReport, Ingestor, Title};
use query_engine::QueryEngine;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// IMDb Explorer - query the public IMDb datasets
#[derive(Parser)]
#[command(name = "imdb-explorer")]
#[command(about = "Load the IMDb TSV datasets and run analytical queries", long_about = None)]
struct Cli {
    /// Directory holding the IMDb .tsv (or .tsv.gz) files
    #[arg(short, long, default_value = "data/imdb")]
    data_dir: PathBuf,

    /// Load worker threads (default: available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Seconds to wait for running load tasks at shutdown
    #[arg(long, default_value = "60")]
    grace_secs: u64,

    /// Abort loading after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Titles whose sole director is also the sole writer, and still alive
    SameDirectorWriter,

    /// Titles two people appear in together
    CommonActors {
        /// First person id (nconst)
        #[arg(long)]
        actor1: String,

        /// Second person id (nconst)
        #[arg(long)]
        actor2: String,
    },

    /// Most voted title of each year for a genre
    BestByGenre {
        /// Genre name, matched exactly (e.g. "Drama")
        #[arg(long)]
        genre: String,
    },

    /// Show what was loaded
    Stats,
}

impl Cli {
    fn ingest_config(&self) -> IngestConfig {
        let mut config = IngestConfig::new().with_shutdown_grace(Duration::from_secs(self.grace_secs));
        if let Some(workers) = self.workers {
            config = config.with_worker_threads(workers);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_load_timeout(Duration::from_secs(secs));
        }
        config
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // The ingestor owns its worker runtime, so main stays synchronous
    eprintln!("Loading IMDb datasets from {}...", cli.data_dir.display());
    let ingestor = Ingestor::new(DirectorySource::new(&cli.data_dir)).with_config(cli.ingest_config());
    let (data_index, report) = ingestor
        .run()
        .with_context(|| format!("Failed to load IMDb datasets from {}", cli.data_dir.display()))?;
    eprintln!("{} Loaded dataset in {:?}", "✓".green(), report.elapsed);
    info!(persons = report.persons, titles = report.titles, "Index ready");

    let engine = QueryEngine::new(Arc::new(data_index));

    match &cli.command {
        Commands::SameDirectorWriter => {
            let titles = engine.titles_by_same_director_writer_alive();
            print_titles("Titles written and directed by one living person", &titles, cli.json)?
        }
        Commands::CommonActors { actor1, actor2 } => {
            let titles = engine.titles_by_two_actors(actor1, actor2);
            let heading = format!("Titles featuring both {actor1} and {actor2}");
            print_titles(&heading, &titles, cli.json)?
        }
        Commands::BestByGenre { genre } => {
            let best = engine.best_titles_by_genre(genre);
            print_best_by_year(genre, &best, cli.json)?
        }
        Commands::Stats => print_stats(&report, cli.json)?,
    }

    Ok(())
}

fn print_no_content(json: bool) {
    if json {
        println!("[]");
    } else {
        println!("{}", "No content".yellow());
    }
}

fn print_titles(heading: &str, titles: &[&Title], json: bool) -> Result<()> {
    if titles.is_empty() {
        print_no_content(json);
        return Ok(());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(titles)?);
        return Ok(());
    }

    println!("{}", format!("{heading}:").bold().blue());
    for (rank, title) in titles.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), describe(title));
    }
    println!("{} titles", titles.len());
    Ok(())
}

fn print_best_by_year(genre: &str, best: &BTreeMap<u16, &Title>, json: bool) -> Result<()> {
    if best.is_empty() {
        print_no_content(json);
        return Ok(());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(best)?);
        return Ok(());
    }

    println!("{}", format!("Best {genre} title per year:").bold().blue());
    for (year, title) in best {
        println!("{} {}", year.to_string().green(), describe(title));
    }
    Ok(())
}

fn print_stats(report: &IngestReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", "Dataset statistics:".bold().blue());
    println!("{}Persons: {}", "• ".green(), report.persons);
    println!("{}Titles: {}", "• ".green(), report.titles);
    println!("{}Cast links: {}", "• ".green(), report.cast_links);
    println!("{}Load time: {:?}", "• ".green(), report.elapsed);

    println!("Files:");
    for file in &report.files {
        println!(
            "  - {}: {} rows, {} loaded, {} skipped, {} dropped ({:?})",
            file.resource, file.rows, file.loaded, file.skipped, file.dropped, file.elapsed
        );
    }
    Ok(())
}

/// One-line summary: id, title, year, genres and rating
fn describe(title: &Title) -> String {
    let year = title
        .start_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "?".to_string());
    let rating = match (title.average_rating, title.num_votes) {
        (Some(rating), Some(votes)) => format!(" - {rating:.1} ({votes} votes)"),
        _ => String::new(),
    };
    format!(
        "{} {} ({}) [{}]{}",
        title.tconst.dimmed(),
        title.primary_title,
        year,
        title.genres.join(", "),
        rating
    )
}
