use data_loader::{DirectorySource, IngestConfig, Ingestor};
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data/imdb".to_string());

    println!("Loading IMDb dataset from {data_dir}...\n");

    let start = Instant::now();
    let (index, report) = Ingestor::new(DirectorySource::new(&data_dir))
        .with_config(IngestConfig::new())
        .run()
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (persons, titles, cast_links) = index.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Persons: {}", persons);
    println!("Titles: {}", titles);
    println!("Cast links: {}", cast_links);
    for file in &report.files {
        println!(
            "  {:<22} rows {:>10}  loaded {:>10}  skipped {:>6}  dropped {:>8}  {:?}",
            file.resource, file.rows, file.loaded, file.skipped, file.dropped, file.elapsed
        );
    }

    let rows: usize = report.files.iter().map(|f| f.rows).sum();
    println!("\nPerformance: {:.0} rows/second", rows as f64 / elapsed.as_secs_f64());
}
