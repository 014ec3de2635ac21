use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use album_research::{Config, Researcher};

/// Research one album and print the resulting record as JSON.
#[derive(Parser, Debug)]
#[command(name = "album-research")]
struct Cli {
    /// Artist name, in any script
    artist: String,

    /// Album title
    album: String,

    /// Also print the collected source list to stderr
    #[arg(long)]
    show_sources: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("album_research=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.log_redacted();

    let researcher = Researcher::from_config(&config)?;
    info!(artist = cli.artist.as_str(), album = cli.album.as_str(), "Starting research");

    let record = researcher.research(&cli.artist, &cli.album).await?;

    if cli.show_sources {
        for source in &record.sources {
            eprintln!("source: {source}");
        }
    }
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
