mod db;
mod error;
mod extract;
mod fetch;
mod normalize;
mod pipeline;
mod settings;
#[cfg(test)]
mod test_support;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use db::{Store, StoredRecord};
use extract::{Extractor, OpenAiClient};
use fetch::Fetcher;
use pipeline::Pipeline;
use settings::Settings;

#[derive(Parser)]
#[command(name = "vc_extractor", about = "Extract VC firms from a web page into SQLite")]
struct Cli {
    /// SQLite database file (overrides VC_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database table if missing
    Init,
    /// Fetch a page, extract firms with the model, and save them
    Run {
        /// Page to extract from (prompted for when omitted)
        url: Option<String>,
        /// Completion model (overrides VC_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
    /// Show every stored record
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let model = match &cli.command {
        Commands::Run { model, .. } => model.clone(),
        _ => None,
    };
    let mut settings = Settings::load()?;
    settings.apply_cli(cli.db, model);
    info!(settings = ?settings, "Settings loaded");

    let store = Store::new(&settings.db_path);
    store.initialize()?;

    match cli.command {
        Commands::Init => {
            println!("Database ready at {:?}", store.path());
        }
        Commands::Run { url, .. } => {
            let url = match url {
                Some(u) => u.trim().to_string(),
                None => prompt_for_url()?,
            };
            if url.is_empty() {
                bail!("No URL given");
            }

            let extractor = Extractor::new(OpenAiClient::new(&settings), settings.max_tokens);
            let pipeline = Pipeline::new(Fetcher::new(), extractor, store);

            let report = pipeline.run(&url).await?;

            println!("Extracted Data ({}):", report.url);
            println!("{}", serde_json::to_string_pretty(&report.extracted)?);
            println!(
                "Inserted {} records into the database.",
                report.inserted
            );

            print_records(&pipeline.store().query_all()?);
        }
        Commands::List => {
            print_records(&store.query_all()?);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn prompt_for_url() -> anyhow::Result<String> {
    print!("Enter the URL of a VC directory page: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}

fn print_records(rows: &[StoredRecord]) {
    if rows.is_empty() {
        println!("No VC records stored yet.");
        return;
    }

    println!("Current VC Records:");
    println!(
        "{:>4} | {:<28} | {:<20} | {:<24} | {:<24} | {:<27}",
        "id", "Name", "Location", "Website", "Focus", "Captured"
    );
    println!("{}", "-".repeat(141));
    for r in rows {
        println!(
            "{:>4} | {:<28} | {:<20} | {:<24} | {:<24} | {:<27}",
            r.id,
            truncate(&r.name, 28),
            truncate(&r.location, 20),
            truncate(&r.website, 24),
            truncate(&r.focus, 24),
            r.captured_at
        );
    }
    println!("\n{} records", rows.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("Acme", 10), "Acme");
        let cut = truncate("Andreessen Horowitz Growth Fund", 12);
        assert_eq!(cut, "Andreesse...");
        assert_eq!(cut.chars().count(), 12);
    }

    #[test]
    fn run_accepts_optional_url() {
        let cli = Cli::try_parse_from(["vc_extractor", "run"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { url: None, .. }));

        let cli = Cli::try_parse_from([
            "vc_extractor",
            "--db",
            "/tmp/x.db",
            "run",
            "https://example.com/vcs",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        match cli.command {
            Commands::Run { url, model } => {
                assert_eq!(url.as_deref(), Some("https://example.com/vcs"));
                assert!(model.is_none());
            }
            _ => panic!("expected run"),
        }
    }
}
