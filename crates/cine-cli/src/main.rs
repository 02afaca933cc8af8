//! Cine CLI - Command-line interface
//!
//! Usage:
//!   cine status
//!   cine movies list
//!   cine movies add --title <title> [--description ..] [--genre ..] [--year ..]
//!   cine recommend <query> [-k 5]
//!   cine similar <id> [-k 3]
//!   cine check-store

use anyhow::Context;
use cine_core::{AppConfig, LoggingConfig, MovieFields, ScoredMatch};
use cine_recommend::MovieContext;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cine")]
#[command(about = "Movie catalog and recommendation CLI")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables still override it)
    #[arg(long, global = true, env = "CINE_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether the store and index are reachable
    Status,
    /// Browse or extend the catalog
    Movies {
        #[command(subcommand)]
        action: MovieAction,
    },
    /// Recommend movies for a free-text query
    Recommend {
        /// What you are in the mood for
        query: String,
        /// Maximum matches
        #[arg(short, default_value_t = 5)]
        k: usize,
    },
    /// Movies similar to a catalogued movie
    Similar {
        /// Movie id
        id: String,
        #[arg(short, default_value_t = 3)]
        k: usize,
    },
    /// Write and read back the store sentinel document
    CheckStore,
}

#[derive(Subcommand)]
enum MovieAction {
    /// List every movie
    List,
    /// Add a movie and index it
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)
            .and_then(AppConfig::with_env_override)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::from_env().context("reading configuration from environment")?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{},surrealdb=warn", logging.level).into());

    // Logs go to stderr so command output stays pipeable
    if logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_matches(matches: &[ScoredMatch], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&matches);
    }
    if matches.is_empty() {
        println!("No matches");
    }
    for (rank, m) in matches.iter().enumerate() {
        println!("{:>2}. {} ({:.2}) [{}]", rank + 1, m.title, m.similarity, m.id);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging);

    let ctx = MovieContext::connect(&config).await;

    match cli.command {
        Commands::Status => {
            let status = ctx.status().await;
            if cli.json {
                print_json(&status)?;
            } else {
                match &status.store_error {
                    None => println!("Document store: connected"),
                    Some(e) => println!("Document store: unavailable ({e})"),
                }
                println!(
                    "Vector index:   {}",
                    if status.index_available {
                        "available"
                    } else {
                        "unavailable"
                    }
                );
            }
        }
        Commands::Movies { action } => match action {
            MovieAction::List => {
                let movies = ctx.catalog().list_movies().await?;
                if cli.json {
                    print_json(&movies)?;
                } else {
                    for movie in &movies {
                        let year = movie.fields.year.map(|y| format!(" ({y})")).unwrap_or_default();
                        println!("{}  {}{}", movie.id, movie.title(), year);
                    }
                    println!("{} movie(s)", movies.len());
                }
            }
            MovieAction::Add {
                title,
                description,
                genre,
                year,
            } => {
                let fields = MovieFields {
                    title,
                    description,
                    genre,
                    year,
                };
                let added = ctx.catalog().add_movie(fields).await?;
                if cli.json {
                    print_json(&added)?;
                } else {
                    println!("Added {}", added.id);
                    if let Some(warning) = &added.warning {
                        eprintln!("warning: {warning}");
                    }
                }
            }
        },
        Commands::Recommend { query, k } => {
            let matches = ctx.recommender().recommend(&query, k).await?;
            print_matches(&matches, cli.json)?;
        }
        Commands::Similar { id, k } => {
            let matches = ctx.similar_movies(&id, k).await?;
            print_matches(&matches, cli.json)?;
        }
        Commands::CheckStore => {
            let health = ctx.probe().check_store_health().await?;
            if cli.json {
                print_json(&health)?;
            } else {
                println!("{}", health.message);
            }
        }
    }

    Ok(())
}
