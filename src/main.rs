//! # Tasteradio
//!
//! Ranks an analyzed music library against a taste profile and prints a
//! personalized "radio" playlist.
//!
//! ## Usage
//!
//! ```bash
//! # Load analyzer output into the catalog
//! tasteradio import my_library_analyzed.csv
//!
//! # Build a profile describing the library
//! tasteradio profile
//!
//! # Top 50 tracks, full ranking exported for a media player
//! tasteradio rank --m3u radio.m3u --csv my_library_ranked.csv
//!
//! # Context for the DJ assistant
//! tasteradio summary
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tasteradio::cli::{self, CatalogArg, Command};
use tasteradio::config::{self, RadioConfig};
use tasteradio::track::Track;
use tasteradio::{completion, db, export, profile, radio, summary};

fn catalog_path(arg: CatalogArg, config: &RadioConfig) -> Result<PathBuf> {
    arg.catalog.map_or_else(|| config.catalog_path(), Ok)
}

fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    db::load_catalog_file(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))
}

/// Main entry point for Tasteradio.
///
/// Initializes logging, loads the configuration and routes the subcommand.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug tasteradio rank` - Enable debug logging
/// - `RUST_LOG=tasteradio::scorer=trace tasteradio rank` - Per-track scores
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };
    let config = RadioConfig::load(&config_path)?;
    debug!("Effective config: {config:?}");

    match args.command {
        Command::Import { input, format, catalog } => {
            let path = catalog_path(catalog, &config)?;
            info!("Importing {} into {}", input.display(), path.display());
            let mut conn = db::open(&path)?;
            let count = db::import_file(&mut conn, &input, format)
                .with_context(|| format!("Failed to import {}", input.display()))?;
            println!("Imported {count} tracks into {}", path.display());
        }
        Command::Profile { catalog, output } => {
            let tracks = load_tracks(&catalog_path(catalog, &config)?)?;
            let taste = profile::derive_from_catalog(&tracks)?;
            let path = match output {
                Some(path) => path,
                None => config.profile_path()?,
            };
            taste.save(&path)?;
            println!("Taste profile for {} tracks saved to {}", tracks.len(), path.display());
        }
        Command::Rank { catalog, profile: profile_path, genre_weight, top, clamp, json, csv, m3u, store } => {
            let config = RadioConfig {
                genre_weight: genre_weight.unwrap_or(config.genre_weight),
                top_k: top.unwrap_or(config.top_k),
                clamp: clamp.unwrap_or(config.clamp),
                ..config
            };
            let context = config.scoring_context()?;

            let catalog_file = catalog_path(catalog, &config)?;
            let tracks = load_tracks(&catalog_file)?;
            let profile_file = match profile_path {
                Some(path) => path,
                None => config.profile_path()?,
            };
            let taste = profile::load_file(&profile_file)
                .with_context(|| format!("Failed to load taste profile {}", profile_file.display()))?;

            let report = radio::generate(&tracks, &taste, &context)?;

            println!("--- Your Personalized 'Radio' Playlist ---");
            println!("(Top {} songs most representative of your library's taste)\n", config.top_k);
            for line in report.ranking.display_lines(config.top_k) {
                println!("{line}");
            }

            if !report.skipped.is_empty() {
                eprintln!("\nSkipped {} tracks with invalid features:", report.skipped.len());
                for err in &report.skipped {
                    eprintln!("  {err}");
                }
            }

            if let Some(path) = json {
                export::write_json(&path, &report.ranking)?;
                println!("\nFull ranked list saved to {}", path.display());
            }
            if let Some(path) = csv {
                export::write_csv_file(&path, &report.ranking)?;
                println!("\nFull ranked list saved to {}", path.display());
            }
            if let Some(path) = m3u {
                export::write_m3u_file(&path, &report.ranking)?;
                println!("Playlist saved to {}", path.display());
            }
            if store {
                let mut conn = db::open(&catalog_file)?;
                db::write_ranking(&mut conn, &report.ranking)?;
                println!("Ranking stored in {}", catalog_file.display());
            }
        }
        Command::Summary { catalog, question } => {
            let tracks = load_tracks(&catalog_path(catalog, &config)?)?;
            let library = summary::summarize(&tracks)?;
            match question {
                Some(question) => print!("{}", summary::assistant_prompt(&library, &question)),
                None => print!("{library}"),
            }
        }
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
    }

    Ok(())
}
