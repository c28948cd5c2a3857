//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `tasteradio` binary.
//!
//! ## Commands
//!
//! - `import`: Load analyzer output (CSV or JSON) into the catalog database
//! - `profile`: Derive a taste profile from the catalog
//! - `rank`: Rank the catalog against the profile and print the radio playlist
//! - `summary`: Print the library summary (or a full DJ prompt)
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! tasteradio import my_library_analyzed.csv
//! tasteradio profile
//! tasteradio rank --genre-weight 0.8 --top 25 --m3u radio.m3u --csv my_library_ranked.csv
//! tasteradio summary --question "What should I listen to on a rainy day?"
//! ```

use crate::db::ImportFormat;
use crate::normalize::ClampPolicy;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "tasteradio")]
#[command(about = "Tasteradio: Offline taste profiles & ranked radio playlists for your music library")]
#[command(version)]
pub struct Args {
    /// Configuration file (defaults to config.json in the data directory)
    #[arg(long, global = true, env = "TASTERADIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Catalog location shared by most commands.
#[derive(ClapArgs, Debug, Clone)]
pub struct CatalogArg {
    /// Catalog database (SQLite, `tracks` table)
    #[arg(long, env = "TASTERADIO_CATALOG", value_hint = clap::ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import analyzed tracks into the catalog
    ///
    /// Every record needs `artist`, `title`, `album`, `genre`, `year`,
    /// `avg_rms` and `avg_spectral_centroid`; `file_path` is optional.
    /// Existing tracks with the same path are replaced.
    Import {
        /// CSV (with a header row) or JSON array produced by the library analyzer
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,

        /// Input format (defaults to JSON for `.json` files, CSV otherwise)
        #[arg(long, value_enum)]
        format: Option<ImportFormat>,

        #[command(flatten)]
        catalog: CatalogArg,
    },

    /// Derive a taste profile from the catalog
    ///
    /// The reference point is the catalog mean of year, loudness and
    /// brightness; each genre's affinity is its share of the library.
    Profile {
        #[command(flatten)]
        catalog: CatalogArg,

        /// Where to write the profile (defaults to profile.json in the data directory)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Rank the whole catalog against the taste profile
    ///
    /// Prints the best matches as "Artist – Title (Genre, Year)". Lower
    /// match scores are better.
    Rank {
        #[command(flatten)]
        catalog: CatalogArg,

        /// Taste profile JSON
        #[arg(long, env = "TASTERADIO_PROFILE", value_hint = clap::ValueHint::FilePath)]
        profile: Option<PathBuf>,

        /// Genre weight: 0 ignores genres, larger values favor common genres
        /// over numerically closer tracks
        #[arg(short, long, env = "TASTERADIO_GENRE_WEIGHT")]
        genre_weight: Option<f64>,

        /// Number of tracks to print
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Handling of values outside the fitted normalization range
        #[arg(long, value_enum)]
        clamp: Option<ClampPolicy>,

        /// Export the full ranking as JSON
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        json: Option<PathBuf>,

        /// Export the full ranking as CSV
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        csv: Option<PathBuf>,

        /// Export the full ranking as an M3U playlist
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        m3u: Option<PathBuf>,

        /// Store the ranking in the catalog's `ranked_tracks` table
        #[arg(long)]
        store: bool,
    },

    /// Print the library summary used by the DJ assistant
    Summary {
        #[command(flatten)]
        catalog: CatalogArg,

        /// Print the full assistant prompt for this question instead
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Generate shell completions
    ///
    /// Usage: tasteradio completion bash > ~/.local/share/bash-completion/completions/tasteradio
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
