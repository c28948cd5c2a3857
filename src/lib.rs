//! Taste-matching radio engine: ranks a whole music library by how closely
//! each track matches a listener's taste profile.
//!
//! Core modules:
//! - [`normalize`] - Min-max feature scaling
//! - [`profile`] - Taste profile validation and derivation
//! - [`scorer`] - Match scores (distance minus weighted genre affinity)
//! - [`ranker`] - Stable ascending ranking, top-K views
//! - [`summary`] - Library statistics for the DJ assistant
//! - [`radio`] - The fit → score → rank pipeline
//!
//! ### Supporting Modules
//!
//! - [`track`] - Track records and the feature space
//! - [`db`] - SQLite catalog storage and analyzer CSV/JSON import
//! - [`export`] - JSON, CSV and M3U playlist export
//! - [`config`] - Data directory and tunables
//! - [`error`] - Typed error taxonomy
//! - [`cli`] / [`completion`] - Command-line interface
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use tasteradio::{db, profile, radio, scorer::ScoringContext};
//! use std::path::Path;
//!
//! let tracks = db::load_catalog_file(Path::new("catalog.db"))?;
//! let taste = profile::load_file(Path::new("profile.json"))?;
//!
//! let report = radio::generate(&tracks, &taste, &ScoringContext::default())?;
//! for line in report.ranking.display_lines(50) {
//!     println!("{line}");
//! }
//! for skipped in &report.skipped {
//!     eprintln!("skipped: {skipped}");
//! }
//! # Ok::<(), tasteradio::error::RadioError>(())
//! ```
//!
//! ## Algorithm Details
//!
//! Year, loudness (`avg_rms`) and brightness (`avg_spectral_centroid`) are
//! min-max scaled over the catalog together with the profile's reference
//! point. Each track's score is
//!
//! ```text
//! match_score = L1(track, reference) - genre_weight * genre_affinity
//! ```
//!
//! and the catalog is sorted ascending, ties in catalog order.
//!
//! ## Error Handling
//!
//! Library functions return [`error::Result`]. Malformed catalogs and
//! profiles abort a run; tracks with non-finite features are skipped and
//! listed in [`radio::RadioReport::skipped`].

pub mod cli;
pub mod completion;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod normalize;
pub mod profile;
pub mod radio;
pub mod ranker;
pub mod scorer;
pub mod summary;
pub mod track;
