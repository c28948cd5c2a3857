//! # Radio Generation
//!
//! Runs the whole ranking pass for one catalog and one profile:
//!
//! 1. **Fit** normalization over every track *and* the profile's reference
//!    point (a full-pass reduction, finished before anything else).
//! 2. **Score** each track in parallel; rows with non-finite features are
//!    set aside and reported, not ranked.
//! 3. **Rank** the survivors with a stable ascending sort.
//!
//! Parameters are refit on every run; nothing is cached between runs.

use crate::error::{RadioError, Result};
use crate::normalize::{self, NormalizationParams};
use crate::profile::TasteProfile;
use crate::ranker::{self, Ranking};
use crate::scorer::{self, ScoringContext};
use crate::track::{FeatureVector, Track};

/// A finished ranking plus everything that was left out of it.
#[derive(Debug)]
pub struct RadioReport {
    pub ranking: Ranking,
    /// Tracks excluded from scoring, one `InvalidFeatureVector` each.
    pub skipped: Vec<RadioError>,
    /// Parameters the run was normalized with.
    pub params: NormalizationParams,
}

impl RadioReport {
    /// Ids of the skipped tracks, in catalog order.
    #[must_use]
    pub fn skipped_ids(&self) -> Vec<&str> {
        self.skipped
            .iter()
            .filter_map(|err| match err {
                RadioError::InvalidFeatureVector { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Rank `tracks` against `profile`.
///
/// # Errors
///
/// * `EmptyCatalog` if `tracks` is empty or every track was skipped
/// * `InvalidConfig` if the genre weight is negative or not finite
pub fn generate(tracks: &[Track], profile: &TasteProfile, context: &ScoringContext) -> Result<RadioReport> {
    if tracks.is_empty() {
        return Err(RadioError::EmptyCatalog);
    }

    log::info!(
        "Ranking {} tracks (genre weight {}, {:?})",
        tracks.len(),
        context.genre_weight,
        context.clamp
    );

    let features: Vec<FeatureVector> = tracks
        .iter()
        .map(Track::features)
        .chain(std::iter::once(*profile.numerical_profile()))
        .collect();
    let params = normalize::fit(&features);

    let batch = scorer::score_catalog(tracks, profile, &params, context)?;
    if batch.rows.is_empty() {
        log::warn!("All {} tracks were skipped, nothing to rank", batch.skipped.len());
        return Err(RadioError::EmptyCatalog);
    }

    let ranking = ranker::rank(batch.rows)?;
    Ok(RadioReport {
        ranking,
        skipped: batch.skipped,
        params,
    })
}
