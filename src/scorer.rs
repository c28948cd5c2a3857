//! Match scoring against a taste profile.
//!
//! ```text
//! numerical_distance = |Δyear| + |Δloudness| + |Δbrightness|      (normalized space)
//! genre_affinity     = genre_profile[track.genre]  (0 if unknown)
//! match_score        = numerical_distance - genre_weight * genre_affinity
//! ```
//!
//! Lower is better. `genre_weight` decides how much a common genre may
//! make up for numeric dissimilarity: `0` ignores genres entirely, large
//! values let a track of a favored genre overtake numerically closer
//! tracks of rare genres.

use crate::error::{RadioError, Result};
use crate::normalize::{self, ClampPolicy, NormalizationParams};
use crate::profile::TasteProfile;
use crate::track::{FeatureVector, Track};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default genre weight of the reference playlist.
pub const DEFAULT_GENRE_WEIGHT: f64 = 0.5;

/// Tunables for a scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringContext {
    /// How strongly genre affinity offsets numeric distance. Finite and `>= 0`.
    pub genre_weight: f64,
    /// Handling of values outside the fitted normalization range.
    pub clamp: ClampPolicy,
}

impl Default for ScoringContext {
    fn default() -> Self {
        Self {
            genre_weight: DEFAULT_GENRE_WEIGHT,
            clamp: ClampPolicy::Clamp,
        }
    }
}

impl ScoringContext {
    /// # Errors
    ///
    /// `InvalidConfig` if `genre_weight` is negative or not finite.
    pub fn new(genre_weight: f64, clamp: ClampPolicy) -> Result<Self> {
        validate_genre_weight(genre_weight)?;
        Ok(Self { genre_weight, clamp })
    }
}

fn validate_genre_weight(genre_weight: f64) -> Result<()> {
    if genre_weight.is_finite() && genre_weight >= 0.0 {
        Ok(())
    } else {
        Err(RadioError::InvalidConfig(format!(
            "genre weight must be a finite number >= 0, got {genre_weight}"
        )))
    }
}

/// A track together with the parts of its match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    #[serde(flatten)]
    pub track: Track,
    pub numerical_distance: f64,
    pub genre_affinity: f64,
    pub match_score: f64,
}

/// Score one track.
///
/// Both vectors must already be normalized with the same parameters.
///
/// # Errors
///
/// * `InvalidFeatureVector` if either vector holds a non-finite value
/// * `InvalidConfig` if `genre_weight` is negative or not finite
pub fn score(
    track: &Track,
    normalized_track: &FeatureVector,
    profile: &TasteProfile,
    normalized_profile: &FeatureVector,
    genre_weight: f64,
) -> Result<ScoredRow> {
    validate_genre_weight(genre_weight)?;

    if let Some((feature, value)) = normalized_track.first_non_finite() {
        return Err(RadioError::InvalidFeatureVector {
            id: track.id.clone(),
            reason: format!("normalized {feature} is {value}"),
        });
    }
    if let Some((feature, value)) = normalized_profile.first_non_finite() {
        return Err(RadioError::InvalidFeatureVector {
            id: track.id.clone(),
            reason: format!("normalized profile {feature} is {value}"),
        });
    }

    let numerical_distance = normalized_track.l1_distance(normalized_profile);
    let genre_affinity = profile.affinity(&track.genre);
    let match_score = numerical_distance - genre_weight * genre_affinity;

    log::trace!("Scored `{}': distance {numerical_distance:.4}, affinity {genre_affinity:.4}, match {match_score:.4}", track.id);

    Ok(ScoredRow {
        track: track.clone(),
        numerical_distance,
        genre_affinity,
        match_score,
    })
}

/// Outcome of scoring a whole catalog.
#[derive(Debug, Default)]
pub struct ScoreBatch {
    /// Successfully scored rows, in catalog order.
    pub rows: Vec<ScoredRow>,
    /// Rows left out, in catalog order. Always `InvalidFeatureVector`.
    pub skipped: Vec<RadioError>,
}

/// Normalize and score every track in parallel.
///
/// `params` must come from a fit that included the profile's reference
/// vector. Output order matches `tracks` regardless of how rayon splits
/// the work.
///
/// # Errors
///
/// `InvalidConfig` for an invalid genre weight. Per-row failures end up in
/// [`ScoreBatch::skipped`].
pub fn score_catalog(
    tracks: &[Track],
    profile: &TasteProfile,
    params: &NormalizationParams,
    context: &ScoringContext,
) -> Result<ScoreBatch> {
    validate_genre_weight(context.genre_weight)?;
    let normalized_profile = normalize::transform(profile.numerical_profile(), params, context.clamp);

    let results: Vec<Result<ScoredRow>> = tracks
        .par_iter()
        .map(|track| {
            let normalized = normalize::transform(&track.features(), params, context.clamp);
            score(track, &normalized, profile, &normalized_profile, context.genre_weight)
        })
        .collect();

    let mut batch = ScoreBatch::default();
    for result in results {
        match result {
            Ok(row) => batch.rows.push(row),
            Err(err) if err.is_recoverable() => {
                log::warn!("Skipping track: {err}");
                batch.skipped.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    log::debug!("Scored {} tracks, skipped {}", batch.rows.len(), batch.skipped.len());
    Ok(batch)
}
