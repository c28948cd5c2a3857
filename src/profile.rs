//! # Taste Profile
//!
//! The listener's reference point in feature space plus per-genre affinity
//! weights. Profiles are stored as JSON:
//!
//! ```json
//! {
//!   "numerical_profile": { "year": 2004.6, "loudness": 0.18, "brightness": 2150.0 },
//!   "genre_profile": { "Rock": 0.42, "Jazz": 0.11 }
//! }
//! ```
//!
//! `loudness` and `brightness` may also be spelled with the analyzer's
//! column names (`avg_rms`, `avg_spectral_centroid`).
//!
//! Validation is strict: a profile with a missing feature, a non-numeric
//! value or a negative genre weight is rejected rather than patched up.

use crate::error::{RadioError, Result};
use crate::track::{Feature, FeatureVector, Track};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Reference feature vector and genre affinities of one listener.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteProfile {
    numerical_profile: FeatureVector,
    genre_profile: BTreeMap<String, f64>,
}

impl TasteProfile {
    /// Build a profile from already-typed parts, applying the same checks as [`load`].
    ///
    /// # Errors
    ///
    /// `MalformedProfile` if a reference value is not finite or a genre
    /// weight is negative or not finite.
    pub fn new(numerical_profile: FeatureVector, genre_profile: BTreeMap<String, f64>) -> Result<Self> {
        if let Some((feature, value)) = numerical_profile.first_non_finite() {
            return Err(RadioError::MalformedProfile(format!(
                "numerical_profile `{feature}' is not finite ({value})"
            )));
        }
        for (genre, &weight) in &genre_profile {
            check_weight(genre, weight)?;
        }
        Ok(Self { numerical_profile, genre_profile })
    }

    #[must_use]
    pub const fn numerical_profile(&self) -> &FeatureVector {
        &self.numerical_profile
    }

    #[must_use]
    pub const fn genre_profile(&self) -> &BTreeMap<String, f64> {
        &self.genre_profile
    }

    /// Affinity for `genre`, `0` for genres the profile does not know.
    #[must_use]
    pub fn affinity(&self, genre: &str) -> f64 {
        self.genre_profile.get(genre).copied().unwrap_or(0.0)
    }

    /// Write the profile as pretty JSON.
    ///
    /// # Errors
    ///
    /// Propagates serialization and file-system errors.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Saved taste profile to {}", path.display());
        Ok(())
    }
}

fn check_weight(genre: &str, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(RadioError::MalformedProfile(format!(
            "genre weight for `{genre}' must be a non-negative number, got {weight}"
        )));
    }
    Ok(())
}

fn object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| RadioError::MalformedProfile(format!("`{what}' must be an object")))
}

fn reference_value(numerical: &Map<String, Value>, feature: Feature) -> Result<f64> {
    let raw = numerical
        .get(feature.key())
        .or_else(|| numerical.get(feature.column()))
        .ok_or_else(|| {
            RadioError::MalformedProfile(format!("numerical_profile is missing `{feature}'"))
        })?;

    raw.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
        RadioError::MalformedProfile(format!("numerical_profile `{feature}' is not a number: {raw}"))
    })
}

/// Validate a raw JSON document into a [`TasteProfile`].
///
/// # Errors
///
/// `MalformedProfile` when `numerical_profile` lacks any of
/// `year`/`loudness`/`brightness`, when a value is not numeric, or when a
/// genre weight is non-numeric or negative.
pub fn load(raw: &Value) -> Result<TasteProfile> {
    let root = object(raw, "profile")?;

    let numerical = root
        .get("numerical_profile")
        .ok_or_else(|| RadioError::MalformedProfile("missing `numerical_profile'".to_string()))?;
    let numerical = object(numerical, "numerical_profile")?;

    let year = reference_value(numerical, Feature::Year)?;
    let loudness = reference_value(numerical, Feature::Loudness)?;
    let brightness = reference_value(numerical, Feature::Brightness)?;

    let genres = root
        .get("genre_profile")
        .ok_or_else(|| RadioError::MalformedProfile("missing `genre_profile'".to_string()))?;
    let genres = object(genres, "genre_profile")?;

    let mut genre_profile = BTreeMap::new();
    for (genre, raw_weight) in genres {
        let weight = raw_weight.as_f64().ok_or_else(|| {
            RadioError::MalformedProfile(format!("genre weight for `{genre}' is not a number: {raw_weight}"))
        })?;
        check_weight(genre, weight)?;
        genre_profile.insert(genre.clone(), weight);
    }

    log::debug!("Loaded taste profile with {} genre weights", genre_profile.len());
    Ok(TasteProfile {
        numerical_profile: FeatureVector::new(year, loudness, brightness),
        genre_profile,
    })
}

/// Read and validate a profile JSON file.
///
/// # Errors
///
/// File-system and JSON syntax errors, plus everything [`load`] rejects.
pub fn load_file(path: &Path) -> Result<TasteProfile> {
    let text = fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&text)?;
    load(&raw)
}

/// Derive a profile that describes the catalog itself.
///
/// The reference point is the mean of every numeric feature (non-finite
/// values are left out of the mean) and each genre's affinity is its share
/// of the catalog, so the weights sum to `1`.
///
/// # Errors
///
/// `EmptyCatalog` when there are no tracks.
pub fn derive_from_catalog(tracks: &[Track]) -> Result<TasteProfile> {
    if tracks.is_empty() {
        return Err(RadioError::EmptyCatalog);
    }

    let mean = |feature: Feature| {
        let values: Vec<f64> = tracks
            .iter()
            .map(|t| t.features().get(feature))
            .filter(|v| v.is_finite())
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / n }
    };
    let numerical_profile = FeatureVector::from_fn(mean);

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for track in tracks {
        *counts.entry(track.genre.clone()).or_default() += 1;
    }
    #[allow(clippy::cast_precision_loss)]
    let total = tracks.len() as f64;
    let genre_profile = counts
        .into_iter()
        .map(|(genre, count)| {
            #[allow(clippy::cast_precision_loss)]
            let share = count as f64 / total;
            (genre, share)
        })
        .collect();

    TasteProfile::new(numerical_profile, genre_profile)
}
