//! # Feature Normalizer
//!
//! Min-max scaling of the numeric features onto `[0, 1]`.
//!
//! [`fit`] is a reduction over every vector it is handed and must see the
//! catalog *and* the profile's reference point together, otherwise the two
//! end up in different coordinate systems. [`transform`] is then a pure
//! per-row function.
//!
//! ## Out-of-range values
//!
//! A vector outside the fitted range (only possible when it was not part of
//! the fit) is handled according to [`ClampPolicy`]. The default clamps to
//! `[0, 1]`; `Unclamped` reproduces a plain min-max scaler and lets values
//! run past the edges, which changes the tail of the ranking.

use crate::track::{Feature, FeatureVector};
use serde::{Deserialize, Serialize};

/// What [`transform`] does with values outside the fitted `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClampPolicy {
    /// Clamp to `[0, 1]`
    #[default]
    Clamp,
    /// Keep the raw linear value
    Unclamped,
}

/// Observed `(min, max)` of a single feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Fallback for a feature that never had a finite value.
    const EMPTY: Self = Self { min: 0.0, max: 0.0 };

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max - self.min == 0.0
    }

    fn include(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    /// Scale one value. Non-finite input stays non-finite (NaN).
    #[must_use]
    pub fn scale(&self, value: f64, policy: ClampPolicy) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        if self.is_degenerate() {
            return 0.0;
        }
        let scaled = (value - self.min) / (self.max - self.min);
        match policy {
            ClampPolicy::Clamp => scaled.clamp(0.0, 1.0),
            ClampPolicy::Unclamped => scaled,
        }
    }
}

/// Per-feature ranges produced by [`fit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub year: Range,
    pub loudness: Range,
    pub brightness: Range,
}

impl NormalizationParams {
    #[must_use]
    pub const fn range(&self, feature: Feature) -> Range {
        match feature {
            Feature::Year => self.year,
            Feature::Loudness => self.loudness,
            Feature::Brightness => self.brightness,
        }
    }
}

/// Compute per-feature `(min, max)` over the union of `rows`.
///
/// Non-finite values are skipped; the rows carrying them are rejected
/// later by the scorer. A feature without any finite value fits to
/// `(0, 0)`, which normalizes everything to `0`.
#[must_use]
pub fn fit<'a>(rows: impl IntoIterator<Item = &'a FeatureVector>) -> NormalizationParams {
    let mut ranges: [Option<Range>; 3] = [None; 3];

    for row in rows {
        for (slot, feature) in ranges.iter_mut().zip(Feature::ALL) {
            let value = row.get(feature);
            if !value.is_finite() {
                continue;
            }
            *slot = Some(match *slot {
                Some(range) => range.include(value),
                None => Range { min: value, max: value },
            });
        }
    }

    let [year, loudness, brightness] = ranges.map(|r| r.unwrap_or(Range::EMPTY));
    let params = NormalizationParams { year, loudness, brightness };
    log::debug!("Fitted normalization parameters: {params:?}");
    params
}

/// Rescale `vector` into the coordinate system described by `params`.
#[must_use]
pub fn transform(vector: &FeatureVector, params: &NormalizationParams, policy: ClampPolicy) -> FeatureVector {
    FeatureVector::from_fn(|feature| params.range(feature).scale(vector.get(feature), policy))
}
