//! Track records and the numeric feature space they live in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One catalog entry: tag metadata plus two derived audio features.
///
/// Field names on the wire follow the analyzer's column names, so a track
/// serializes with `file_path`, `avg_rms` and `avg_spectral_centroid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier, usually the file path.
    #[serde(rename = "file_path")]
    pub id: String,
    pub artist: String,
    pub title: String,
    pub album: String,
    pub genre: String,
    /// Release year, `0` when unknown.
    pub year: u32,
    /// Mean RMS energy, a proxy for perceived loudness.
    #[serde(rename = "avg_rms")]
    pub loudness: f64,
    /// Mean spectral centroid, i.e. how "bright" the track sounds.
    #[serde(rename = "avg_spectral_centroid")]
    pub brightness: f64,
}

impl Track {
    /// The numeric part of the track, in raw (unnormalized) units.
    #[must_use]
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            year: f64::from(self.year),
            loudness: self.loudness,
            brightness: self.brightness,
        }
    }

    /// `Artist – Title (Genre, Year)`, the playlist line format.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("{} – {} ({}, {})", self.artist, self.title, self.genre, self.year)
    }
}

/// The numeric features compared against a taste profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Year,
    Loudness,
    Brightness,
}

impl Feature {
    pub const ALL: [Self; 3] = [Self::Year, Self::Loudness, Self::Brightness];

    /// Key used in profile documents.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Loudness => "loudness",
            Self::Brightness => "brightness",
        }
    }

    /// Column name in the analyzed catalog.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Loudness => "avg_rms",
            Self::Brightness => "avg_spectral_centroid",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A point in `{year, loudness, brightness}` space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub year: f64,
    pub loudness: f64,
    pub brightness: f64,
}

impl FeatureVector {
    #[must_use]
    pub const fn new(year: f64, loudness: f64, brightness: f64) -> Self {
        Self { year, loudness, brightness }
    }

    #[must_use]
    pub const fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Year => self.year,
            Feature::Loudness => self.loudness,
            Feature::Brightness => self.brightness,
        }
    }

    /// Build a vector by evaluating `f` once per feature.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(Feature) -> f64) -> Self {
        Self {
            year: f(Feature::Year),
            loudness: f(Feature::Loudness),
            brightness: f(Feature::Brightness),
        }
    }

    /// First feature holding NaN or an infinity, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<(Feature, f64)> {
        Feature::ALL
            .into_iter()
            .map(|feature| (feature, self.get(feature)))
            .find(|(_, value)| !value.is_finite())
    }

    /// Manhattan distance to `other`.
    #[must_use]
    pub fn l1_distance(&self, other: &Self) -> f64 {
        Feature::ALL
            .into_iter()
            .map(|feature| (self.get(feature) - other.get(feature)).abs())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Track {
        Track {
            id: "/music/a.mp3".to_string(),
            artist: "Nina Simone".to_string(),
            title: "Sinnerman".to_string(),
            album: "Pastel Blues".to_string(),
            genre: "Jazz".to_string(),
            year: 1965,
            loudness: 0.12,
            brightness: 1800.0,
        }
    }

    #[test]
    fn test_display_line_format() {
        assert_eq!(sample_track().display_line(), "Nina Simone – Sinnerman (Jazz, 1965)");
    }

    #[test]
    fn test_features_match_track_fields() {
        let v = sample_track().features();
        assert_eq!(v.get(Feature::Year), 1965.0);
        assert_eq!(v.get(Feature::Loudness), 0.12);
        assert_eq!(v.get(Feature::Brightness), 1800.0);
    }

    #[test]
    fn test_track_uses_analyzer_column_names() {
        let json = serde_json::to_value(sample_track()).unwrap();
        assert!(json.get("file_path").is_some());
        assert!(json.get("avg_rms").is_some());
        assert!(json.get("avg_spectral_centroid").is_some());
    }

    #[test]
    fn test_first_non_finite_detects_nan_and_infinity() {
        assert!(FeatureVector::new(1.0, 2.0, 3.0).first_non_finite().is_none());
        let nan = FeatureVector::new(1.0, f64::NAN, 3.0);
        assert_eq!(nan.first_non_finite().map(|(f, _)| f), Some(Feature::Loudness));
        let inf = FeatureVector::new(f64::NEG_INFINITY, 2.0, 3.0);
        assert_eq!(inf.first_non_finite().map(|(f, _)| f), Some(Feature::Year));
    }

    #[test]
    fn test_l1_distance() {
        let a = FeatureVector::new(0.0, 0.5, 1.0);
        let b = FeatureVector::new(1.0, 0.25, 0.0);
        assert!((a.l1_distance(&b) - 2.25).abs() < 1e-12);
        assert_eq!(a.l1_distance(&a), 0.0);
    }
}
