//! # Library Summary
//!
//! Condenses the raw catalog into a handful of statistics and renders them
//! as the plain-text context handed to the DJ assistant. Other tools parse
//! this text, so the field set (total songs, average year, top five genres
//! and top five artists with counts) is fixed.

use crate::error::{RadioError, Result};
use crate::track::Track;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// How many genres/artists make it into the summary.
pub const TOP_N: usize = 5;

/// Descriptive statistics of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibrarySummary {
    pub track_count: usize,
    /// Mean of the `year` column, unknown years (`0`) included.
    pub average_year: f64,
    pub top_genres: Vec<(String, usize)>,
    pub top_artists: Vec<(String, usize)>,
}

/// Count occurrences and keep the `n` most frequent, ties in first-seen order.
fn top_counts<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Summarize `tracks`.
///
/// # Errors
///
/// `EmptyCatalog` when `tracks` is empty; an average over nothing would be NaN.
pub fn summarize(tracks: &[Track]) -> Result<LibrarySummary> {
    if tracks.is_empty() {
        return Err(RadioError::EmptyCatalog);
    }

    let year_sum: f64 = tracks.iter().map(|t| f64::from(t.year)).sum();
    #[allow(clippy::cast_precision_loss)]
    let average_year = year_sum / tracks.len() as f64;

    Ok(LibrarySummary {
        track_count: tracks.len(),
        average_year,
        top_genres: top_counts(tracks.iter().map(|t| t.genre.as_str()), TOP_N),
        top_artists: top_counts(tracks.iter().map(|t| t.artist.as_str()), TOP_N),
    })
}

fn join_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{name} ({count} songs)"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for LibrarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Here is a summary of the user's music library, which you are an expert on:")?;
        writeln!(f, "- Total Songs: {}", self.track_count)?;
        writeln!(f, "- Average Year of Music: {:.0}", self.average_year)?;
        writeln!(f, "- Top {TOP_N} Genres: {}", join_counts(&self.top_genres))?;
        writeln!(f, "- Top {TOP_N} Artists: {}", join_counts(&self.top_artists))
    }
}

/// Full prompt for the DJ assistant: persona, library summary and the
/// listener's question.
#[must_use]
pub fn assistant_prompt(summary: &LibrarySummary, question: &str) -> String {
    format!(
        "You are a wise, witty, and deeply knowledgeable music DJ. You have just finished \
         analyzing a person's entire music library and know it inside and out.\n\n\
         {summary}\n\
         Based on this summary and your broad musical knowledge, answer the following user \
         question in a conversational and insightful way.\n\n\
         User Question: \"{question}\"\n\n\
         DJ Response:\n"
    )
}
