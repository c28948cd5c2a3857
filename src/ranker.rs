//! Ordering of scored tracks into a radio playlist.

use crate::error::{RadioError, Result};
use crate::scorer::ScoredRow;
use std::cmp::Ordering;

/// Scored rows sorted ascending by `match_score`.
///
/// Equal scores keep the order in which the tracks appeared in the
/// catalog, so a ranking is fully determined by its input.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    rows: Vec<ScoredRow>,
}

/// Sort `rows` (given in catalog order) into a [`Ranking`].
///
/// # Errors
///
/// `EmptyCatalog` if there is nothing to rank.
pub fn rank(mut rows: Vec<ScoredRow>) -> Result<Ranking> {
    if rows.is_empty() {
        return Err(RadioError::EmptyCatalog);
    }

    // `sort_by` is stable: ties stay in catalog order.
    rows.sort_by(|a, b| {
        a.match_score
            .partial_cmp(&b.match_score)
            .unwrap_or(Ordering::Equal)
    });

    debug_assert!(rows.windows(2).all(|w| w[0].match_score <= w[1].match_score));
    log::debug!("Ranked {} tracks", rows.len());
    Ok(Ranking { rows })
}

impl Ranking {
    /// The best `n` rows, or all of them if there are fewer.
    #[must_use]
    pub fn top_k(&self, n: usize) -> &[ScoredRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Full order, best match first.
    #[must_use]
    pub fn all(&self) -> &[ScoredRow] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<ScoredRow> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; a ranking is never built from zero rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `Artist – Title (Genre, Year)` lines for the top `n`.
    #[must_use]
    pub fn display_lines(&self, n: usize) -> Vec<String> {
        self.top_k(n).iter().map(|row| row.track.display_line()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    fn row(id: &str, match_score: f64) -> ScoredRow {
        ScoredRow {
            track: Track {
                id: id.to_string(),
                artist: format!("Artist {id}"),
                title: format!("Title {id}"),
                album: "Album".to_string(),
                genre: "Rock".to_string(),
                year: 2001,
                loudness: 0.1,
                brightness: 0.2,
            },
            numerical_distance: match_score.max(0.0),
            genre_affinity: 0.0,
            match_score,
        }
    }

    fn ids(rows: &[ScoredRow]) -> Vec<&str> {
        rows.iter().map(|r| r.track.id.as_str()).collect()
    }

    #[test]
    fn test_rank_is_ascending() {
        let ranking = rank(vec![row("a", 0.9), row("b", -0.2), row("c", 0.4)]).unwrap();
        assert_eq!(ids(ranking.all()), ["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let ranking = rank(vec![row("x", 0.5), row("a", 0.1), row("y", 0.5), row("b", 0.5)]).unwrap();
        assert_eq!(ids(ranking.all()), ["a", "x", "y", "b"]);
    }

    #[test]
    fn test_top_k_never_overflows() {
        let ranking = rank(vec![row("a", 0.3), row("b", 0.1)]).unwrap();
        assert_eq!(ids(ranking.top_k(1)), ["b"]);
        assert_eq!(ranking.top_k(2), ranking.all());
        assert_eq!(ranking.top_k(50), ranking.all());
        assert!(ranking.top_k(0).is_empty());
    }

    #[test]
    fn test_rank_empty_fails() {
        assert!(matches!(rank(Vec::new()), Err(RadioError::EmptyCatalog)));
    }

    #[test]
    fn test_rank_is_deterministic() {
        let input = vec![row("a", 0.2), row("b", 0.2), row("c", 0.1), row("d", 0.3)];
        let first = rank(input.clone()).unwrap();
        let second = rank(input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_lines() {
        let ranking = rank(vec![row("a", 0.3), row("b", 0.1)]).unwrap();
        assert_eq!(ranking.display_lines(1), ["Artist b – Title b (Rock, 2001)"]);
        assert_eq!(ranking.display_lines(10).len(), 2);
    }
}
