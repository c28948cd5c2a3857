//! Ranked playlist export: JSON and CSV tables, M3U playlist.

use crate::error::Result;
use crate::ranker::Ranking;
use crate::scorer::ScoredRow;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the full ranking as a JSON array of flat records.
///
/// Each record carries the track columns plus `numerical_distance`,
/// `genre_affinity` and `match_score`, best match first.
///
/// # Errors
///
/// File-system and serialization errors.
pub fn write_json(path: &Path, ranking: &Ranking) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, ranking.all())?;
    writer.flush()?;
    log::info!("Exported {} ranked tracks to {}", ranking.len(), path.display());
    Ok(())
}

/// One line of the ranked CSV: the analyzer's columns plus the scores.
///
/// The csv serializer cannot flatten [`ScoredRow`]'s nested track, so the
/// columns are spelled out here.
#[derive(Serialize)]
struct RankedRecord<'a> {
    file_path: &'a str,
    artist: &'a str,
    title: &'a str,
    album: &'a str,
    genre: &'a str,
    year: u32,
    avg_rms: f64,
    avg_spectral_centroid: f64,
    numerical_distance: f64,
    genre_affinity: f64,
    match_score: f64,
}

impl<'a> From<&'a ScoredRow> for RankedRecord<'a> {
    fn from(row: &'a ScoredRow) -> Self {
        let track = &row.track;
        Self {
            file_path: &track.id,
            artist: &track.artist,
            title: &track.title,
            album: &track.album,
            genre: &track.genre,
            year: track.year,
            avg_rms: track.loudness,
            avg_spectral_centroid: track.brightness,
            numerical_distance: row.numerical_distance,
            genre_affinity: row.genre_affinity,
            match_score: row.match_score,
        }
    }
}

/// Write the full ranking as CSV with a header row, best match first.
///
/// The track columns keep the analyzer's names, so the output can be
/// imported again as a catalog.
///
/// # Errors
///
/// Write and serialization errors.
pub fn write_csv<W: Write>(out: W, ranking: &Ranking) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in ranking.all() {
        writer.serialize(RankedRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// [`write_csv`] into a file at `path` (`my_library_ranked.csv`).
///
/// # Errors
///
/// File-system and serialization errors.
pub fn write_csv_file(path: &Path, ranking: &Ranking) -> Result<()> {
    write_csv(BufWriter::new(File::create(path)?), ranking)?;
    log::info!("Exported {} ranked tracks to {}", ranking.len(), path.display());
    Ok(())
}

/// Render the ranking as an extended M3U playlist.
///
/// # Errors
///
/// Errors from the underlying writer.
pub fn write_m3u<W: Write>(out: &mut W, ranking: &Ranking) -> Result<()> {
    writeln!(out, "#EXTM3U")?;
    for row in ranking.all() {
        writeln!(out, "#EXTINF:-1,{} - {}", row.track.artist, row.track.title)?;
        writeln!(out, "{}", row.track.id)?;
    }
    Ok(())
}

/// [`write_m3u`] into a file at `path`.
///
/// # Errors
///
/// File-system errors.
pub fn write_m3u_file(path: &Path, ranking: &Ranking) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_m3u(&mut writer, ranking)?;
    writer.flush()?;
    log::info!("Wrote playlist {}", path.display());
    Ok(())
}
