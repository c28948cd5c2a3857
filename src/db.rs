//! # Catalog Database
//!
//! The analyzed library lives in a SQLite table named `tracks`, one row per
//! file, using the analyzer's column names:
//!
//! | column                  | type    | required |
//! |-------------------------|---------|----------|
//! | `file_path`             | TEXT    | no (falls back to `row:<rowid>`) |
//! | `artist`                | TEXT    | yes |
//! | `title`                 | TEXT    | yes |
//! | `album`                 | TEXT    | yes |
//! | `genre`                 | TEXT    | yes |
//! | `year`                  | INTEGER | yes, `0` = unknown |
//! | `avg_rms`               | REAL    | yes |
//! | `avg_spectral_centroid` | REAL    | yes |
//!
//! A missing column, an unreadable text or year value, or a duplicate
//! `file_path` makes the whole catalog malformed. A `NULL` feature value is
//! read as NaN instead: that row is later skipped by the scorer while the
//! rest of the library is still ranked.
//!
//! Analyzer output (`my_library_analyzed.csv`, or a JSON array of the same
//! records) goes through the same checks on import. Column names match
//! case-insensitively everywhere.
//!
//! Rankings can be written back to the `ranked_tracks` table.

use crate::error::{RadioError, Result};
use crate::ranker::Ranking;
use crate::track::Track;
use clap::ValueEnum;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

pub const TRACKS_TABLE: &str = "tracks";
pub const RANKED_TABLE: &str = "ranked_tracks";

/// Optional track id column.
pub const ID_COLUMN: &str = "file_path";

/// Columns a catalog cannot do without.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "artist",
    "title",
    "album",
    "genre",
    "year",
    "avg_rms",
    "avg_spectral_centroid",
];

/// Raw values of one record, in [`REQUIRED_COLUMNS`] order.
type RawFields<'a> = [ValueRef<'a>; REQUIRED_COLUMNS.len()];

/// Open (or create) the catalog database at `path`.
///
/// Only for writers (`import`, storing a ranking); readers use
/// [`open_read_only`].
///
/// # Errors
///
/// Fails if SQLite cannot open the file.
pub fn open(path: &Path) -> Result<Connection> {
    log::debug!("Opening catalog database {}", path.display());
    Ok(Connection::open(path)?)
}

/// Open an existing catalog database without write access.
///
/// # Errors
///
/// `Io` with `NotFound` if nothing exists at `path`; SQL errors if the
/// file cannot be opened.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    if !path.exists() {
        return Err(RadioError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("catalog {} does not exist", path.display()),
        )));
    }
    log::debug!("Opening catalog database {} read-only", path.display());
    Ok(Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?)
}

/// Create the `tracks` table if it does not exist yet.
///
/// # Errors
///
/// Propagates SQL errors.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tracks (
            file_path             TEXT    PRIMARY KEY,
            artist                TEXT    NOT NULL,
            title                 TEXT    NOT NULL,
            album                 TEXT    NOT NULL,
            genre                 TEXT    NOT NULL,
            year                  INTEGER NOT NULL DEFAULT 0,
            avg_rms               REAL,
            avg_spectral_centroid REAL
        );",
    )?;
    Ok(())
}

/// Insert or replace `tracks` in a single transaction. Returns the number
/// of rows written.
///
/// # Errors
///
/// Propagates SQL errors; nothing is written if any insert fails.
pub fn insert_tracks(conn: &mut Connection, tracks: &[Track]) -> Result<usize> {
    init_schema(conn)?;
    let tx = conn.transaction()?;

    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO tracks
                (file_path, artist, title, album, genre, year, avg_rms, avg_spectral_centroid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        for track in tracks {
            stmt.execute((
                &track.id,
                &track.artist,
                &track.title,
                &track.album,
                &track.genre,
                track.year,
                finite_or_null(track.loudness),
                finite_or_null(track.brightness),
            ))?;
        }
    }

    tx.commit()?;
    log::info!("Stored {} tracks in catalog", tracks.len());
    Ok(tracks.len())
}

/// SQLite has no NaN; store it as `NULL` so it reads back as NaN.
fn finite_or_null(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Analyzer output formats accepted by [`import_file`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// A JSON array of objects
    Json,
}

impl ImportFormat {
    /// Guess the format from the file extension; anything but `.json` is CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Import analyzer output from `path`, detecting the format from the
/// extension unless `format` is given.
///
/// # Errors
///
/// See [`import_csv`] and [`import_json`].
pub fn import_file(conn: &mut Connection, path: &Path, format: Option<ImportFormat>) -> Result<usize> {
    match format.unwrap_or_else(|| ImportFormat::from_path(path)) {
        ImportFormat::Csv => import_csv(conn, path),
        ImportFormat::Json => import_json(conn, path),
    }
}

/// Import the analyzer's CSV (header row plus one record per file).
///
/// Extra columns are ignored. An empty feature cell is read as NaN, like a
/// `NULL` in the table.
///
/// # Errors
///
/// `MalformedCatalog` for missing columns, unreadable values or duplicate
/// ids; CSV, file and SQL errors otherwise. Nothing is stored on error.
pub fn import_csv(conn: &mut Connection, path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut indices = [0; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        match position_of(headers.iter().map(str::trim), column) {
            Some(index) => *slot = index,
            None => missing.push(column),
        }
    }
    if !missing.is_empty() {
        return Err(missing_columns(&missing));
    }
    let id_index = position_of(headers.iter().map(str::trim), ID_COLUMN);

    let mut catalog = CatalogRows::default();
    for (position, record) in (1_i64..).zip(reader.records()) {
        let record = record?;
        let id = id_index
            .and_then(|index| record.get(index))
            .filter(|id| !id.is_empty())
            .map_or(ValueRef::Null, |id| ValueRef::Text(id.as_bytes()));
        let fields: RawFields<'_> =
            indices.map(|index| ValueRef::Text(record.get(index).unwrap_or_default().as_bytes()));
        catalog.push(build_track(position, id, fields)?)?;
    }

    log::debug!("Parsed {} tracks from {}", catalog.tracks.len(), path.display());
    insert_tracks(conn, &catalog.tracks)
}

/// Import a JSON array of track records.
///
/// # Errors
///
/// `MalformedCatalog` for a record that is not an object, lacks a required
/// column, holds a value of the wrong type, or repeats an id; file, JSON
/// and SQL errors otherwise. Nothing is stored on error.
pub fn import_json(conn: &mut Connection, path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&text)?;

    let mut catalog = CatalogRows::default();
    for (position, record) in (1_i64..).zip(&records) {
        let serde_json::Value::Object(object) = record else {
            return Err(RadioError::MalformedCatalog(format!("row {position} is not an object")));
        };
        let lookup = |column: &str| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        };

        let id = match lookup(ID_COLUMN) {
            Some(value) => json_value_ref(value, position, ID_COLUMN)?,
            None => ValueRef::Null,
        };
        let mut fields: RawFields<'_> = [ValueRef::Null; REQUIRED_COLUMNS.len()];
        for (slot, column) in fields.iter_mut().zip(REQUIRED_COLUMNS) {
            let value = lookup(column).ok_or_else(|| malformed(position, column, "is missing"))?;
            *slot = json_value_ref(value, position, column)?;
        }
        catalog.push(build_track(position, id, fields)?)?;
    }

    log::debug!("Parsed {} tracks from {}", catalog.tracks.len(), path.display());
    insert_tracks(conn, &catalog.tracks)
}

fn json_value_ref<'a>(value: &'a serde_json::Value, position: i64, column: &str) -> Result<ValueRef<'a>> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(ValueRef::Null),
        Value::String(s) => Ok(ValueRef::Text(s.as_bytes())),
        Value::Number(n) => Ok(n
            .as_i64()
            .map_or_else(|| ValueRef::Real(n.as_f64().unwrap_or(f64::NAN)), ValueRef::Integer)),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            Err(malformed(position, column, "is not a string or a number"))
        }
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

fn position_of<'a>(mut columns: impl Iterator<Item = &'a str>, name: &str) -> Option<usize> {
    columns.position(|column| column.eq_ignore_ascii_case(name))
}

fn missing_columns(missing: &[&str]) -> RadioError {
    RadioError::MalformedCatalog(format!("missing required columns: {}", missing.join(", ")))
}

fn malformed(rowid: i64, column: &str, what: impl std::fmt::Display) -> RadioError {
    RadioError::MalformedCatalog(format!("row {rowid}: column `{column}' {what}"))
}

fn read_text(value: ValueRef<'_>, rowid: i64, column: &str) -> Result<String> {
    match value {
        ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
            .map_err(|_| malformed(rowid, column, "is not valid UTF-8")),
        other => Err(malformed(rowid, column, format!("is not text ({:?})", other.data_type()))),
    }
}

/// Years written through a float column come back as `2005.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integral_year(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value)).then(|| value as u32)
}

fn read_year(value: ValueRef<'_>, rowid: i64) -> Result<u32> {
    match value {
        ValueRef::Integer(i) => u32::try_from(i).map_err(|_| malformed(rowid, "year", format!("is out of range ({i})"))),
        ValueRef::Real(f) => integral_year(f).ok_or_else(|| malformed(rowid, "year", format!("is not a non-negative integer ({f})"))),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .map(str::trim)
            .and_then(|s| s.parse::<u32>().ok().or_else(|| s.parse::<f64>().ok().and_then(integral_year)))
            .ok_or_else(|| malformed(rowid, "year", "is not a non-negative integer")),
        other => Err(malformed(rowid, "year", format!("is not an integer ({:?})", other.data_type()))),
    }
}

fn read_feature(value: ValueRef<'_>, rowid: i64, column: &str) -> Result<f64> {
    match value {
        ValueRef::Real(f) => Ok(f),
        #[allow(clippy::cast_precision_loss)]
        ValueRef::Integer(i) => Ok(i as f64),
        ValueRef::Null => Ok(f64::NAN),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes).map(str::trim) {
            Ok("") => Ok(f64::NAN),
            Ok(s) => s.parse::<f64>().map_err(|_| malformed(rowid, column, "is not a number")),
            Err(_) => Err(malformed(rowid, column, "is not valid UTF-8")),
        },
        ValueRef::Blob(_) => Err(malformed(rowid, column, "is a blob")),
    }
}

/// Validate one record. A `NULL` id falls back to `row:<rowid>`.
fn build_track(rowid: i64, id: ValueRef<'_>, fields: RawFields<'_>) -> Result<Track> {
    let [artist, title, album, genre, year, loudness, brightness] = fields;
    Ok(Track {
        id: match id {
            ValueRef::Null => format!("row:{rowid}"),
            value => read_text(value, rowid, ID_COLUMN)?,
        },
        artist: read_text(artist, rowid, "artist")?,
        title: read_text(title, rowid, "title")?,
        album: read_text(album, rowid, "album")?,
        genre: read_text(genre, rowid, "genre")?,
        year: read_year(year, rowid)?,
        loudness: read_feature(loudness, rowid, "avg_rms")?,
        brightness: read_feature(brightness, rowid, "avg_spectral_centroid")?,
    })
}

/// Tracks in input order, rejecting repeated ids.
#[derive(Default)]
struct CatalogRows {
    tracks: Vec<Track>,
    seen: HashSet<String>,
}

impl CatalogRows {
    fn push(&mut self, track: Track) -> Result<()> {
        if !self.seen.insert(track.id.clone()) {
            return Err(RadioError::MalformedCatalog(format!("duplicate track id `{}'", track.id)));
        }
        self.tracks.push(track);
        Ok(())
    }
}

/// Read the whole catalog in table order.
///
/// # Errors
///
/// `MalformedCatalog` for a missing table/column, unreadable values or
/// duplicate ids; SQL errors otherwise.
pub fn load_catalog(conn: &Connection) -> Result<Vec<Track>> {
    let columns = table_columns(conn, TRACKS_TABLE)?;
    if columns.is_empty() {
        return Err(RadioError::MalformedCatalog(format!("no `{TRACKS_TABLE}' table")));
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| position_of(columns.iter().map(String::as_str), required).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(missing_columns(&missing));
    }

    let id_column = match position_of(columns.iter().map(String::as_str), ID_COLUMN) {
        Some(index) => columns[index].as_str(),
        None => "NULL",
    };
    let sql = format!(
        "SELECT rowid, {id_column}, {} FROM {TRACKS_TABLE} ORDER BY rowid",
        REQUIRED_COLUMNS.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut catalog = CatalogRows::default();

    while let Some(row) = rows.next()? {
        let rowid: i64 = row.get(0)?;
        let mut fields: RawFields<'_> = [ValueRef::Null; REQUIRED_COLUMNS.len()];
        for (index, slot) in fields.iter_mut().enumerate() {
            *slot = row.get_ref(index + 2)?;
        }
        catalog.push(build_track(rowid, row.get_ref(1)?, fields)?)?;
    }

    log::info!("Loaded {} tracks from catalog", catalog.tracks.len());
    Ok(catalog.tracks)
}

/// Open the existing catalog at `path` read-only and load it.
///
/// # Errors
///
/// `Io` (`NotFound`) if `path` does not exist, otherwise see
/// [`load_catalog`].
pub fn load_catalog_file(path: &Path) -> Result<Vec<Track>> {
    let conn = open_read_only(path)?;
    load_catalog(&conn)
}

/// Replace the `ranked_tracks` table with `ranking`, best match first.
///
/// # Errors
///
/// Propagates SQL errors; the old table survives if the write fails.
pub fn write_ranking(conn: &mut Connection, ranking: &Ranking) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(
        "DROP TABLE IF EXISTS ranked_tracks;
         CREATE TABLE ranked_tracks (
            rank                  INTEGER PRIMARY KEY,
            file_path             TEXT    NOT NULL,
            artist                TEXT    NOT NULL,
            title                 TEXT    NOT NULL,
            album                 TEXT    NOT NULL,
            genre                 TEXT    NOT NULL,
            year                  INTEGER NOT NULL,
            avg_rms               REAL    NOT NULL,
            avg_spectral_centroid REAL    NOT NULL,
            numerical_distance    REAL    NOT NULL,
            genre_affinity        REAL    NOT NULL,
            match_score           REAL    NOT NULL
        );",
    )?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO ranked_tracks
                (rank, file_path, artist, title, album, genre, year, avg_rms,
                 avg_spectral_centroid, numerical_distance, genre_affinity, match_score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?;

        for (position, row) in ranking.all().iter().enumerate() {
            let t = &row.track;
            stmt.execute(rusqlite::params![
                position + 1,
                t.id,
                t.artist,
                t.title,
                t.album,
                t.genre,
                t.year,
                t.loudness,
                t.brightness,
                row.numerical_distance,
                row.genre_affinity,
                row.match_score,
            ])?;
        }
    }

    tx.commit()?;
    log::info!("Wrote {} ranked tracks to `{RANKED_TABLE}'", ranking.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranker;
    use crate::scorer::ScoredRow;

    fn track(id: &str, year: u32) -> Track {
        Track {
            id: id.to_string(),
            artist: "Portishead".to_string(),
            title: format!("Track {id}"),
            album: "Dummy".to_string(),
            genre: "Trip-Hop".to_string(),
            year,
            loudness: 0.15,
            brightness: 1650.5,
        }
    }

    #[test]
    fn test_insert_then_load_preserves_order() {
        let mut conn = Connection::open_in_memory().unwrap();
        let tracks = vec![track("/m/b.mp3", 1994), track("/m/a.mp3", 0)];
        insert_tracks(&mut conn, &tracks).unwrap();
        assert_eq!(load_catalog(&conn).unwrap(), tracks);
    }

    #[test]
    fn test_missing_table_is_malformed() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(load_catalog(&conn), Err(RadioError::MalformedCatalog(_))));
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE tracks (artist TEXT, title TEXT, album TEXT, genre TEXT, year INTEGER);")
            .unwrap();
        let err = load_catalog(&conn).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("avg_rms"), "{msg}");
        assert!(msg.contains("avg_spectral_centroid"), "{msg}");
    }

    #[test]
    fn test_null_features_read_as_nan() {
        let mut conn = Connection::open_in_memory().unwrap();
        let mut broken = track("/m/x.mp3", 2000);
        broken.loudness = f64::NAN;
        insert_tracks(&mut conn, &[broken]).unwrap();
        let loaded = load_catalog(&conn).unwrap();
        assert!(loaded[0].loudness.is_nan());
        assert_eq!(loaded[0].brightness, 1650.5);
    }

    #[test]
    fn test_catalog_without_file_path_uses_rowid() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE tracks (artist TEXT, title TEXT, album TEXT, genre TEXT, year INTEGER,
                                  avg_rms REAL, avg_spectral_centroid REAL);
             INSERT INTO tracks VALUES ('A', 'T', 'B', 'G', '1999', 0.1, 1000);",
        )
        .unwrap();
        let loaded = load_catalog(&conn).unwrap();
        assert_eq!(loaded[0].id, "row:1");
        assert_eq!(loaded[0].year, 1999);
        assert_eq!(loaded[0].brightness, 1000.0);
    }

    #[test]
    fn test_negative_year_is_malformed() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch("INSERT INTO tracks VALUES ('/m/a', 'A', 'T', 'B', 'G', -5, 0.1, 10.0);")
            .unwrap();
        assert!(matches!(load_catalog(&conn), Err(RadioError::MalformedCatalog(_))));
    }

    #[test]
    fn test_duplicate_ids_are_malformed() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE tracks (file_path TEXT, artist TEXT, title TEXT, album TEXT, genre TEXT,
                                  year INTEGER, avg_rms REAL, avg_spectral_centroid REAL);
             INSERT INTO tracks VALUES ('/m/a', 'A', 'T', 'B', 'G', 1, 0.1, 10.0);
             INSERT INTO tracks VALUES ('/m/a', 'A', 'T2', 'B', 'G', 2, 0.2, 20.0);",
        )
        .unwrap();
        let err = load_catalog(&conn).unwrap_err();
        assert!(matches!(err, RadioError::MalformedCatalog(ref m) if m.contains("/m/a")));
    }

    #[test]
    fn test_write_ranking_replaces_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        let rows = vec![
            ScoredRow { track: track("/m/a", 1), numerical_distance: 0.4, genre_affinity: 0.0, match_score: 0.4 },
            ScoredRow { track: track("/m/b", 2), numerical_distance: 0.3, genre_affinity: 0.2, match_score: 0.2 },
        ];
        let ranking = ranker::rank(rows).unwrap();
        write_ranking(&mut conn, &ranking).unwrap();
        write_ranking(&mut conn, &ranking).unwrap();

        let first: String = conn
            .query_row("SELECT file_path FROM ranked_tracks WHERE rank = 1", [], |r| r.get(0))
            .unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM ranked_tracks", [], |r| r.get(0)).unwrap();
        assert_eq!(first, "/m/b");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_import_json() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("analyzed.json");
        fs::write(
            &json_path,
            r#"[{"file_path": "/m/a.mp3", "artist": "A", "title": "T", "album": "B",
                 "genre": "Rock", "year": 1991, "avg_rms": 0.2, "avg_spectral_centroid": 2100.0}]"#,
        )
        .unwrap();
        let mut conn = open(&dir.path().join("catalog.db")).unwrap();
        assert_eq!(import_json(&mut conn, &json_path).unwrap(), 1);
        assert_eq!(load_catalog(&conn).unwrap()[0].genre, "Rock");
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_import_json_missing_feature_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = write_file(
            dir.path(),
            "analyzed.json",
            r#"[{"file_path": "/a", "artist": "A", "title": "T", "album": "B",
                 "genre": "Rock", "year": 1991, "avg_spectral_centroid": 2.0}]"#,
        );
        let db_path = dir.path().join("catalog.db");
        let mut conn = open(&db_path).unwrap();

        let err = import_json(&mut conn, &json_path).unwrap_err();
        assert!(matches!(err, RadioError::MalformedCatalog(ref m) if m.contains("avg_rms")), "{err}");
        assert!(table_columns(&conn, TRACKS_TABLE).unwrap().is_empty());
    }

    #[test]
    fn test_import_json_mistyped_field_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = write_file(
            dir.path(),
            "analyzed.json",
            r#"[{"artist": "A", "title": "T", "album": "B", "genre": ["Rock"],
                 "year": 1991, "avg_rms": 0.2, "avg_spectral_centroid": 2.0}]"#,
        );
        let mut conn = Connection::open_in_memory().unwrap();
        let err = import_json(&mut conn, &json_path).unwrap_err();
        assert!(matches!(err, RadioError::MalformedCatalog(ref m) if m.contains("genre")), "{err}");
    }

    #[test]
    fn test_import_json_without_file_path_uses_position() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = write_file(
            dir.path(),
            "analyzed.json",
            r#"[{"artist": "A", "title": "T", "album": "B", "genre": "Rock",
                 "year": 2005.0, "avg_rms": null, "avg_spectral_centroid": 2}]"#,
        );
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(import_json(&mut conn, &json_path).unwrap(), 1);

        let loaded = load_catalog(&conn).unwrap();
        assert_eq!(loaded[0].id, "row:1");
        assert_eq!(loaded[0].year, 2005);
        assert!(loaded[0].loudness.is_nan());
        assert_eq!(loaded[0].brightness, 2.0);
    }

    #[test]
    fn test_import_csv_matches_analyzer_output() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_file(
            dir.path(),
            "my_library_analyzed.csv",
            "file_path,artist,title,album,genre,year,avg_rms,avg_spectral_centroid,bpm\n\
             /m/a.mp3,Portishead,Roads,Dummy,Trip-Hop,1994.0,0.12,1650.5,72\n\
             /m/b.mp3,\"Crosby, Stills & Nash\",Helplessly Hoping,CSN,Folk,1969,,900.0,90\n",
        );
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(import_csv(&mut conn, &csv_path).unwrap(), 2);

        let loaded = load_catalog(&conn).unwrap();
        assert_eq!(loaded[0].id, "/m/a.mp3");
        assert_eq!(loaded[0].year, 1994);
        assert_eq!(loaded[0].loudness, 0.12);
        assert_eq!(loaded[1].artist, "Crosby, Stills & Nash");
        assert!(loaded[1].loudness.is_nan());
    }

    #[test]
    fn test_import_csv_missing_column_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_file(
            dir.path(),
            "analyzed.csv",
            "file_path,artist,title,album,genre,year,avg_rms\n/m/a.mp3,A,T,B,G,1999,0.1\n",
        );
        let mut conn = Connection::open_in_memory().unwrap();
        let err = import_csv(&mut conn, &csv_path).unwrap_err();
        assert!(
            matches!(err, RadioError::MalformedCatalog(ref m) if m.contains("avg_spectral_centroid")),
            "{err}"
        );
    }

    #[test]
    fn test_import_csv_bad_year_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_file(
            dir.path(),
            "analyzed.csv",
            "artist,title,album,genre,year,avg_rms,avg_spectral_centroid\nA,T,B,G,2005-03-01,0.1,10\n",
        );
        let mut conn = Connection::open_in_memory().unwrap();
        let err = import_csv(&mut conn, &csv_path).unwrap_err();
        assert!(matches!(err, RadioError::MalformedCatalog(ref m) if m.contains("year")), "{err}");
    }

    #[test]
    fn test_import_format_follows_extension() {
        assert_eq!(ImportFormat::from_path(Path::new("lib.JSON")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("my_library_analyzed.csv")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_path(Path::new("analyzed")), ImportFormat::Csv);
    }

    #[test]
    fn test_loading_missing_file_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.db");

        let err = load_catalog_file(&path).unwrap_err();
        assert!(matches!(err, RadioError::Io(ref e) if e.kind() == io::ErrorKind::NotFound), "{err}");
        assert!(!path.exists());
    }

    #[test]
    fn test_integral_real_year_is_accepted() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE tracks (file_path TEXT, artist TEXT, title TEXT, album TEXT, genre TEXT,
                                  year REAL, avg_rms REAL, avg_spectral_centroid REAL);
             INSERT INTO tracks VALUES ('/m/a', 'A', 'T', 'B', 'G', 2005.0, 0.1, 10.0);",
        )
        .unwrap();
        assert_eq!(load_catalog(&conn).unwrap()[0].year, 2005);

        conn.execute_batch("INSERT INTO tracks VALUES ('/m/b', 'A', 'T', 'B', 'G', 2005.5, 0.1, 10.0);")
            .unwrap();
        assert!(matches!(load_catalog(&conn), Err(RadioError::MalformedCatalog(_))));
    }

    #[test]
    fn test_column_names_are_case_insensitive() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE tracks (File_Path TEXT, Artist TEXT, Title TEXT, Album TEXT, Genre TEXT,
                                  Year INTEGER, AVG_RMS REAL, Avg_Spectral_Centroid REAL);
             INSERT INTO tracks VALUES ('/m/a', 'A', 'T', 'B', 'G', 1999, 0.1, 10.0);",
        )
        .unwrap();
        let loaded = load_catalog(&conn).unwrap();
        assert_eq!(loaded[0].id, "/m/a");
        assert_eq!(loaded[0].year, 1999);
    }
}
