// Player-season table loading.
//
// Reads the pre-extracted Basketball-Reference CSV: one row per player per
// team per season. Only the analysed columns are typed; every other column is
// carried through as raw text so the cleaned file keeps the full schema.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::data::schema::{self, ColumnIndex, SchemaError};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player's line for one team in one season.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeason {
    pub season: Option<i32>,
    pub team_id: Option<String>,
    pub player: Option<String>,
    pub mp_per_g: Option<f64>,
    pub fg3_per_g: Option<f64>,
    pub fg3a_per_g: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ts_pct: Option<f64>,
    pub per: Option<f64>,
    pub bpm: Option<f64>,
    pub obpm: Option<f64>,
    pub dbpm: Option<f64>,
    pub ws: Option<f64>,
    /// Derived by the cleaner; always `false` on freshly loaded rows.
    pub champion: bool,
    /// Original cell text, aligned with `SeasonTable::headers`.
    pub raw: StringRecord,
}

impl PlayerSeason {
    /// `(season, team)` grouping key. `None` for rows the cleaner would drop.
    pub fn key(&self) -> Option<(i32, &str)> {
        Some((self.season?, self.team_id.as_deref()?))
    }
}

/// The in-memory player-season table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonTable {
    /// Input headers, excluding any previously derived champion column.
    pub headers: StringRecord,
    pub columns: ColumnIndex,
    pub rows: Vec<PlayerSeason>,
}

impl SeasonTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("schema error in {path}: {source}")]
    Schema { path: String, source: SchemaError },
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Cell spellings treated as a missing value.
const MISSING_MARKERS: [&str; 9] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "<NA>"];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Parse an optional text cell, trimming whitespace.
pub fn parse_text(cell: &str) -> Option<String> {
    if is_missing(cell) {
        None
    } else {
        Some(cell.trim().to_string())
    }
}

/// Parse an optional numeric cell. Unparseable and non-finite values are
/// treated as missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a season cell to an integer year. Whole floats such as `1996.0`
/// are accepted; anything else becomes missing.
pub fn parse_season(cell: &str) -> Option<i32> {
    if is_missing(cell) {
        return None;
    }
    let cell = cell.trim();
    if let Ok(year) = cell.parse::<i32>() {
        return Some(year);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}

fn parse_row(record: StringRecord, cols: &ColumnIndex) -> PlayerSeason {
    let number = |idx: usize| parse_number(field(&record, idx));
    PlayerSeason {
        season: parse_season(field(&record, cols.season)),
        team_id: parse_text(field(&record, cols.team_id)),
        player: parse_text(field(&record, cols.player)),
        mp_per_g: number(cols.mp_per_g),
        fg3_per_g: number(cols.fg3_per_g),
        fg3a_per_g: number(cols.fg3a_per_g),
        fg3_pct: number(cols.fg3_pct),
        ts_pct: number(cols.ts_pct),
        per: number(cols.per),
        bpm: number(cols.bpm),
        obpm: number(cols.obpm),
        dbpm: number(cols.dbpm),
        ws: number(cols.ws),
        champion: false,
        raw: record,
    }
}

/// Drop the cell at `idx` from a record.
fn without_column(record: &StringRecord, idx: usize) -> StringRecord {
    record
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .map(|(_, cell)| cell)
        .collect()
}

/// Extend a short record with empty cells up to `width`.
fn padded(mut record: StringRecord, width: usize) -> StringRecord {
    while record.len() < width {
        record.push_field("");
    }
    record
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Load a table from any reader. `origin` labels errors and log lines.
///
/// Short records are padded with empty cells, so their absent values read as
/// missing. Records wider than the header, or that fail to decode, are
/// skipped with a warning. A champion column already present in the input is
/// discarded; the cleaner recomputes it.
pub fn load_from_reader<R: Read>(rdr: R, origin: &str) -> Result<SeasonTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(rdr);
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: origin.to_string(),
        source,
    };

    let mut headers = reader.headers().map_err(csv_err)?.clone();
    let width = headers.len();
    let stale_champion = schema::champion_position(&headers);
    if let Some(idx) = stale_champion {
        debug!("{origin}: discarding existing champion column at position {idx}");
        headers = without_column(&headers, idx);
    }

    let columns = ColumnIndex::resolve(&headers).map_err(|source| LoadError::Schema {
        path: origin.to_string(),
        source,
    })?;

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        match result {
            Ok(record) if record.len() > width => {
                warn!(
                    "{origin}: skipping row {} with {} cells, header has {}",
                    line + 2,
                    record.len(),
                    width
                );
            }
            Ok(record) => {
                let record = padded(record, width);
                let record = match stale_champion {
                    Some(idx) => without_column(&record, idx),
                    None => record,
                };
                rows.push(parse_row(record, &columns));
            }
            Err(e) => {
                // +2: one for the header row, one for 1-based numbering
                warn!("{origin}: skipping malformed row {}: {}", line + 2, e);
            }
        }
    }

    Ok(SeasonTable {
        headers,
        columns,
        rows,
    })
}

/// Load the player-season table from a CSV file.
pub fn load_table(path: &Path) -> Result<SeasonTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_from_reader(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "player,pos,season,team_id,mp_per_g,fg3_per_g,fg3a_per_g,fg3_pct,ts_pct,per,bpm,obpm,dbpm,ws";

    fn load(body: &str) -> SeasonTable {
        let csv_data = format!("{HEADER}\n{body}");
        load_from_reader(csv_data.as_bytes(), "test").unwrap()
    }

    #[test]
    fn typed_fields_parsed() {
        let table = load("Michael Jordan,SG,1996,CHI,37.7,1.4,3.2,0.427,0.582,29.4,11.6,8.9,2.7,20.4");
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.player.as_deref(), Some("Michael Jordan"));
        assert_eq!(row.season, Some(1996));
        assert_eq!(row.team_id.as_deref(), Some("CHI"));
        assert!((row.fg3_pct.unwrap() - 0.427).abs() < f64::EPSILON);
        assert!((row.ws.unwrap() - 20.4).abs() < f64::EPSILON);
        assert!(!row.champion);
        assert_eq!(row.raw.get(1), Some("SG"));
    }

    #[test]
    fn missing_markers_become_none() {
        let table = load("Shaq,C,1996,ORL,35.8,0.0,0.0,,0.603,NaN,NA,null,None,10.1");
        let row = &table.rows[0];
        assert_eq!(row.fg3_per_g, Some(0.0));
        assert_eq!(row.fg3_pct, None);
        assert_eq!(row.per, None);
        assert_eq!(row.bpm, None);
        assert_eq!(row.obpm, None);
        assert_eq!(row.dbpm, None);
        assert_eq!(row.ws, Some(10.1));
    }

    #[test]
    fn unparseable_season_is_missing_not_fatal() {
        let table = load(
            "A,PG,abc,BOS,30,1,2,0.5,0.5,15,1,1,0,3\n\
             B,PG,1997.0,BOS,30,1,2,0.5,0.5,15,1,1,0,3\n\
             C,PG,1997.5,BOS,30,1,2,0.5,0.5,15,1,1,0,3",
        );
        assert_eq!(table.rows[0].season, None);
        assert_eq!(table.rows[1].season, Some(1997));
        assert_eq!(table.rows[2].season, None);
    }

    #[test]
    fn empty_team_is_missing() {
        let table = load("A,PG,1997,,30,1,2,0.5,0.5,15,1,1,0,3");
        assert_eq!(table.rows[0].team_id, None);
        assert_eq!(table.rows[0].key(), None);
    }

    #[test]
    fn key_requires_season_and_team() {
        let table = load("A,PG,1997,bos,30,1,2,0.5,0.5,15,1,1,0,3");
        assert_eq!(table.rows[0].key(), Some((1997, "bos")));
    }

    #[test]
    fn short_rows_kept_with_missing_trailing_values() {
        let table = load(
            "Valid,PG,1997,BOS,30,1,2,0.5,0.5,15,1,1,0,3\n\
             Short,PG,1997,BOS,20,2,4\n\
             Keyless,PG,1997",
        );
        assert_eq!(table.len(), 3);

        let short = &table.rows[1];
        assert_eq!(short.key(), Some((1997, "BOS")));
        assert_eq!(short.fg3_per_g, Some(2.0));
        assert_eq!(short.fg3a_per_g, Some(4.0));
        assert_eq!(short.fg3_pct, None);
        assert_eq!(short.ws, None);
        assert_eq!(short.raw.len(), table.headers.len());

        assert_eq!(table.rows[2].team_id, None);
        assert_eq!(table.rows[2].key(), None);
    }

    #[test]
    fn rows_wider_than_header_skipped() {
        let table = load(
            "Valid,PG,1997,BOS,30,1,2,0.5,0.5,15,1,1,0,3\n\
             Wide,PG,1997,BOS,30,1,2,0.5,0.5,15,1,1,0,3,extra\n\
             Also Valid,SF,1998,NYK,31,1,2,0.4,0.5,14,0,0,0,2",
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].player.as_deref(), Some("Also Valid"));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let csv_data = "player,season,team_id\nA,1997,BOS";
        let err = load_from_reader(csv_data.as_bytes(), "test").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Schema {
                source: SchemaError::MissingColumn("mp_per_g"),
                ..
            }
        ));
    }

    #[test]
    fn existing_champion_column_discarded() {
        let csv_data = format!(
            "{HEADER},champion\nA,PG,1996,CHI,30,1,2,0.5,0.5,15,1,1,0,3,True"
        );
        let table = load_from_reader(csv_data.as_bytes(), "test").unwrap();
        assert_eq!(table.headers.len(), 14);
        assert_eq!(table.rows[0].raw.len(), 14);
        assert!(!table.rows[0].champion);
    }

    #[test]
    fn header_only_csv_is_empty_table() {
        let table = load_from_reader(HEADER.as_bytes(), "test").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_table(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn parse_number_rejects_garbage_and_infinity() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(" 1.5 "), Some(1.5));
    }
}
