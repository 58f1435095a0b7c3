// Column schema for the player-season CSV, resolved once at load time.

use csv::StringRecord;
use thiserror::Error;

pub const TEAM_ID: &str = "team_id";
pub const SEASON: &str = "season";
pub const PLAYER: &str = "player";
pub const MP_PER_G: &str = "mp_per_g";
pub const FG3_PER_G: &str = "fg3_per_g";
pub const FG3A_PER_G: &str = "fg3a_per_g";
pub const FG3_PCT: &str = "fg3_pct";
pub const TS_PCT: &str = "ts_pct";
pub const PER: &str = "per";
pub const BPM: &str = "bpm";
pub const OBPM: &str = "obpm";
pub const DBPM: &str = "dbpm";
pub const WS: &str = "ws";

/// Derived column appended by the cleaner.
pub const CHAMPION: &str = "champion";

/// Every column the analyses read. Any other input column is carried
/// through untouched.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    TEAM_ID, SEASON, PLAYER, MP_PER_G, FG3_PER_G, FG3A_PER_G, FG3_PCT, TS_PCT, PER, BPM, OBPM,
    DBPM, WS,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub team_id: usize,
    pub season: usize,
    pub player: usize,
    pub mp_per_g: usize,
    pub fg3_per_g: usize,
    pub fg3a_per_g: usize,
    pub fg3_pct: usize,
    pub ts_pct: usize,
    pub per: usize,
    pub bpm: usize,
    pub obpm: usize,
    pub dbpm: usize,
    pub ws: usize,
}

impl ColumnIndex {
    /// Locate every required column in `headers`, failing on the first one
    /// that is absent. Header names are matched after trimming.
    pub fn resolve(headers: &StringRecord) -> Result<Self, SchemaError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(SchemaError::MissingColumn(name))
        };
        Ok(ColumnIndex {
            team_id: find(TEAM_ID)?,
            season: find(SEASON)?,
            player: find(PLAYER)?,
            mp_per_g: find(MP_PER_G)?,
            fg3_per_g: find(FG3_PER_G)?,
            fg3a_per_g: find(FG3A_PER_G)?,
            fg3_pct: find(FG3_PCT)?,
            ts_pct: find(TS_PCT)?,
            per: find(PER)?,
            bpm: find(BPM)?,
            obpm: find(OBPM)?,
            dbpm: find(DBPM)?,
            ws: find(WS)?,
        })
    }
}

/// Position of a previously derived champion column, if the input already
/// carries one (e.g. a cleaned file fed back in).
pub fn champion_position(headers: &StringRecord) -> Option<usize> {
    headers.iter().position(|h| h.trim() == CHAMPION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
