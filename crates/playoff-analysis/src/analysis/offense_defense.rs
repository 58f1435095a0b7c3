// Offense vs defense: BPM/WS correlation and the OBPM/DBPM split between
// champion and non-champion rows.

use serde::Serialize;
use tracing::info;

use crate::data::table::SeasonTable;
use crate::stats::{mean_present, pearson, round_to};

/// Mean offensive and defensive box plus-minus for one subset, 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BpmSplit {
    pub rows: usize,
    pub obpm: Option<f64>,
    pub dbpm: Option<f64>,
}

/// Which side of the ball champion rows lean toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "edge", content = "margin", rename_all = "snake_case")]
pub enum Verdict {
    /// Champion DBPM exceeds OBPM by the margin.
    Defensive(f64),
    /// Champion OBPM exceeds DBPM by the margin.
    Offensive(f64),
    Balanced,
    /// No champion rows carry both means.
    Undetermined,
}

impl Verdict {
    fn from_split(split: &BpmSplit) -> Self {
        let (Some(obpm), Some(dbpm)) = (split.obpm, split.dbpm) else {
            return Verdict::Undetermined;
        };
        if dbpm > obpm {
            Verdict::Defensive(dbpm - obpm)
        } else if obpm > dbpm {
            Verdict::Offensive(obpm - dbpm)
        } else {
            Verdict::Balanced
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OffenseDefenseSummary {
    /// corr(BPM, WS), missing values as zero, 4 decimals.
    pub bpm_vs_ws: Option<f64>,
    pub champion: BpmSplit,
    pub non_champion: BpmSplit,
    pub verdict: Verdict,
}

fn split(table: &SeasonTable, champion: bool) -> BpmSplit {
    let rows: Vec<_> = table.rows.iter().filter(|r| r.champion == champion).collect();
    BpmSplit {
        rows: rows.len(),
        obpm: mean_present(rows.iter().map(|r| r.obpm)).map(|m| round_to(m, 4)),
        dbpm: mean_present(rows.iter().map(|r| r.dbpm)).map(|m| round_to(m, 4)),
    }
}

/// Compare offensive and defensive contribution on a cleaned table.
pub fn analyze(table: &SeasonTable) -> OffenseDefenseSummary {
    let bpm: Vec<f64> = table.rows.iter().map(|r| r.bpm.unwrap_or(0.0)).collect();
    let ws: Vec<f64> = table.rows.iter().map(|r| r.ws.unwrap_or(0.0)).collect();
    let bpm_vs_ws = pearson(&bpm, &ws).map(|r| round_to(r, 4));

    let champion = split(table, true);
    let non_champion = split(table, false);
    let verdict = Verdict::from_split(&champion);
    info!(
        "Offense/defense: {} champion rows, {} others, verdict {:?}",
        champion.rows, non_champion.rows, verdict
    );

    OffenseDefenseSummary {
        bpm_vs_ws,
        champion,
        non_champion,
        verdict,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
