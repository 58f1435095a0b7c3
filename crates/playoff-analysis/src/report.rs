// Console rendering of the pipeline report.

use std::fmt;

use crate::analysis::offense_defense::{OffenseDefenseSummary, Verdict};
use crate::pipeline::{CleaningReport, PipelineReport, StarReport, ThreePointReport};

/// Width of the rule printed between steps.
const RULE_WIDTH: usize = 50;

/// An optional statistic; undefined values print as `n/a`.
struct Stat(Option<f64>);

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "Data cleaned and saved: {}", self.saved_to.display())?;
        write!(
            f,
            "Rows kept: {} of {} ({} missing team/season, {} before season floor, {} on champion teams)",
            s.output_rows, s.input_rows, s.missing_keys, s.before_min_season, s.champion_rows
        )
    }
}

impl fmt::Display for ThreePointReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "3PT CSV files saved:")?;
        for path in &self.saved_to {
            writeln!(f, "  {}", path.display())?;
        }
        writeln!(f, "Correlation (3PT Makes vs WS): {}", Stat(s.makes_vs_ws))?;
        writeln!(f, "Correlation (TS% vs 3PT%): {}", Stat(s.ts_vs_3p))?;
        writeln!(
            f,
            "High-volume shooters (champ avg 3P%): {}",
            Stat(s.high_volume_champion_pct)
        )?;
        write!(
            f,
            "High-volume shooters (non-champ avg 3P%): {}",
            Stat(s.high_volume_non_champion_pct)
        )
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Defensive(margin) => write!(
                f,
                "Defense > Offense by {margin:.2} -> defensive edge in champions."
            ),
            Verdict::Offensive(margin) => write!(
                f,
                "Offense > Defense by {margin:.2} -> offensive edge in champions."
            ),
            Verdict::Balanced => f.write_str("Balanced OBPM and DBPM -> both matter equally."),
            Verdict::Undetermined => f.write_str("No champion OBPM/DBPM data -> no verdict."),
        }
    }
}

impl fmt::Display for OffenseDefenseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Correlation BPM vs WS: {}", Stat(self.bpm_vs_ws))?;
        writeln!(
            f,
            "Champ OBPM={}, DBPM={}",
            Stat(self.champion.obpm),
            Stat(self.champion.dbpm)
        )?;
        writeln!(
            f,
            "Non-Champ OBPM={}, DBPM={}",
            Stat(self.non_champion.obpm),
            Stat(self.non_champion.dbpm)
        )?;
        write!(f, "{}", self.verdict)
    }
}

impl fmt::Display for StarReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Star Player Influence CSV saved: {}", self.saved_to.display())?;
        writeln!(
            f,
            "Championship Rate of Stars: {:.1}%",
            s.championship_rate * 100.0
        )?;
        writeln!(
            f,
            "Champion Stars Avg Composite: {}",
            Stat(s.champion_avg_composite)
        )?;
        write!(
            f,
            "Non-Champion Stars Avg Composite: {}",
            Stat(s.non_champion_avg_composite)
        )
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(f, "{}", self.cleaning)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", self.three_point)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", self.offense_defense)?;
        writeln!(f, "{rule}")?;
        write!(f, "{}", self.star_influence)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
