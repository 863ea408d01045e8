use serde::Serialize;

use super::rubric::{Rubric, RubricError, ScoringMode};
use super::validation::ValidatedScoreSet;

/// Achieved versus attainable points, rendered as "Total: achieved / possible".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreTotals {
    pub achieved: u32,
    pub possible: u32,
}

impl ScoreTotals {
    /// Share of the attainable points that were awarded, in `0.0..=100.0`.
    pub fn percentage(&self) -> f32 {
        if self.possible == 0 {
            return 0.0;
        }
        self.achieved as f32 * 100.0 / self.possible as f32
    }
}

/// One display row: parameter metadata next to the awarded score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub weight: u32,
    pub scoring_mode: ScoringMode,
    pub score: u32,
}

impl Rubric {
    /// Totals for a set this rubric validated. A set checked against a
    /// different table is rejected so `achieved` can never exceed `possible`.
    pub fn aggregate(&self, scores: &ValidatedScoreSet) -> Result<ScoreTotals, RubricError> {
        if !std::ptr::eq(self.parameters(), scores.parameters()) {
            return Err(RubricError::ForeignScoreSet);
        }
        Ok(scores.totals())
    }
}

impl ValidatedScoreSet {
    /// Achieved points against the table that validated this set.
    pub fn totals(&self) -> ScoreTotals {
        ScoreTotals {
            achieved: self.iter().map(|entry| entry.score).sum(),
            possible: self.parameters().iter().map(|parameter| parameter.weight).sum(),
        }
    }

    /// Per-parameter rows in rubric order.
    pub fn rows(&self) -> Vec<ScoreRow> {
        self.iter()
            .map(|entry| ScoreRow {
                key: entry.parameter.key,
                name: entry.parameter.name,
                description: entry.parameter.description,
                weight: entry.parameter.weight,
                scoring_mode: entry.parameter.mode,
                score: entry.score,
            })
            .collect()
    }
}
