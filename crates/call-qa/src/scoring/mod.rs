//! Call evaluation rubric, score validation, and aggregation.

mod aggregate;
pub mod prompt;
mod rubric;
mod validation;

#[cfg(test)]
mod tests;

pub use aggregate::{ScoreRow, ScoreTotals};
pub use rubric::{Parameter, Rubric, RubricError, ScoringMode};
pub use validation::{
    ParameterScore, ScoreSet, ValidatedScoreSet, ValidationError, ValidationErrorKind,
};
