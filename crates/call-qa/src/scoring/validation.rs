use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rubric::{Parameter, Rubric, ScoringMode};

/// Untrusted mapping from parameter key to submitted score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSet(BTreeMap<String, i64>);

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, score: i64) -> Option<i64> {
        self.0.insert(key.into(), score)
    }

    pub fn remove(&mut self, key: &str) -> Option<i64> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Read scores out of an arbitrary JSON value produced by an upstream
    /// generator. Only integer values are accepted; `5.0` counts as `5`.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or_else(|| ValidationError {
            kind: ValidationErrorKind::NotAnInteger,
            key: None,
            detail: format!("scores must be a JSON object, found {}", json_type(value)),
        })?;

        let mut scores = BTreeMap::new();
        for (key, raw) in object {
            let score = integer_value(raw).ok_or_else(|| ValidationError {
                kind: ValidationErrorKind::NotAnInteger,
                key: Some(key.clone()),
                detail: format!("score for '{key}' must be an integer, found {raw}"),
            })?;
            scores.insert(key.clone(), score);
        }

        Ok(Self(scores))
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, score)| (key.into(), score)).collect())
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    let float = number.as_f64()?;
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float <= i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A score attached to the rubric parameter it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterScore {
    pub parameter: &'static Parameter,
    pub score: u32,
}

/// Scores that passed [`Rubric::validate`], held in rubric order.
///
/// There is no public constructor: the only way to obtain one is through
/// validation, which is what lets aggregation skip every range check. The set
/// remembers the table it was checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedScoreSet {
    table: &'static [Parameter],
    scores: Vec<ParameterScore>,
}

impl ValidatedScoreSet {
    /// Parameter table of the rubric that validated this set.
    pub fn parameters(&self) -> &'static [Parameter] {
        self.table
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterScore> {
        self.scores.iter()
    }

    pub fn score_for(&self, key: &str) -> Option<u32> {
        self.scores
            .iter()
            .find(|entry| entry.parameter.key == key)
            .map(|entry| entry.score)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Back to the plain key/score mapping, e.g. for echoing to clients.
    pub fn to_score_set(&self) -> ScoreSet {
        self.scores
            .iter()
            .map(|entry| (entry.parameter.key, i64::from(entry.score)))
            .collect()
    }
}

impl Rubric {
    /// Check a submitted score set against this rubric.
    ///
    /// Parameters are checked in rubric order; keys the rubric does not know
    /// are reported afterwards. The first violation is returned and nothing
    /// is clamped or corrected.
    pub fn validate(&self, scores: &ScoreSet) -> Result<ValidatedScoreSet, ValidationError> {
        let mut validated = Vec::with_capacity(self.len());

        for parameter in self.parameters() {
            let score = scores
                .get(parameter.key)
                .ok_or_else(|| ValidationError::missing(parameter))?;
            validated.push(check_score(parameter, score)?);
        }

        if let Some(unknown) = scores.keys().find(|key| !self.contains(key)) {
            return Err(ValidationError {
                kind: ValidationErrorKind::UnknownKey,
                key: Some(unknown.to_string()),
                detail: format!("'{unknown}' is not a rubric parameter"),
            });
        }

        Ok(ValidatedScoreSet {
            table: self.parameters(),
            scores: validated,
        })
    }
}

fn check_score(
    parameter: &'static Parameter,
    score: i64,
) -> Result<ParameterScore, ValidationError> {
    if parameter.accepts(score) {
        // accepts() bounds the score to 0..=weight
        let score = u32::try_from(score).unwrap_or_default();
        return Ok(ParameterScore { parameter, score });
    }

    let kind = match parameter.mode {
        ScoringMode::PassFail => ValidationErrorKind::InvalidPassFailValue,
        ScoringMode::Score => ValidationErrorKind::OutOfRange,
    };

    Err(ValidationError {
        kind,
        key: Some(parameter.key.to_string()),
        detail: format!(
            "{} ({}) scored {score}, expected {}",
            parameter.name,
            parameter.key,
            parameter.mode.rule(parameter.weight)
        ),
    })
}

/// Category of a score-set validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingKey,
    UnknownKey,
    OutOfRange,
    InvalidPassFailValue,
    NotAnInteger,
}

impl ValidationErrorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key",
            Self::UnknownKey => "unknown_key",
            Self::OutOfRange => "out_of_range",
            Self::InvalidPassFailValue => "invalid_pass_fail_value",
            Self::NotAnInteger => "not_an_integer",
        }
    }
}

// Serialized as its label, the same tag API clients see in error bodies.
impl Serialize for ValidationErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// First violation found while validating a score set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub key: Option<String>,
    pub detail: String,
}

impl ValidationError {
    fn missing(parameter: &Parameter) -> Self {
        Self {
            kind: ValidationErrorKind::MissingKey,
            key: Some(parameter.key.to_string()),
            detail: format!("no score submitted for '{}'", parameter.key),
        }
    }
}
