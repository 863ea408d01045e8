use std::collections::BTreeSet;

use serde::Serialize;

/// How a parameter may be scored by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoringMode {
    /// Only `0` or the full weight.
    PassFail,
    /// Any integer in `0..=weight`.
    Score,
}

impl ScoringMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PassFail => "PASS_FAIL",
            Self::Score => "SCORE",
        }
    }

    /// Human-readable statement of the values this mode accepts for `weight`.
    pub fn rule(self, weight: u32) -> String {
        match self {
            Self::PassFail => format!("either 0 or {weight}"),
            Self::Score => format!("an integer from 0 to {weight}"),
        }
    }
}

/// A single weighted entry of the call evaluation rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub key: &'static str,
    pub name: &'static str,
    pub weight: u32,
    pub description: &'static str,
    #[serde(rename = "scoringMode")]
    pub mode: ScoringMode,
}

impl Parameter {
    /// Whether `score` is an acceptable value for this parameter.
    pub fn accepts(&self, score: i64) -> bool {
        match self.mode {
            ScoringMode::PassFail => score == 0 || score == i64::from(self.weight),
            ScoringMode::Score => (0..=i64::from(self.weight)).contains(&score),
        }
    }
}

const CANONICAL_PARAMETERS: [Parameter; 10] = [
    Parameter {
        key: "greeting",
        name: "Greeting",
        weight: 5,
        description: "Call opening within 5 seconds",
        mode: ScoringMode::PassFail,
    },
    Parameter {
        key: "collectionUrgency",
        name: "Collection Urgency",
        weight: 15,
        description: "Create urgency, cross-questioning",
        mode: ScoringMode::Score,
    },
    Parameter {
        key: "rebuttalCustomerHandling",
        name: "Rebuttal Handling",
        weight: 15,
        description: "Address penalties, objections",
        mode: ScoringMode::Score,
    },
    Parameter {
        key: "callEtiquette",
        name: "Call Etiquette",
        weight: 15,
        description: "Tone, empathy, clear speech",
        mode: ScoringMode::Score,
    },
    Parameter {
        key: "callDisclaimer",
        name: "Call Disclaimer",
        weight: 5,
        description: "Take permission before ending",
        mode: ScoringMode::PassFail,
    },
    Parameter {
        key: "correctDisposition",
        name: "Correct Disposition",
        weight: 10,
        description: "Use correct category with remark",
        mode: ScoringMode::PassFail,
    },
    Parameter {
        key: "callClosing",
        name: "Call Closing",
        weight: 5,
        description: "Thank the customer properly",
        mode: ScoringMode::PassFail,
    },
    Parameter {
        key: "fatalIdentification",
        name: "Identification",
        weight: 5,
        description: "Missing agent/customer info",
        mode: ScoringMode::PassFail,
    },
    Parameter {
        key: "fatalTapeDiscloser",
        name: "Tape Disclosure",
        weight: 10,
        description: "Inform customer about recording",
        mode: ScoringMode::PassFail,
    },
    Parameter {
        key: "fatalToneLanguage",
        name: "Tone & Language",
        weight: 15,
        description: "No abusive or threatening speech",
        mode: ScoringMode::PassFail,
    },
];

static CANONICAL: Rubric = Rubric {
    parameters: &CANONICAL_PARAMETERS,
};

/// Ordered, immutable table of evaluation parameters.
///
/// The order of the table is the display order and the summation order. The
/// canonical rubric lives in a `static` and is handed out by reference, so
/// every validation call shares one table.
#[derive(Debug, PartialEq, Eq)]
pub struct Rubric {
    parameters: &'static [Parameter],
}

impl Rubric {
    /// The ten-parameter call quality rubric (95 points total).
    pub fn canonical() -> &'static Rubric {
        &CANONICAL
    }

    /// Build a rubric from a custom table, rejecting empty tables, duplicate
    /// keys, and zero weights.
    pub fn new(parameters: &'static [Parameter]) -> Result<Self, RubricError> {
        if parameters.is_empty() {
            return Err(RubricError::Empty);
        }

        let mut seen = BTreeSet::new();
        for parameter in parameters {
            if parameter.weight == 0 {
                return Err(RubricError::ZeroWeight {
                    key: parameter.key.to_string(),
                });
            }
            if !seen.insert(parameter.key) {
                return Err(RubricError::DuplicateKey {
                    key: parameter.key.to_string(),
                });
            }
        }

        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &'static [Parameter] {
        self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Sum of every parameter weight.
    pub fn total_possible_score(&self) -> u32 {
        self.parameters.iter().map(|parameter| parameter.weight).sum()
    }

    /// Metadata for a single parameter, used when rendering a score row.
    pub fn describe(&self, key: &str) -> Result<&'static Parameter, RubricError> {
        self.parameters
            .iter()
            .find(|parameter| parameter.key == key)
            .ok_or_else(|| RubricError::NotFound {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parameters.iter().any(|parameter| parameter.key == key)
    }
}

/// Errors raised while building or querying a rubric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RubricError {
    #[error("no rubric parameter named '{key}'")]
    NotFound { key: String },
    #[error("rubric must contain at least one parameter")]
    Empty,
    #[error("rubric parameter '{key}' appears more than once")]
    DuplicateKey { key: String },
    #[error("rubric parameter '{key}' must carry a positive weight")]
    ZeroWeight { key: String },
    #[error("score set was validated against a different rubric")]
    ForeignScoreSet,
}
