use crate::scoring::{Rubric, ScoreSet};

pub(super) fn rubric() -> &'static Rubric {
    Rubric::canonical()
}

/// Sample analysis scores: 72 of 95, disclaimer and tape disclosure missed.
pub(super) fn sample_scores() -> ScoreSet {
    ScoreSet::from_iter([
        ("greeting", 5),
        ("collectionUrgency", 12),
        ("rebuttalCustomerHandling", 10),
        ("callEtiquette", 10),
        ("callDisclaimer", 0),
        ("correctDisposition", 10),
        ("callClosing", 5),
        ("fatalIdentification", 5),
        ("fatalTapeDiscloser", 0),
        ("fatalToneLanguage", 15),
    ])
}

pub(super) fn perfect_scores() -> ScoreSet {
    rubric()
        .parameters()
        .iter()
        .map(|parameter| (parameter.key, i64::from(parameter.weight)))
        .collect()
}

pub(super) fn zero_scores() -> ScoreSet {
    rubric()
        .parameters()
        .iter()
        .map(|parameter| (parameter.key, 0))
        .collect()
}

pub(super) fn with_score(key: &str, score: i64) -> ScoreSet {
    let mut scores = sample_scores();
    scores.insert(key, score);
    scores
}
