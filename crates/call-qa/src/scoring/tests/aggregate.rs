use super::common::*;
use crate::scoring::{ScoreTotals, ScoringMode, ValidationErrorKind};

#[test]
fn sample_scores_aggregate_to_seventy_two() {
    let validated = rubric().validate(&sample_scores()).expect("valid");
    let totals = rubric().aggregate(&validated).expect("same rubric");

    assert_eq!(
        totals,
        ScoreTotals {
            achieved: 72,
            possible: 95
        }
    );
}

#[test]
fn disclaimer_of_three_blocks_aggregation() {
    let scores = with_score("callDisclaimer", 3);

    let totals = rubric()
        .validate(&scores)
        .map(|validated| validated.totals());

    match totals {
        Err(error) => {
            assert_eq!(error.kind, ValidationErrorKind::InvalidPassFailValue);
            assert_eq!(error.key.as_deref(), Some("callDisclaimer"));
        }
        Ok(totals) => panic!("expected validation failure, aggregated {totals:?}"),
    }
}

#[test]
fn totals_are_bounded_by_rubric() {
    let perfect = rubric().validate(&perfect_scores()).expect("valid");
    let zero = rubric().validate(&zero_scores()).expect("valid");

    assert_eq!(perfect.totals().achieved, 95);
    assert_eq!(zero.totals().achieved, 0);
    assert_eq!(zero.totals().percentage(), 0.0);
    assert_eq!(perfect.totals().percentage(), 100.0);
}

#[test]
fn achieved_is_sum_of_submitted_scores() {
    for urgency in [0, 7, 15] {
        for etiquette in [0, 9, 15] {
            let mut scores = zero_scores();
            scores.insert("collectionUrgency", urgency);
            scores.insert("callEtiquette", etiquette);
            scores.insert("fatalTapeDiscloser", 10);

            let validated = rubric().validate(&scores).expect("valid");
            let totals = rubric().aggregate(&validated).expect("same rubric");
            assert_eq!(i64::from(totals.achieved), urgency + etiquette + 10);
            assert!(totals.achieved <= totals.possible);
        }
    }
}

#[test]
fn rows_carry_metadata_and_scores() {
    let validated = rubric().validate(&sample_scores()).expect("valid");
    let rows = validated.rows();

    assert_eq!(rows.len(), 10);
    let disclaimer = rows
        .iter()
        .find(|row| row.key == "callDisclaimer")
        .expect("row present");
    assert_eq!(disclaimer.name, "Call Disclaimer");
    assert_eq!(disclaimer.weight, 5);
    assert_eq!(disclaimer.score, 0);
    assert_eq!(disclaimer.scoring_mode, ScoringMode::PassFail);
    assert_eq!(rows[1].description, "Create urgency, cross-questioning");
}
