//! LLM instructions generated from the rubric table.
//!
//! The response template lists exactly the keys `Rubric::validate` expects, so
//! the prompt and the validator share one source of truth.

use std::fmt::Write as _;

use super::rubric::{Rubric, ScoringMode};

pub const SYSTEM_PROMPT: &str = "You are a quality-assurance analyst for a debt collection call \
centre. You evaluate call transcripts against a fixed rubric and answer with a single JSON \
object and nothing else.";

/// Rubric section of the analysis instructions.
pub fn rubric_prompt(rubric: &Rubric) -> String {
    let mut out = String::new();

    out.push_str("Score the call on each parameter below.\n\n");
    for (index, parameter) in rubric.parameters().iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} (key: \"{}\", weight {}, {}): {}. Score must be {}.",
            index + 1,
            parameter.name,
            parameter.key,
            parameter.weight,
            parameter.mode.label(),
            parameter.description,
            parameter.mode.rule(parameter.weight),
        );
    }

    let _ = write!(
        out,
        "\nScoring rules:\n\
         - {} parameters are all-or-nothing: award 0 or the full weight, never a value in between.\n\
         - {} parameters take any whole number from 0 up to the weight.\n\
         - Every key must be present exactly once. Do not add keys.\n\
         - The maximum total is {}.\n",
        ScoringMode::PassFail.label(),
        ScoringMode::Score.label(),
        rubric.total_possible_score(),
    );

    out.push_str("\nRespond with JSON in exactly this shape:\n");
    out.push_str(&response_template(rubric));
    out
}

/// JSON skeleton of the expected response, with each score slot naming its rule.
pub fn response_template(rubric: &Rubric) -> String {
    let mut out = String::from("{\n  \"scores\": {\n");
    let count = rubric.len();
    for (index, parameter) in rubric.parameters().iter().enumerate() {
        let separator = if index + 1 == count { "" } else { "," };
        let _ = writeln!(
            out,
            "    \"{}\": <{}>{}",
            parameter.key,
            parameter.mode.rule(parameter.weight),
            separator
        );
    }
    out.push_str("  },\n");
    out.push_str("  \"overallFeedback\": \"<two or three sentences on the agent's performance>\",\n");
    out.push_str("  \"observation\": \"<notable customer behaviour and missed steps>\"\n");
    out.push_str("}\n");
    out
}

/// Full user message: rubric instructions followed by the transcript.
pub fn analysis_prompt(rubric: &Rubric, transcript: &str) -> String {
    let mut out = rubric_prompt(rubric);
    out.push_str("\nCall transcript:\n\"\"\"\n");
    out.push_str(transcript.trim());
    out.push_str("\n\"\"\"\n");
    out
}
