use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::{Rubric, ScoreRow, ScoreSet, ScoreTotals};

use super::service::AnalysisError;

/// Upload formats accepted for analysis.
const ACCEPTED_AUDIO: [&str; 5] = ["mpeg", "mp3", "wav", "x-wav", "wave"];

/// Recorded call submitted for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    /// Accepts MP3 and WAV recordings. When the client did not send a usable
    /// content type, it is guessed from the file extension.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self, AnalysisError> {
        let file_name = file_name.into();
        if bytes.is_empty() {
            return Err(AnalysisError::InvalidUpload(format!(
                "'{file_name}' is empty"
            )));
        }

        let declared = content_type
            .and_then(|raw| raw.parse::<mime::Mime>().ok())
            .filter(|mime| *mime != mime::APPLICATION_OCTET_STREAM);
        let content_type = declared
            .or_else(|| mime_guess::from_path(&file_name).first())
            .ok_or_else(|| {
                AnalysisError::InvalidUpload(format!(
                    "unable to determine the audio format of '{file_name}'"
                ))
            })?;

        if !is_supported_audio(&content_type) {
            return Err(AnalysisError::InvalidUpload(format!(
                "unsupported file type {content_type}; upload an MP3 or WAV file"
            )));
        }

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn is_supported_audio(content_type: &mime::Mime) -> bool {
    content_type.type_() == mime::AUDIO
        && ACCEPTED_AUDIO.contains(&content_type.subtype().as_str())
}

/// Text produced by the transcription provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub text: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Raw analysis as produced by the LLM, before any validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub scores: Value,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub observation: String,
}

impl AnalysisResult {
    /// Validate the scores and narrative and compute totals.
    pub fn evaluate(
        self,
        rubric: &Rubric,
        transcript: Option<Transcript>,
        analyzed_at: DateTime<Utc>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let scores = ScoreSet::from_json(&self.scores)?;
        let validated = rubric.validate(&scores)?;

        let overall_feedback = non_empty("overallFeedback", self.overall_feedback)?;
        let observation = non_empty("observation", self.observation)?;

        Ok(AnalysisReport {
            scores: validated.to_score_set(),
            rows: validated.rows(),
            totals: validated.totals(),
            overall_feedback,
            observation,
            transcript: transcript.map(|transcript| transcript.text),
            analyzed_at,
        })
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, AnalysisError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AnalysisError::EmptyNarrative { field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Validated analysis ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub scores: ScoreSet,
    pub rows: Vec<ScoreRow>,
    pub totals: ScoreTotals,
    pub overall_feedback: String,
    pub observation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}
