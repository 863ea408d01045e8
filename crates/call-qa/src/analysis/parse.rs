use super::domain::AnalysisResult;
use super::service::AnalysisError;

/// Parse the LLM reply into a raw analysis.
///
/// Models sometimes wrap JSON in a markdown fence or add a sentence around
/// it, so the outermost `{ ... }` span is parsed.
pub(crate) fn parse_analysis(content: &str) -> Result<AnalysisResult, AnalysisError> {
    let body = json_span(content).ok_or_else(|| {
        AnalysisError::MalformedResponse("reply does not contain a JSON object".to_string())
    })?;

    serde_json::from_str(body).map_err(|err| AnalysisError::MalformedResponse(err.to_string()))
}

fn json_span(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}
