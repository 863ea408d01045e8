use crate::infra::analysis_service;
use call_qa::analysis::{AnalysisReport, AnalysisResult, AudioUpload};
use call_qa::config::AppConfig;
use call_qa::error::AppError;
use call_qa::scoring::Rubric;
use chrono::Utc;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Analysis JSON file with `scores`, `overallFeedback`, and `observation`
    pub(crate) path: PathBuf,
    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// MP3 or WAV recording of the call
    pub(crate) path: PathBuf,
    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    /// Include the transcript in the printed report
    #[arg(long)]
    pub(crate) show_transcript: bool,
}

pub(crate) fn run_rubric() {
    let rubric = Rubric::canonical();
    println!("Call evaluation rubric");
    for (index, parameter) in rubric.parameters().iter().enumerate() {
        println!(
            "{:>2}. {:<20} {:>3} pts  {:<9}  {}",
            index + 1,
            parameter.name,
            parameter.weight,
            parameter.mode.label(),
            parameter.description
        );
    }
    println!("Maximum score: {}", rubric.total_possible_score());
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { path, json } = args;

    let report = review_file(&path).await?;
    print_report(&report, json, false)
}

/// Validate a saved analysis against the canonical rubric. No provider
/// settings are involved.
pub(crate) async fn review_file(path: &Path) -> Result<AnalysisReport, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let result: AnalysisResult = serde_json::from_str(&raw)?;
    Ok(result.evaluate(Rubric::canonical(), None, Utc::now())?)
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        path,
        json,
        show_transcript,
    } = args;

    let config = AppConfig::load()?;
    let service = analysis_service(&config)?;

    let bytes = tokio::fs::read(&path).await?;
    let upload = AudioUpload::new(file_name(&path), guessed_type(&path).as_deref(), bytes)?;
    let report = service.analyze(upload).await?;

    print_report(&report, json, show_transcript)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_string())
}

fn guessed_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

fn print_report(report: &AnalysisReport, json: bool, show_transcript: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", render_report(report, show_transcript));
    }
    Ok(())
}

pub(crate) fn render_report(report: &AnalysisReport, show_transcript: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Evaluation Scores (Total: {} / {}, {:.0}%)",
        report.totals.achieved,
        report.totals.possible,
        report.totals.percentage()
    ));
    for row in &report.rows {
        lines.push(format!("- {:<20} {:>2} / {}", row.name, row.score, row.weight));
    }

    lines.push(String::new());
    lines.push(format!("Overall feedback: {}", report.overall_feedback));
    lines.push(format!("Observation: {}", report.observation));

    if show_transcript {
        if let Some(transcript) = &report.transcript {
            lines.push(String::new());
            lines.push("Transcript".to_string());
            lines.push(transcript.clone());
        }
    }

    lines.join("\n")
}
