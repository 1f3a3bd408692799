//! Output formatters for screening results

use crate::batch::{AnalysisBatch, ScreeningOutcome};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::ranking::{self, Comparison};
use crate::scoring::aggregator::CandidateResult;
use colored::Colorize;
use serde_json::json;

/// Snapshot view of one completed batch, ready for rendering.
pub struct ScreeningReport<'a> {
    batch: &'a AnalysisBatch,
    ranked: Vec<&'a CandidateResult>,
    comparison: Option<Comparison>,
    detailed: bool,
}

impl<'a> ScreeningReport<'a> {
    pub fn new(batch: &'a AnalysisBatch, detailed: bool) -> Self {
        Self {
            batch,
            ranked: ranking::rank(batch),
            comparison: ranking::compare(batch).ok(),
            detailed,
        }
    }
}

pub fn render(report: &ScreeningReport<'_>, format: &OutputFormat, color: bool) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(render_console(report, color)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Markdown => Ok(render_markdown(report)),
    }
}

/// Color band for the final score; mirrors the dashboard's threshold
/// styling, which assumes the documented aggregation formula.
fn score_band(score: f32) -> &'static str {
    if score >= 70.0 {
        "strong"
    } else if score >= 40.0 {
        "fair"
    } else {
        "weak"
    }
}

fn paint(score: f32, text: String, color: bool) -> String {
    if !color {
        return text;
    }
    match score_band(score) {
        "strong" => text.green().bold().to_string(),
        "fair" => text.yellow().to_string(),
        _ => text.red().to_string(),
    }
}

fn render_console(report: &ScreeningReport<'_>, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Screening of {} candidates (backend {})\n",
        report.batch.len(),
        report.batch.backend_version
    ));

    for (position, result) in report.ranked.iter().enumerate() {
        let line = format!(
            "{:>3}. {:<30} {:>6.2}",
            position + 1,
            result.candidate_id,
            result.final_score
        );
        out.push_str(&paint(result.final_score, line, color));
        out.push('\n');

        if report.detailed {
            for score in &result.scores {
                out.push_str(&format!(
                    "       {:<12} {:>5.1}  {}\n",
                    score.criterion.to_string(),
                    score.value,
                    score.justification
                ));
            }
            out.push_str(&format!("       {}\n", result.critical_analysis));
        }
    }

    let failures: Vec<String> = report
        .batch
        .entries
        .iter()
        .filter_map(|entry| match &entry.outcome {
            ScreeningOutcome::Failed(reason) => {
                Some(format!("  ✗ {} — {}", entry.candidate_id, reason))
            }
            ScreeningOutcome::Scored(_) => None,
        })
        .collect();
    if !failures.is_empty() {
        out.push_str("\nNot scored:\n");
        for line in failures {
            if color {
                out.push_str(&line.red().to_string());
            } else {
                out.push_str(&line);
            }
            out.push('\n');
        }
    }

    if let Some(comparison) = &report.comparison {
        out.push_str(&format!(
            "\nComparison: {} vs {}\n",
            comparison.left_id, comparison.right_id
        ));
        for row in &comparison.rows {
            out.push_str(&format!(
                "  {:<12} {:>5.1} | {:>5.1}\n",
                row.criterion.to_string(),
                row.left,
                row.right
            ));
        }
    }

    out
}

fn render_json(report: &ScreeningReport<'_>) -> Result<String> {
    let value = json!({
        "job_description": report.batch.job_description,
        "backend_version": report.batch.backend_version,
        "created_at": report.batch.created_at,
        "entries": report.batch.entries,
        "ranking": report.ranked.iter().map(|r| &r.candidate_id).collect::<Vec<_>>(),
        "comparison": report.comparison,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn render_markdown(report: &ScreeningReport<'_>) -> String {
    let mut out = String::new();
    out.push_str("# Screening results\n\n");
    out.push_str("| # | Candidate | Final score | Band |\n");
    out.push_str("|---|-----------|-------------|------|\n");
    for (position, result) in report.ranked.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            position + 1,
            result.candidate_id,
            result.final_score,
            score_band(result.final_score)
        ));
    }

    if report.detailed {
        for result in &report.ranked {
            out.push_str(&format!("\n## {}\n\n", result.candidate_id));
            for score in &result.scores {
                out.push_str(&format!(
                    "- **{}** ({:.1}): {}\n",
                    score.criterion, score.value, score.justification
                ));
            }
            out.push_str(&format!("\n{}\n", result.critical_analysis));
        }
    }

    if let Some(comparison) = &report.comparison {
        out.push_str(&format!(
            "\n## Comparison: {} vs {}\n\n",
            comparison.left_id, comparison.right_id
        ));
        out.push_str(&format!(
            "| Criterion | {} | {} |\n|---|---|---|\n",
            comparison.left_id, comparison.right_id
        ));
        for row in &comparison.rows {
            out.push_str(&format!(
                "| {} | {:.1} | {:.1} |\n",
                row.criterion, row.left, row.right
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{CandidateEntry, FailureReason};
    use crate::ranking::SelectionSet;
    use crate::scoring::criterion::{CriterionKey, CriterionScore};
    use chrono::Utc;

    fn sample_batch() -> AnalysisBatch {
        let result = |id: &str, final_score: f32| CandidateResult {
            candidate_id: id.to_string(),
            scores: CriterionKey::ALL
                .iter()
                .map(|k| {
                    let value = if k.is_penalty() { -1.0 } else { 7.0 };
                    CriterionScore::new(*k, value, format!("evidence for {}", k)).unwrap()
                })
                .collect(),
            final_score,
            critical_analysis: "summary".to_string(),
            scored_at: Utc::now(),
        };
        AnalysisBatch {
            job_description: "Senior Java role".to_string(),
            backend_version: "keyword-overlap/1.0".to_string(),
            entries: vec![
                CandidateEntry {
                    candidate_id: "a.pdf".to_string(),
                    outcome: ScreeningOutcome::Scored(result("a.pdf", 42.0)),
                },
                CandidateEntry {
                    candidate_id: "broken.pdf".to_string(),
                    outcome: ScreeningOutcome::Failed(FailureReason::ExtractionEmpty),
                },
                CandidateEntry {
                    candidate_id: "b.pdf".to_string(),
                    outcome: ScreeningOutcome::Scored(result("b.pdf", 71.0)),
                },
            ],
            selection: SelectionSet::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn console_output_lists_ranking_and_failures() {
        let batch = sample_batch();
        let report = ScreeningReport::new(&batch, false);
        let out = render(&report, &OutputFormat::Console, false).unwrap();
        let b_pos = out.find("b.pdf").unwrap();
        let a_pos = out.find("a.pdf").unwrap();
        assert!(b_pos < a_pos, "higher score should print first");
        assert!(out.contains("broken.pdf"));
        assert!(out.contains("empty"));
    }

    #[test]
    fn json_output_round_trips() {
        let batch = sample_batch();
        let report = ScreeningReport::new(&batch, false);
        let out = render(&report, &OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["entries"].as_array().unwrap().len(), 3);
        assert_eq!(value["ranking"][0], "b.pdf");
        assert!(value["comparison"].is_null());
    }

    #[test]
    fn markdown_output_has_ranked_table() {
        let batch = sample_batch();
        let report = ScreeningReport::new(&batch, true);
        let out = render(&report, &OutputFormat::Markdown, false).unwrap();
        assert!(out.contains("| 1 | b.pdf | 71.00 | strong |"));
        assert!(out.contains("| 2 | a.pdf | 42.00 | fair |"));
    }
}
