//! Pure transformation of a [`GradedResult`] into a renderable shape.
//!
//! Total by construction: any structurally valid result, down to an
//! attempt id with nothing else, produces a view model with safe
//! defaults rather than an error.

use crate::api::types::GradedResult;

/// Three-band classification of a 0..10 score. The same rule applies
/// to the overall score and to each criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScoreBand {
    /// Score >= 8.
    Favorable,
    /// 6 <= score < 8.
    Neutral,
    /// Score < 6.
    Unfavorable,
}

impl ScoreBand {
    pub(crate) fn classify(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::Favorable
        } else if score >= 6.0 {
            ScoreBand::Neutral
        } else {
            ScoreBand::Unfavorable
        }
    }

    /// Display name for terminal rendering.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            ScoreBand::Favorable => "favorable",
            ScoreBand::Neutral => "neutral",
            ScoreBand::Unfavorable => "unfavorable",
        }
    }
}

/// One per-criterion score bar.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreBar {
    /// Criterion name with underscores turned into spaces.
    pub label: String,
    /// Score rendered as "value/10".
    pub display: String,
    /// Bar width as a percentage, `value * 10` clamped to 0..=100.
    pub width_pct: u8,
    /// Color band for the bar.
    pub band: ScoreBand,
}

/// Renderable view of a graded attempt. Empty collections and `None`
/// fields mean the section is omitted, never rendered as a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResultView {
    /// Attempt id, always present.
    pub attempt_id: i64,
    /// Overall score formatted to one decimal, or "N/A" when absent.
    pub score_display: String,
    /// Band of the overall score; `None` when the score is absent.
    pub score_band: Option<ScoreBand>,
    /// Prose summary, omitted when absent or blank.
    pub summary: Option<String>,
    /// Per-criterion bars in stable (alphabetical) order.
    pub bars: Vec<ScoreBar>,
    /// Strengths list; empty means the section is omitted.
    pub strengths: Vec<String>,
    /// Improvements list; empty means the section is omitted.
    pub improvements: Vec<String>,
    /// Transcript of the spoken answer, omitted when absent or blank.
    pub transcript: Option<String>,
}

/// Build the view model for a graded attempt. Never fails.
pub(crate) fn present(result: &GradedResult) -> ResultView {
    let score_display = match result.score {
        Some(score) => format!("{:.1}", score),
        None => "N/A".to_string(),
    };
    let score_band = result.score.map(ScoreBand::classify);

    let feedback = result.feedback.clone().unwrap_or_default();

    let bars = feedback
        .scores
        .iter()
        .map(|(criterion, &value)| ScoreBar {
            label: criterion.replace('_', " "),
            display: format_criterion(value),
            width_pct: (value * 10.0).clamp(0.0, 100.0).round() as u8,
            band: ScoreBand::classify(value),
        })
        .collect();

    ResultView {
        attempt_id: result.id,
        score_display,
        score_band,
        summary: non_blank(feedback.summary),
        bars,
        strengths: feedback.strengths,
        improvements: feedback.improvements,
        transcript: non_blank(result.transcript.clone()),
    }
}

fn format_criterion(value: f64) -> String {
    if (value - value.round()).abs() < f64::EPSILON {
        format!("{}/10", value.round() as i64)
    } else {
        format!("{:.1}/10", value)
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
