use tracing::warn;

use super::bands::{Band, BandEdge, BandTable};
use crate::assessment::domain::{Question, QuestionType};
use crate::assessment::narrative::{NarrativeAssessment, NarrativeScorer, ScorerConfidence};

/// Neutral score recorded when the narrative scorer is unavailable.
const NEUTRAL_FALLBACK_SCORE: f64 = 3.0;

/// Answers treated as the affirmative side of a binary question.
const POSITIVE_TOKENS: [&str; 3] = ["yes", "y", "true"];

/// Numeric interpretation of one raw answer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAnswer {
    pub score: f64,
    pub narrative: Option<NarrativeAssessment>,
}

/// Error enumeration for answers the normalizer rejects. Out-of-range and
/// unmapped values surface to the submitter instead of being clamped.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("response '{value}' to {code} is not numeric")]
    NotNumeric { code: String, value: String },
    #[error("response {value} to {code} is outside the allowed range {min}..{max}")]
    OutOfRange {
        code: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("question {code} has no scoring bands configured")]
    MissingBands { code: String },
    #[error("value {value} matches no scoring band of question {code}")]
    UnmappedValue { code: String, value: f64 },
}

/// Map a raw answer string onto the question's numeric scale.
///
/// Narrative question types delegate to the scorer, and a scorer failure is
/// data, not an error: the result is the neutral fallback flagged as
/// degraded so one bad call cannot block an assessment.
pub fn normalize_response(
    question: &Question,
    raw_value: &str,
    scorer: &dyn NarrativeScorer,
) -> Result<NormalizedAnswer, NormalizeError> {
    match question.question_type {
        QuestionType::Likert => likert(question, raw_value).map(plain),
        QuestionType::Binary => Ok(plain(binary(question, raw_value))),
        QuestionType::DataInput => data_input(question, raw_value).map(plain),
        QuestionType::MultiSelect | QuestionType::Observational => {
            Ok(narrative(question, raw_value, scorer))
        }
    }
}

fn plain(score: f64) -> NormalizedAnswer {
    NormalizedAnswer {
        score,
        narrative: None,
    }
}

fn likert(question: &Question, raw_value: &str) -> Result<f64, NormalizeError> {
    let value: f64 = raw_value
        .trim()
        .parse()
        .map_err(|_| NormalizeError::NotNumeric {
            code: question.code.clone(),
            value: raw_value.to_string(),
        })?;

    if value < question.min_score || value > question.max_score {
        return Err(NormalizeError::OutOfRange {
            code: question.code.clone(),
            value,
            min: question.min_score,
            max: question.max_score,
        });
    }

    Ok(value)
}

fn binary(question: &Question, raw_value: &str) -> f64 {
    let lowered = raw_value.trim().to_ascii_lowercase();
    if POSITIVE_TOKENS.contains(&lowered.as_str()) {
        question.max_score
    } else {
        question.min_score
    }
}

fn data_input(question: &Question, raw_value: &str) -> Result<f64, NormalizeError> {
    let trimmed = raw_value.trim().trim_end_matches('%').trim();
    let value: f64 = trimmed.parse().map_err(|_| NormalizeError::NotNumeric {
        code: question.code.clone(),
        value: raw_value.to_string(),
    })?;

    let bands = question
        .scoring_logic
        .as_ref()
        .filter(|bands| !bands.is_empty())
        .ok_or_else(|| NormalizeError::MissingBands {
            code: question.code.clone(),
        })?;

    let table = BandTable::new(
        BandEdge::Inclusive,
        bands
            .iter()
            .map(|band| Band {
                lower_bound: band.lower_bound,
                value: band.score,
            })
            .collect(),
    );

    table
        .classify(value)
        .copied()
        .ok_or(NormalizeError::UnmappedValue {
            code: question.code.clone(),
            value,
        })
}

fn narrative(
    question: &Question,
    raw_value: &str,
    scorer: &dyn NarrativeScorer,
) -> NormalizedAnswer {
    match scorer.score_text(&question.text, raw_value) {
        Ok(verdict) => NormalizedAnswer {
            score: verdict.score.clamp(question.min_score, question.max_score),
            narrative: Some(NarrativeAssessment {
                rationale: verdict.rationale,
                confidence: verdict.confidence,
                findings: verdict.findings,
                degraded: false,
            }),
        },
        Err(error) => {
            warn!(code = %question.code, %error, "narrative scorer unavailable, recording neutral fallback");
            NormalizedAnswer {
                score: NEUTRAL_FALLBACK_SCORE,
                narrative: Some(NarrativeAssessment {
                    rationale: "narrative scorer unavailable - manual review recommended"
                        .to_string(),
                    confidence: ScorerConfidence::Low,
                    findings: vec![format!("narrative scoring failed: {error}")],
                    degraded: true,
                }),
            }
        }
    }
}
