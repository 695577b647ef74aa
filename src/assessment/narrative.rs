//! Narrative (free-text) scoring collaborators.
//!
//! The production evaluator is an external service; the trait pins its
//! contract and `KeywordNarrativeScorer` provides the in-process fallback.

use serde::{Deserialize, Serialize};

/// Confidence a narrative scorer attaches to a single verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScorerConfidence {
    High,
    Medium,
    Low,
}

/// Verdict returned by a narrative scorer for one question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeVerdict {
    pub score: f64,
    pub rationale: String,
    pub confidence: ScorerConfidence,
    pub findings: Vec<String>,
}

/// Scorer metadata kept on the stored response. The `degraded` flag keeps a
/// fallback neutral score distinguishable from a genuine low-confidence
/// judgment without string-matching the rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeAssessment {
    pub rationale: String,
    pub confidence: ScorerConfidence,
    pub findings: Vec<String>,
    pub degraded: bool,
}

/// Error enumeration for narrative scorer failures. Callers recover from
/// every variant by recording a neutral, degraded verdict.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeScorerError {
    #[error("narrative scorer timed out after {0} ms")]
    Timeout(u64),
    #[error("narrative scorer transport failed: {0}")]
    Transport(String),
    #[error("narrative scorer returned a malformed payload: {0}")]
    Malformed(String),
}

/// Pluggable free-text evaluator. Implementations must bound their own
/// latency (a hung call stalls bulk scoring, so deadlines belong inside the
/// implementation, not the caller).
pub trait NarrativeScorer: Send + Sync {
    fn score_text(
        &self,
        question_text: &str,
        response_text: &str,
    ) -> Result<NarrativeVerdict, NarrativeScorerError>;
}

const POSITIVE_MARKERS: [&str; 6] = [
    "yes",
    "implemented",
    "exists",
    "established",
    "in place",
    "documented",
];

const NEGATIVE_MARKERS: [&str; 6] = [
    "no",
    "not implemented",
    "does not exist",
    "lacking",
    "absent",
    "informal",
];

/// Keyword heuristic used when no external evaluator is wired in. Counts
/// maturity markers on each side and scores the winning polarity.
pub struct KeywordNarrativeScorer;

impl NarrativeScorer for KeywordNarrativeScorer {
    fn score_text(
        &self,
        _question_text: &str,
        response_text: &str,
    ) -> Result<NarrativeVerdict, NarrativeScorerError> {
        let lowered = response_text.to_lowercase();
        let positives = POSITIVE_MARKERS
            .iter()
            .filter(|marker| lowered.contains(*marker))
            .count();
        let negatives = NEGATIVE_MARKERS
            .iter()
            .filter(|marker| lowered.contains(*marker))
            .count();

        if positives > negatives {
            Ok(NarrativeVerdict {
                score: 5.0,
                rationale: "response describes an established practice".to_string(),
                confidence: ScorerConfidence::High,
                findings: vec!["positive maturity markers found in response".to_string()],
            })
        } else {
            Ok(NarrativeVerdict {
                score: 1.0,
                rationale: "response describes an absent or informal practice".to_string(),
                confidence: ScorerConfidence::High,
                findings: vec!["negative maturity markers found in response".to_string()],
            })
        }
    }
}
