use serde::Serialize;

use super::config::ScoringPolicy;
use crate::assessment::domain::Question;
use crate::assessment::repository::ResponseRecord;

/// Cap an unevidenced high score at the policy ceiling.
///
/// Pure and idempotent; applied transiently before aggregation so the
/// stored response keeps its self-reported value. The downgrade shows up in
/// the evidence-coverage metric, never as an error.
pub fn apply_evidence_gate(
    policy: &ScoringPolicy,
    question: &Question,
    score: f64,
    evidence_provided: bool,
) -> f64 {
    if question.evidence_required && score >= policy.evidence_threshold && !evidence_provided {
        score.min(policy.evidence_cap)
    } else {
        score
    }
}

/// A high self-reported score whose mandatory evidence is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceViolation {
    pub question_code: String,
    pub question_text: String,
    pub score: f64,
    pub evidence_description: Option<String>,
    pub severity: String,
}

/// Pre-clamp listing of unevidenced high scores, used for report flagging.
/// Looks at every recorded response, drafts included, so auditors see the
/// gaps before the gate quietly caps them.
pub fn find_unevidenced_high_scores(
    policy: &ScoringPolicy,
    records: &[ResponseRecord],
) -> Vec<EvidenceViolation> {
    records
        .iter()
        .filter_map(|record| {
            let score = record.response.numeric_score?;
            let gated = record.question.evidence_required
                && score >= policy.evidence_threshold
                && !record.response.evidence_provided;
            if !gated {
                return None;
            }
            Some(EvidenceViolation {
                question_code: record.question.code.clone(),
                question_text: record.question.text.clone(),
                score,
                evidence_description: record.question.evidence_description.clone(),
                severity: format!("HIGH - Score will be capped at {}", policy.evidence_cap),
            })
        })
        .collect()
}
