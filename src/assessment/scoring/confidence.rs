use crate::assessment::domain::{Confidence, OverallConfidence};

/// Qualitative trust in a pillar score, from evidence coverage (percent of
/// evidence-required questions that were evidenced) and sample size.
pub fn pillar_confidence(evidence_coverage: f64, response_count: usize) -> Confidence {
    if response_count < 3 {
        Confidence::LowInsufficientData
    } else if evidence_coverage < 50.0 {
        Confidence::MediumLimitedEvidence
    } else if evidence_coverage >= 80.0 && response_count >= 5 {
        Confidence::HighWellEvidenced
    } else {
        Confidence::MediumAdequate
    }
}

/// Assessment-wide rollup. High only when every pillar is well evidenced;
/// one insufficient pillar drags the whole assessment to Low. No-Data
/// pillars count as neither high nor low.
pub fn overall_confidence<I>(confidences: I) -> OverallConfidence
where
    I: IntoIterator<Item = Confidence>,
{
    let collected: Vec<Confidence> = confidences.into_iter().collect();

    if collected.iter().all(|confidence| confidence.is_high()) {
        OverallConfidence::High
    } else if collected.iter().any(|confidence| confidence.is_low()) {
        OverallConfidence::Low
    } else {
        OverallConfidence::Medium
    }
}
