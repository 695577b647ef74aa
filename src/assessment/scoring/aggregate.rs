use std::collections::BTreeMap;

use super::bands::{Band, BandEdge, BandTable};
use super::config::ScoringPolicy;
use super::confidence::pillar_confidence;
use super::evidence::apply_evidence_gate;
use crate::assessment::domain::{
    CriticalFailure, MaturityLevel, Observation, Pillar, PillarScoreResult,
};
use crate::assessment::repository::ResponseRecord;

/// Stateless calculator applying the scoring policy to one assessment's
/// evidence streams.
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Aggregate one pillar: weighted interview sub-score, pass/fail
    /// observation sub-score, 80/20 blend, then the weakest-link caps.
    pub fn pillar_score(
        &self,
        pillar: Pillar,
        records: &[ResponseRecord],
        observations: &[Observation],
    ) -> PillarScoreResult {
        let eligible: Vec<(&ResponseRecord, f64)> = records
            .iter()
            .filter(|record| record.question.pillar == pillar)
            .filter(|record| !record.response.is_draft && !record.response.is_na)
            .filter_map(|record| record.response.numeric_score.map(|score| (record, score)))
            .collect();

        let eligible_observations: Vec<(&Observation, bool)> = observations
            .iter()
            .filter(|observation| observation.pillar == pillar)
            .filter_map(|observation| {
                observation
                    .pass_fail_result
                    .map(|passed| (observation, passed))
            })
            .collect();

        if eligible.is_empty() && eligible_observations.is_empty() {
            return PillarScoreResult::no_data();
        }

        let mut total_weighted_score = 0.0;
        let mut total_weight = 0.0;
        let mut evidence_required_count = 0usize;
        let mut evidenced_count = 0usize;
        let mut critical_failures = Vec::new();

        for (record, score) in &eligible {
            let gated = apply_evidence_gate(
                &self.policy,
                &record.question,
                *score,
                record.response.evidence_provided,
            );

            if record.question.evidence_required {
                evidence_required_count += 1;
                if record.response.evidence_provided {
                    evidenced_count += 1;
                }
            }

            let weight =
                self.policy.role_weight(record.question.target_role) * record.question.weight;
            total_weighted_score += gated * weight;
            total_weight += weight;

            if record.question.is_critical && gated <= self.policy.critical_failure_threshold {
                critical_failures.push(CriticalFailure::Question {
                    code: record.question.code.clone(),
                    score: gated,
                    text: record.question.text.clone(),
                });
            }
        }

        let interview_score = if total_weight > 0.0 {
            total_weighted_score / total_weight
        } else {
            0.0
        };

        let mut observation_scores = Vec::with_capacity(eligible_observations.len());
        let mut safety_failures = Vec::new();

        for (observation, passed) in &eligible_observations {
            observation_scores.push(if *passed {
                self.policy.observation_pass_score
            } else {
                self.policy.observation_fail_score
            });

            if !passed
                && observation
                    .observation_type
                    .to_lowercase()
                    .contains("safety")
            {
                safety_failures.push(CriticalFailure::SafetyObservation {
                    title: observation.title.clone(),
                    observation_type: observation.observation_type.clone(),
                    severity: observation.severity,
                });
            }
        }

        let observation_score = if observation_scores.is_empty() {
            0.0
        } else {
            observation_scores.iter().sum::<f64>() / observation_scores.len() as f64
        };

        let combined_score = if !eligible.is_empty() && !eligible_observations.is_empty() {
            interview_score * self.policy.interview_weight
                + observation_score * self.policy.observation_weight
        } else if !eligible.is_empty() {
            interview_score
        } else {
            observation_score
        };

        let mut final_score = combined_score;
        if !critical_failures.is_empty() {
            final_score = final_score.min(self.policy.critical_cap);
        }
        // Zero-tolerance safety rule: a failed safety observation caps the
        // Process pillar no matter what the averages say.
        if !safety_failures.is_empty() && pillar == Pillar::Process {
            final_score = final_score.min(self.policy.critical_cap);
        }

        let evidence_coverage = if evidence_required_count > 0 {
            evidenced_count as f64 / evidence_required_count as f64 * 100.0
        } else {
            100.0
        };
        let confidence = pillar_confidence(evidence_coverage, eligible.len());

        let response_count = eligible.len();
        let observation_count = eligible_observations.len();
        critical_failures.extend(safety_failures);

        PillarScoreResult {
            raw_score: round2(combined_score),
            weighted_score: round2(combined_score),
            final_score: round2(final_score),
            confidence,
            evidence_coverage: round1(evidence_coverage),
            critical_failures,
            response_count,
            observation_count,
            interview_score: round2(interview_score),
            observation_score: round2(observation_score),
        }
    }

    /// Unweighted mean across pillars: each axis counts equally regardless
    /// of question volume.
    pub fn overall_rmi(&self, pillar_scores: &BTreeMap<Pillar, PillarScoreResult>) -> f64 {
        if pillar_scores.is_empty() {
            return 0.0;
        }
        let sum: f64 = pillar_scores
            .values()
            .map(|result| result.final_score)
            .sum();
        round2(sum / pillar_scores.len() as f64)
    }
}

/// Maturity classification over the shared threshold table.
pub fn maturity_level(rmi: f64) -> MaturityLevel {
    let bands = BandTable::new(
        BandEdge::Inclusive,
        vec![
            Band {
                lower_bound: 4.5,
                value: MaturityLevel::Prescriptive,
            },
            Band {
                lower_bound: 4.0,
                value: MaturityLevel::Predictive,
            },
            Band {
                lower_bound: 3.0,
                value: MaturityLevel::Preventive,
            },
            Band {
                lower_bound: 2.0,
                value: MaturityLevel::EmergingPreventive,
            },
        ],
    );

    bands
        .classify(rmi)
        .copied()
        .unwrap_or(MaturityLevel::Reactive)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
