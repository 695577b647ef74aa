use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::domain::{
    AssessmentId, AssessmentScorecard, OverallConfidence, Pillar, PillarScoreResult,
    QuestionScoreDetail, Response, ScoreBreakdown, ScoreRow, SubcategoryBreakdown,
};
use super::narrative::NarrativeScorer;
use super::repository::{AssessmentRepository, RepositoryError};
use super::scoring::{
    find_unevidenced_high_scores, maturity_level, normalize_response, overall_confidence,
    round2, EvidenceViolation, NormalizeError, ScoringEngine, ScoringPolicy,
};

/// Submission payload for one interview answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSubmission {
    pub question_code: String,
    pub raw_value: String,
    #[serde(default)]
    pub evidence_notes: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_na: bool,
}

/// Service composing the repository, narrative scorer, and scoring engine.
/// Sole writer of Score rows for an assessment.
pub struct AssessmentScoringService<R, S> {
    repository: Arc<R>,
    scorer: Arc<S>,
    engine: ScoringEngine,
    recalculation_locks: Mutex<HashMap<AssessmentId, Arc<Mutex<()>>>>,
}

impl<R, S> AssessmentScoringService<R, S>
where
    R: AssessmentRepository + 'static,
    S: NarrativeScorer + 'static,
{
    pub fn new(repository: Arc<R>, scorer: Arc<S>, policy: ScoringPolicy) -> Self {
        Self {
            repository,
            scorer,
            engine: ScoringEngine::new(policy),
            recalculation_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Normalize and store one answer. N/A answers never carry a numeric
    /// score; everything else goes through the normalizer (and, for
    /// narrative types, the external scorer).
    pub fn submit_response(
        &self,
        assessment_id: AssessmentId,
        submission: ResponseSubmission,
    ) -> Result<Response, ScoringServiceError> {
        self.ensure_assessment(assessment_id)?;
        let question = self
            .repository
            .question(&submission.question_code)?
            .ok_or_else(|| {
                ScoringServiceError::QuestionNotFound(submission.question_code.clone())
            })?;

        let normalized = if submission.is_na {
            None
        } else {
            Some(normalize_response(
                &question,
                &submission.raw_value,
                self.scorer.as_ref(),
            )?)
        };

        let evidence_provided = submission
            .evidence_notes
            .as_deref()
            .is_some_and(|notes| !notes.trim().is_empty());

        let response = Response {
            question_code: question.code,
            raw_value: submission.raw_value,
            numeric_score: normalized.as_ref().map(|answer| answer.score),
            evidence_provided,
            evidence_notes: submission.evidence_notes,
            is_draft: submission.is_draft,
            is_na: submission.is_na,
            narrative: normalized.and_then(|answer| answer.narrative),
        };

        Ok(self.repository.insert_response(assessment_id, response)?)
    }

    /// Recalculate and persist every Score row for an assessment.
    ///
    /// Concurrent runs for the same assessment are serialized so the
    /// delete-then-insert replacement cannot interleave; recalculation is
    /// always total replacement, never incremental.
    pub fn calculate_scores(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<AssessmentScorecard, ScoringServiceError> {
        let lock = self.recalculation_lock(assessment_id)?;
        let _serialized = lock.lock().map_err(|_| {
            ScoringServiceError::Repository(RepositoryError::Unavailable(
                "recalculation lock poisoned".to_string(),
            ))
        })?;

        self.ensure_assessment(assessment_id)?;
        let records = self.repository.responses(assessment_id)?;
        let observations = self.repository.observations(assessment_id)?;

        let mut pillar_scores = BTreeMap::new();
        for pillar in Pillar::ALL {
            pillar_scores.insert(
                pillar,
                self.engine.pillar_score(pillar, &records, &observations),
            );
        }

        let overall_rmi = self.engine.overall_rmi(&pillar_scores);
        let level = maturity_level(overall_rmi);
        let confidence = overall_confidence(pillar_scores.values().map(|result| result.confidence));
        let calculated_at = Utc::now();

        let rows = score_rows(
            assessment_id,
            &pillar_scores,
            overall_rmi,
            confidence,
            calculated_at,
        );
        self.repository.replace_scores(assessment_id, rows)?;

        info!(
            %assessment_id,
            overall_rmi,
            maturity = level.label(),
            "assessment scores recalculated"
        );

        Ok(AssessmentScorecard {
            assessment_id,
            pillar_scores,
            overall_rmi,
            maturity_level: level,
            overall_confidence: confidence,
            calculated_at,
        })
    }

    /// Per-pillar, per-subcategory rollup for reports and gap analysis.
    pub fn score_breakdown(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<ScoreBreakdown, ScoringServiceError> {
        self.ensure_assessment(assessment_id)?;
        let records = self.repository.responses(assessment_id)?;

        let mut pillars = BTreeMap::new();
        for pillar in Pillar::ALL {
            let mut subcategories: BTreeMap<String, Vec<usize>> = BTreeMap::new();
            for (index, record) in records.iter().enumerate() {
                if record.question.pillar == pillar {
                    subcategories
                        .entry(record.question.subcategory.clone())
                        .or_default()
                        .push(index);
                }
            }

            let entries = subcategories
                .into_iter()
                .map(|(subcategory, indices)| {
                    let scores: Vec<f64> = indices
                        .iter()
                        .map(|index| records[*index].response.numeric_score.unwrap_or(0.0))
                        .collect();
                    let average_score = if scores.is_empty() {
                        0.0
                    } else {
                        round2(scores.iter().sum::<f64>() / scores.len() as f64)
                    };

                    SubcategoryBreakdown {
                        subcategory,
                        average_score,
                        question_count: indices.len(),
                        questions: indices
                            .iter()
                            .map(|index| {
                                let record = &records[*index];
                                QuestionScoreDetail {
                                    code: record.question.code.clone(),
                                    text: record.question.text.clone(),
                                    score: record.response.numeric_score,
                                    is_critical: record.question.is_critical,
                                }
                            })
                            .collect(),
                    }
                })
                .collect();

            pillars.insert(pillar, entries);
        }

        Ok(ScoreBreakdown {
            assessment_id,
            pillars,
        })
    }

    /// Unevidenced high scores, reported before the gate clamps them.
    pub fn validate_evidence_requirements(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<EvidenceViolation>, ScoringServiceError> {
        self.ensure_assessment(assessment_id)?;
        let records = self.repository.responses(assessment_id)?;
        Ok(find_unevidenced_high_scores(self.engine.policy(), &records))
    }

    /// Score rows persisted by the last recalculation.
    pub fn stored_scores(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<ScoreRow>, ScoringServiceError> {
        self.ensure_assessment(assessment_id)?;
        Ok(self.repository.scores(assessment_id)?)
    }

    fn ensure_assessment(&self, assessment_id: AssessmentId) -> Result<(), ScoringServiceError> {
        self.repository
            .assessment(assessment_id)?
            .map(|_| ())
            .ok_or(ScoringServiceError::AssessmentNotFound(assessment_id))
    }

    fn recalculation_lock(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Arc<Mutex<()>>, ScoringServiceError> {
        let mut locks = self.recalculation_locks.lock().map_err(|_| {
            ScoringServiceError::Repository(RepositoryError::Unavailable(
                "recalculation lock registry poisoned".to_string(),
            ))
        })?;
        Ok(locks
            .entry(assessment_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

fn score_rows(
    assessment_id: AssessmentId,
    pillar_scores: &BTreeMap<Pillar, PillarScoreResult>,
    overall_rmi: f64,
    confidence: OverallConfidence,
    calculated_at: DateTime<Utc>,
) -> Vec<ScoreRow> {
    let mut rows: Vec<ScoreRow> = pillar_scores
        .iter()
        .map(|(pillar, result)| ScoreRow {
            assessment_id,
            pillar: Some(*pillar),
            raw_score: result.raw_score,
            weighted_score: result.weighted_score,
            final_score: result.final_score,
            confidence_level: result.confidence.label().to_string(),
            calculation_method: json!({
                "evidence_coverage": result.evidence_coverage,
                "critical_failures": result.critical_failures,
            }),
            calculated_at,
        })
        .collect();

    let pillar_breakdown: BTreeMap<&str, f64> = pillar_scores
        .iter()
        .map(|(pillar, result)| (pillar.label(), result.final_score))
        .collect();

    rows.push(ScoreRow {
        assessment_id,
        pillar: None,
        raw_score: overall_rmi,
        weighted_score: overall_rmi,
        final_score: overall_rmi,
        confidence_level: confidence.label().to_string(),
        calculation_method: json!({
            "method": "average of three pillar final scores",
            "pillar_breakdown": pillar_breakdown,
        }),
        calculated_at,
    });

    rows
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("assessment {0} not found")]
    AssessmentNotFound(AssessmentId),
    #[error("question {0} not found")]
    QuestionNotFound(String),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
