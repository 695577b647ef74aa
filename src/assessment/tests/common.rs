use std::sync::Arc;

use crate::assessment::domain::{
    Assessment, AssessmentId, Observation, Pillar, Question, QuestionType, Response,
    TargetRole,
};
use crate::assessment::memory::MemoryAssessmentRepository;
use crate::assessment::narrative::{
    NarrativeScorer, NarrativeScorerError, NarrativeVerdict, ScorerConfidence,
};
use crate::assessment::repository::ResponseRecord;
use crate::assessment::scoring::{ScoringEngine, ScoringPolicy};
use crate::assessment::service::AssessmentScoringService;

pub(super) const ASSESSMENT: AssessmentId = AssessmentId(1);

pub(super) fn assessment() -> Assessment {
    Assessment {
        id: ASSESSMENT,
        client_name: "Hawkeye Processing".to_string(),
        site_name: "Cedar Rapids Plant".to_string(),
        asset_class: Some("Rotating Equipment".to_string()),
        industry: Some("Food Processing".to_string()),
        framework_version: "1.0".to_string(),
    }
}

pub(super) fn question(
    code: &str,
    pillar: Pillar,
    target_role: TargetRole,
    question_type: QuestionType,
) -> Question {
    Question {
        code: code.to_string(),
        text: format!("Question {code}"),
        pillar,
        subcategory: "General".to_string(),
        target_role,
        question_type,
        weight: 1.0,
        evidence_required: false,
        evidence_description: None,
        scoring_logic: None,
        min_score: 1.0,
        max_score: 5.0,
        is_critical: false,
        framework_version: "1.0".to_string(),
    }
}

pub(super) fn likert_question(code: &str, pillar: Pillar, target_role: TargetRole) -> Question {
    question(code, pillar, target_role, QuestionType::Likert)
}

pub(super) fn scored_response(code: &str, score: f64) -> Response {
    Response {
        question_code: code.to_string(),
        raw_value: score.to_string(),
        numeric_score: Some(score),
        evidence_provided: false,
        evidence_notes: None,
        is_draft: false,
        is_na: false,
        narrative: None,
    }
}

pub(super) fn record(question: Question, response: Response) -> ResponseRecord {
    ResponseRecord { response, question }
}

pub(super) fn observation(pillar: Pillar, passed: Option<bool>) -> Observation {
    Observation {
        title: "Shift handover review".to_string(),
        observation_type: "Work Execution".to_string(),
        pillar,
        subcategory: None,
        notes: "Observed during morning rounds".to_string(),
        pass_fail_result: passed,
        severity: None,
    }
}

pub(super) fn safety_failure(pillar: Pillar) -> Observation {
    Observation {
        title: "Bypassed guard on conveyor".to_string(),
        observation_type: "Safety".to_string(),
        pillar,
        subcategory: None,
        notes: "Interlock defeated with a zip tie".to_string(),
        pass_fail_result: Some(false),
        severity: Some(crate::assessment::domain::ObservationSeverity::Critical),
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringPolicy::default())
}

/// Scorer that always fails, for exercising the degraded fallback path.
pub(super) struct FailingScorer;

impl NarrativeScorer for FailingScorer {
    fn score_text(
        &self,
        _question_text: &str,
        _response_text: &str,
    ) -> Result<NarrativeVerdict, NarrativeScorerError> {
        Err(NarrativeScorerError::Transport(
            "connection refused".to_string(),
        ))
    }
}

/// Scorer with a canned verdict, for asserting pass-through behavior.
pub(super) struct CannedScorer {
    pub(super) verdict: NarrativeVerdict,
}

impl CannedScorer {
    pub(super) fn low_confidence(score: f64) -> Self {
        Self {
            verdict: NarrativeVerdict {
                score,
                rationale: "thin answer, judged from context".to_string(),
                confidence: ScorerConfidence::Low,
                findings: vec!["little detail offered".to_string()],
            },
        }
    }
}

impl NarrativeScorer for CannedScorer {
    fn score_text(
        &self,
        _question_text: &str,
        _response_text: &str,
    ) -> Result<NarrativeVerdict, NarrativeScorerError> {
        Ok(self.verdict.clone())
    }
}

pub(super) type MemoryService =
    AssessmentScoringService<MemoryAssessmentRepository, crate::assessment::KeywordNarrativeScorer>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryAssessmentRepository>) {
    let repository = Arc::new(MemoryAssessmentRepository::default());
    repository
        .insert_assessment(assessment())
        .expect("assessment seeds");
    let scorer = Arc::new(crate::assessment::KeywordNarrativeScorer);
    let service = Arc::new(AssessmentScoringService::new(
        repository.clone(),
        scorer,
        ScoringPolicy::default(),
    ));
    (service, repository)
}
