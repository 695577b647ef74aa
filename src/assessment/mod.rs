//! Assessment scoring workflow: interview responses and field observations
//! rolled up into pillar scores and the overall Reliability Maturity Index.

pub mod domain;
pub mod memory;
pub mod narrative;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Assessment, AssessmentId, AssessmentScorecard, Confidence, CriticalFailure, MaturityLevel,
    Observation, ObservationSeverity, OverallConfidence, Pillar, PillarScoreResult, Question,
    QuestionScoreDetail, QuestionType, Response, ScoreBreakdown, ScoreRow, ScoringBand,
    SubcategoryBreakdown, TargetRole,
};
pub use memory::MemoryAssessmentRepository;
pub use narrative::{
    KeywordNarrativeScorer, NarrativeAssessment, NarrativeScorer, NarrativeScorerError,
    NarrativeVerdict, ScorerConfidence,
};
pub use repository::{AssessmentRepository, RepositoryError, ResponseRecord};
pub use router::assessment_router;
pub use scoring::{
    apply_evidence_gate, find_unevidenced_high_scores, maturity_level, normalize_response,
    overall_confidence, pillar_confidence, EvidenceViolation, NormalizeError, NormalizedAnswer,
    ScoringEngine, ScoringPolicy,
};
pub use service::{AssessmentScoringService, ResponseSubmission, ScoringServiceError};
