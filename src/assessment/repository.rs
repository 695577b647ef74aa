use serde::{Deserialize, Serialize};

use super::domain::{Assessment, AssessmentId, Observation, Question, Response, ScoreRow};

/// A response joined with its question bank entry — the unit every scoring
/// step consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub response: Response,
    pub question: Question,
}

/// Storage abstraction scoped by assessment so the scoring service can be
/// exercised in isolation.
///
/// `replace_scores` must be atomic: readers never observe a partially
/// replaced Score set.
pub trait AssessmentRepository: Send + Sync {
    fn assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    fn question(&self, code: &str) -> Result<Option<Question>, RepositoryError>;
    fn insert_response(
        &self,
        id: AssessmentId,
        response: Response,
    ) -> Result<Response, RepositoryError>;
    fn responses(&self, id: AssessmentId) -> Result<Vec<ResponseRecord>, RepositoryError>;
    fn observations(&self, id: AssessmentId) -> Result<Vec<Observation>, RepositoryError>;
    fn replace_scores(
        &self,
        id: AssessmentId,
        rows: Vec<ScoreRow>,
    ) -> Result<(), RepositoryError>;
    fn scores(&self, id: AssessmentId) -> Result<Vec<ScoreRow>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
