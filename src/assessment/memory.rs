//! In-memory reference repository. Persistence proper lives behind the
//! `AssessmentRepository` trait; this implementation backs the demo server
//! and the test suites.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::domain::{Assessment, AssessmentId, Observation, Question, Response, ScoreRow};
use super::repository::{AssessmentRepository, RepositoryError, ResponseRecord};

#[derive(Default)]
pub struct MemoryAssessmentRepository {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    assessments: HashMap<AssessmentId, Assessment>,
    questions: HashMap<String, Question>,
    responses: HashMap<AssessmentId, Vec<Response>>,
    observations: HashMap<AssessmentId, Vec<Observation>>,
    scores: HashMap<AssessmentId, Vec<ScoreRow>>,
}

impl MemoryAssessmentRepository {
    pub fn insert_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut store = self.store()?;
        if store.assessments.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        store.assessments.insert(assessment.id, assessment);
        Ok(())
    }

    pub fn insert_question(&self, question: Question) -> Result<(), RepositoryError> {
        let mut store = self.store()?;
        if store.questions.contains_key(&question.code) {
            return Err(RepositoryError::Conflict);
        }
        store.questions.insert(question.code.clone(), question);
        Ok(())
    }

    pub fn insert_observation(
        &self,
        id: AssessmentId,
        observation: Observation,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store()?;
        store.observations.entry(id).or_default().push(observation);
        Ok(())
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl AssessmentRepository for MemoryAssessmentRepository {
    fn assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self.store()?.assessments.get(&id).cloned())
    }

    fn question(&self, code: &str) -> Result<Option<Question>, RepositoryError> {
        Ok(self.store()?.questions.get(code).cloned())
    }

    fn insert_response(
        &self,
        id: AssessmentId,
        response: Response,
    ) -> Result<Response, RepositoryError> {
        let mut store = self.store()?;
        if !store.assessments.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        store.responses.entry(id).or_default().push(response.clone());
        Ok(response)
    }

    fn responses(&self, id: AssessmentId) -> Result<Vec<ResponseRecord>, RepositoryError> {
        let store = self.store()?;
        let responses = store.responses.get(&id).cloned().unwrap_or_default();
        responses
            .into_iter()
            .map(|response| {
                let question = store
                    .questions
                    .get(&response.question_code)
                    .cloned()
                    .ok_or_else(|| {
                        RepositoryError::Unavailable(format!(
                            "question {} missing from bank",
                            response.question_code
                        ))
                    })?;
                Ok(ResponseRecord { response, question })
            })
            .collect()
    }

    fn observations(&self, id: AssessmentId) -> Result<Vec<Observation>, RepositoryError> {
        Ok(self.store()?.observations.get(&id).cloned().unwrap_or_default())
    }

    fn replace_scores(
        &self,
        id: AssessmentId,
        rows: Vec<ScoreRow>,
    ) -> Result<(), RepositoryError> {
        // Single lock covers the delete and the insert, keeping replacement atomic.
        let mut store = self.store()?;
        store.scores.remove(&id);
        store.scores.insert(id, rows);
        Ok(())
    }

    fn scores(&self, id: AssessmentId) -> Result<Vec<ScoreRow>, RepositoryError> {
        Ok(self.store()?.scores.get(&id).cloned().unwrap_or_default())
    }
}
