use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::domain::TargetRole;

/// Scoring policy: every tunable constant behind a calculation, kept apart
/// from the mechanism so it can be versioned like the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub role_weights: BTreeMap<TargetRole, f64>,
    pub default_role_weight: f64,
    /// Scores at or above this need attached evidence to stand.
    pub evidence_threshold: f64,
    /// Ceiling applied to unevidenced high scores.
    pub evidence_cap: f64,
    pub interview_weight: f64,
    pub observation_weight: f64,
    pub observation_pass_score: f64,
    pub observation_fail_score: f64,
    /// Critical questions scoring at or below this trip the weakest-link cap.
    pub critical_failure_threshold: f64,
    pub critical_cap: f64,
}

impl ScoringPolicy {
    pub fn role_weight(&self, role: TargetRole) -> f64 {
        self.role_weights
            .get(&role)
            .copied()
            .unwrap_or(self.default_role_weight)
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        let mut role_weights = BTreeMap::new();
        // Ground truth outweighs intent: technicians report what is really
        // happening, managers report what they believe is happening.
        role_weights.insert(TargetRole::Technician, 0.60);
        role_weights.insert(TargetRole::Supervisor, 0.10);
        role_weights.insert(TargetRole::Manager, 0.20);
        role_weights.insert(TargetRole::Planner, 0.10);
        role_weights.insert(TargetRole::Auditor, 0.20);

        Self {
            role_weights,
            default_role_weight: 1.0,
            evidence_threshold: 3.0,
            evidence_cap: 3.0,
            interview_weight: 0.80,
            observation_weight: 0.20,
            observation_pass_score: 5.0,
            observation_fail_score: 1.0,
            critical_failure_threshold: 2.0,
            critical_cap: 3.0,
        }
    }
}
