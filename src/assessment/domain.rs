use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::narrative::NarrativeAssessment;

/// Identifier wrapper for audit engagements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AssessmentId(pub u64);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One RMI audit engagement for a client site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub client_name: String,
    pub site_name: String,
    pub asset_class: Option<String>,
    pub industry: Option<String>,
    pub framework_version: String,
}

/// The three maturity axes every question and observation rolls up into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    People,
    Process,
    Technology,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::People, Pillar::Process, Pillar::Technology];

    pub const fn label(self) -> &'static str {
        match self {
            Pillar::People => "people",
            Pillar::Process => "process",
            Pillar::Technology => "technology",
        }
    }
}

/// How a question captures its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Likert,
    Binary,
    MultiSelect,
    DataInput,
    Observational,
}

/// Who a question is directed at. Role weights are asymmetric on purpose:
/// technician answers are ground truth, manager answers are intent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetRole {
    Technician,
    Supervisor,
    Manager,
    Planner,
    Auditor,
}

/// One interval of a DataInput band table: values at or above `lower_bound`
/// take `score` unless a higher band matches first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringBand {
    pub lower_bound: f64,
    pub score: f64,
}

/// Versioned question bank entry. Immutable once referenced by a response;
/// revisions bump `framework_version` instead of editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub code: String,
    pub text: String,
    pub pillar: Pillar,
    pub subcategory: String,
    pub target_role: TargetRole,
    pub question_type: QuestionType,
    pub weight: f64,
    pub evidence_required: bool,
    pub evidence_description: Option<String>,
    pub scoring_logic: Option<Vec<ScoringBand>>,
    pub min_score: f64,
    pub max_score: f64,
    pub is_critical: bool,
    pub framework_version: String,
}

/// A captured interview answer for one question within an assessment.
/// Draft and N/A responses are excluded from all scoring; `numeric_score`
/// is always `None` while `is_na` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub question_code: String,
    pub raw_value: String,
    pub numeric_score: Option<f64>,
    pub evidence_provided: bool,
    pub evidence_notes: Option<String>,
    pub is_draft: bool,
    pub is_na: bool,
    pub narrative: Option<NarrativeAssessment>,
}

/// Severity recorded against a failed field observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSeverity {
    Critical,
    Major,
    Minor,
}

/// Field observation captured while shadowing work execution. Observations
/// without a pass/fail result contribute nothing to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub title: String,
    pub observation_type: String,
    pub pillar: Pillar,
    pub subcategory: Option<String>,
    pub notes: String,
    pub pass_fail_result: Option<bool>,
    pub severity: Option<ObservationSeverity>,
}

/// Qualitative trust attached to a computed pillar score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    NoData,
    LowInsufficientData,
    MediumLimitedEvidence,
    MediumAdequate,
    HighWellEvidenced,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Confidence::NoData => "No Data",
            Confidence::LowInsufficientData => "Low - Insufficient Data",
            Confidence::MediumLimitedEvidence => "Medium - Limited Evidence",
            Confidence::MediumAdequate => "Medium - Adequate",
            Confidence::HighWellEvidenced => "High - Well Evidenced",
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Confidence::HighWellEvidenced)
    }

    pub const fn is_low(self) -> bool {
        matches!(self, Confidence::LowInsufficientData)
    }
}

/// Assessment-wide confidence rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallConfidence {
    High,
    Medium,
    Low,
}

impl OverallConfidence {
    pub const fn label(self) -> &'static str {
        match self {
            OverallConfidence::High => "High",
            OverallConfidence::Medium => "Medium",
            OverallConfidence::Low => "Low",
        }
    }
}

/// Maturity classification for the overall index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    Reactive,
    EmergingPreventive,
    Preventive,
    Predictive,
    Prescriptive,
}

impl MaturityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            MaturityLevel::Reactive => "Level 1 - Reactive",
            MaturityLevel::EmergingPreventive => "Level 2 - Emerging Preventive",
            MaturityLevel::Preventive => "Level 3 - Preventive",
            MaturityLevel::Predictive => "Level 4 - Predictive",
            MaturityLevel::Prescriptive => "Level 5 - Prescriptive",
        }
    }
}

/// Critical findings that trigger the weakest-link cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriticalFailure {
    Question {
        code: String,
        score: f64,
        text: String,
    },
    SafetyObservation {
        title: String,
        observation_type: String,
        severity: Option<ObservationSeverity>,
    },
}

/// Transient aggregate produced fresh by every pillar calculation — never
/// partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarScoreResult {
    pub raw_score: f64,
    pub weighted_score: f64,
    pub final_score: f64,
    pub confidence: Confidence,
    pub evidence_coverage: f64,
    pub critical_failures: Vec<CriticalFailure>,
    pub response_count: usize,
    pub observation_count: usize,
    pub interview_score: f64,
    pub observation_score: f64,
}

impl PillarScoreResult {
    /// The representable "No Data" result for a pillar with nothing to score.
    pub fn no_data() -> Self {
        Self {
            raw_score: 0.0,
            weighted_score: 0.0,
            final_score: 0.0,
            confidence: Confidence::NoData,
            evidence_coverage: 0.0,
            critical_failures: Vec::new(),
            response_count: 0,
            observation_count: 0,
            interview_score: 0.0,
            observation_score: 0.0,
        }
    }
}

/// Persisted score row; `pillar = None` marks the overall RMI row. The full
/// set for an assessment is replaced wholesale on every recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub assessment_id: AssessmentId,
    pub pillar: Option<Pillar>,
    pub raw_score: f64,
    pub weighted_score: f64,
    pub final_score: f64,
    pub confidence_level: String,
    pub calculation_method: Value,
    pub calculated_at: DateTime<Utc>,
}

/// Complete output of one scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentScorecard {
    pub assessment_id: AssessmentId,
    pub pillar_scores: BTreeMap<Pillar, PillarScoreResult>,
    pub overall_rmi: f64,
    pub maturity_level: MaturityLevel,
    pub overall_confidence: OverallConfidence,
    pub calculated_at: DateTime<Utc>,
}

/// Per-pillar, per-subcategory rollup for gap analysis and reports.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub assessment_id: AssessmentId,
    pub pillars: BTreeMap<Pillar, Vec<SubcategoryBreakdown>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryBreakdown {
    pub subcategory: String,
    pub average_score: f64,
    pub question_count: usize,
    pub questions: Vec<QuestionScoreDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionScoreDetail {
    pub code: String,
    pub text: String,
    pub score: Option<f64>,
    pub is_critical: bool,
}
