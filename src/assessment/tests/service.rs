use super::common::*;
use crate::assessment::domain::{AssessmentId, Pillar, QuestionType, TargetRole};
use crate::assessment::repository::AssessmentRepository;
use crate::assessment::service::{ResponseSubmission, ScoringServiceError};

fn submission(code: &str, raw_value: &str) -> ResponseSubmission {
    ResponseSubmission {
        question_code: code.to_string(),
        raw_value: raw_value.to_string(),
        evidence_notes: None,
        is_draft: false,
        is_na: false,
    }
}

#[test]
fn submitting_a_response_normalizes_and_stores_it() {
    let (service, repository) = build_service();
    repository
        .insert_question(question(
            "P-02",
            Pillar::People,
            TargetRole::Manager,
            QuestionType::Binary,
        ))
        .expect("question seeds");

    let stored = service
        .submit_response(ASSESSMENT, submission("P-02", "Yes"))
        .expect("submission succeeds");

    assert_eq!(stored.numeric_score, Some(5.0));
    assert!(!stored.evidence_provided);

    let records = repository.responses(ASSESSMENT).expect("repo read");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].response.numeric_score, Some(5.0));
}

#[test]
fn evidence_notes_mark_the_response_as_evidenced() {
    let (service, repository) = build_service();
    repository
        .insert_question(likert_question("P-01", Pillar::People, TargetRole::Technician))
        .expect("question seeds");

    let mut with_notes = submission("P-01", "4");
    with_notes.evidence_notes = Some("Training matrix attached".to_string());
    let stored = service
        .submit_response(ASSESSMENT, with_notes)
        .expect("submission succeeds");
    assert!(stored.evidence_provided);

    let mut blank_notes = submission("P-01", "4");
    blank_notes.evidence_notes = Some("   ".to_string());
    let stored = service
        .submit_response(ASSESSMENT, blank_notes)
        .expect("submission succeeds");
    assert!(!stored.evidence_provided);
}

#[test]
fn na_submissions_never_carry_a_numeric_score() {
    let (service, repository) = build_service();
    repository
        .insert_question(likert_question("P-01", Pillar::People, TargetRole::Technician))
        .expect("question seeds");

    let mut na = submission("P-01", "not applicable here");
    na.is_na = true;

    let stored = service
        .submit_response(ASSESSMENT, na)
        .expect("submission succeeds");

    assert!(stored.is_na);
    assert_eq!(stored.numeric_score, None);
}

#[test]
fn unknown_assessment_is_not_found() {
    let (service, _) = build_service();

    let error = service
        .calculate_scores(AssessmentId(99))
        .expect_err("unknown assessment rejected");

    assert!(matches!(
        error,
        ScoringServiceError::AssessmentNotFound(AssessmentId(99))
    ));
}

#[test]
fn unknown_question_is_not_found() {
    let (service, _) = build_service();

    let error = service
        .submit_response(ASSESSMENT, submission("ZZ-99", "4"))
        .expect_err("unknown question rejected");

    assert!(matches!(error, ScoringServiceError::QuestionNotFound(code) if code == "ZZ-99"));
}

#[test]
fn calculation_persists_one_row_per_pillar_plus_overall() {
    let (service, repository) = build_service();
    repository
        .insert_question(likert_question("P-01", Pillar::People, TargetRole::Technician))
        .expect("question seeds");
    service
        .submit_response(ASSESSMENT, submission("P-01", "4"))
        .expect("submission succeeds");

    let scorecard = service
        .calculate_scores(ASSESSMENT)
        .expect("calculation succeeds");

    assert_eq!(scorecard.pillar_scores.len(), 3);

    let rows = service.stored_scores(ASSESSMENT).expect("rows stored");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows.iter().filter(|row| row.pillar.is_none()).count(), 1);

    let overall = rows
        .iter()
        .find(|row| row.pillar.is_none())
        .expect("overall row present");
    assert_eq!(overall.final_score, scorecard.overall_rmi);
}

#[test]
fn recalculation_replaces_rows_instead_of_appending() {
    let (service, repository) = build_service();
    repository
        .insert_question(likert_question("P-01", Pillar::People, TargetRole::Technician))
        .expect("question seeds");
    service
        .submit_response(ASSESSMENT, submission("P-01", "4"))
        .expect("submission succeeds");

    service.calculate_scores(ASSESSMENT).expect("first run");
    service.calculate_scores(ASSESSMENT).expect("second run");

    let rows = service.stored_scores(ASSESSMENT).expect("rows stored");
    assert_eq!(rows.len(), 4);
}

#[test]
fn recalculation_is_idempotent_on_unchanged_inputs() {
    let (service, repository) = build_service();
    repository
        .insert_question(likert_question("P-01", Pillar::People, TargetRole::Technician))
        .expect("question seeds");
    service
        .submit_response(ASSESSMENT, submission("P-01", "4"))
        .expect("submission succeeds");

    service.calculate_scores(ASSESSMENT).expect("first run");
    let first = service.stored_scores(ASSESSMENT).expect("rows stored");
    service.calculate_scores(ASSESSMENT).expect("second run");
    let second = service.stored_scores(ASSESSMENT).expect("rows stored");

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.pillar, b.pillar);
        assert_eq!(a.raw_score, b.raw_score);
        assert_eq!(a.weighted_score, b.weighted_score);
        assert_eq!(a.final_score, b.final_score);
        assert_eq!(a.confidence_level, b.confidence_level);
        assert_eq!(a.calculation_method, b.calculation_method);
    }
}

#[test]
fn calculation_never_mutates_stored_responses() {
    // The evidence gate is a transient transform; the self-reported score
    // must survive so violation reports stay meaningful.
    let (service, repository) = build_service();
    let mut question = likert_question("P-01", Pillar::People, TargetRole::Technician);
    question.evidence_required = true;
    repository.insert_question(question).expect("question seeds");
    service
        .submit_response(ASSESSMENT, submission("P-01", "5"))
        .expect("submission succeeds");

    service.calculate_scores(ASSESSMENT).expect("calculation");

    let records = repository.responses(ASSESSMENT).expect("repo read");
    assert_eq!(records[0].response.numeric_score, Some(5.0));

    let violations = service
        .validate_evidence_requirements(ASSESSMENT)
        .expect("violations listed");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].score, 5.0);
}

#[test]
fn overall_rmi_averages_the_three_pillars() {
    let (service, repository) = build_service();
    for (code, pillar) in [
        ("P-01", Pillar::People),
        ("PR-01", Pillar::Process),
        ("T-01", Pillar::Technology),
    ] {
        repository
            .insert_question(likert_question(code, pillar, TargetRole::Technician))
            .expect("question seeds");
    }
    service
        .submit_response(ASSESSMENT, submission("P-01", "4"))
        .expect("submission");
    service
        .submit_response(ASSESSMENT, submission("PR-01", "2"))
        .expect("submission");
    service
        .submit_response(ASSESSMENT, submission("T-01", "3"))
        .expect("submission");

    let scorecard = service.calculate_scores(ASSESSMENT).expect("calculation");

    assert_eq!(scorecard.overall_rmi, 3.0);
    assert_eq!(
        scorecard.maturity_level,
        crate::assessment::domain::MaturityLevel::Preventive
    );
}

#[test]
fn empty_assessment_yields_a_no_data_scorecard() {
    let (service, _) = build_service();

    let scorecard = service.calculate_scores(ASSESSMENT).expect("calculation");

    assert_eq!(scorecard.overall_rmi, 0.0);
    for result in scorecard.pillar_scores.values() {
        assert_eq!(result.confidence, crate::assessment::domain::Confidence::NoData);
    }
}

#[test]
fn breakdown_groups_questions_by_subcategory() {
    let (service, repository) = build_service();
    let mut planning = likert_question("PR-01", Pillar::Process, TargetRole::Planner);
    planning.subcategory = "Planning".to_string();
    let mut planning_two = likert_question("PR-02", Pillar::Process, TargetRole::Planner);
    planning_two.subcategory = "Planning".to_string();
    let mut execution = likert_question("PR-03", Pillar::Process, TargetRole::Technician);
    execution.subcategory = "Execution".to_string();

    for question in [planning, planning_two, execution] {
        repository.insert_question(question).expect("question seeds");
    }
    service
        .submit_response(ASSESSMENT, submission("PR-01", "4"))
        .expect("submission");
    service
        .submit_response(ASSESSMENT, submission("PR-02", "3"))
        .expect("submission");
    service
        .submit_response(ASSESSMENT, submission("PR-03", "5"))
        .expect("submission");

    let breakdown = service.score_breakdown(ASSESSMENT).expect("breakdown");
    let process = breakdown
        .pillars
        .get(&Pillar::Process)
        .expect("process pillar present");

    assert_eq!(process.len(), 2);
    let planning_entry = process
        .iter()
        .find(|entry| entry.subcategory == "Planning")
        .expect("planning subcategory");
    assert_eq!(planning_entry.question_count, 2);
    assert_eq!(planning_entry.average_score, 3.5);
}

#[test]
fn degraded_narrative_answers_flow_through_submission() {
    let (_, repository) = build_service();
    repository
        .insert_question(question(
            "PR-05",
            Pillar::Process,
            TargetRole::Planner,
            QuestionType::Observational,
        ))
        .expect("question seeds");

    let scorer = std::sync::Arc::new(FailingScorer);
    let service = crate::assessment::service::AssessmentScoringService::new(
        repository.clone(),
        scorer,
        crate::assessment::scoring::ScoringPolicy::default(),
    );

    let stored = service
        .submit_response(ASSESSMENT, submission("PR-05", "We plan weekly"))
        .expect("submission succeeds despite scorer outage");

    assert_eq!(stored.numeric_score, Some(3.0));
    let narrative = stored.narrative.expect("narrative metadata kept");
    assert!(narrative.degraded);
}
