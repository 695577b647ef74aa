use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use rmi_audit::assessment::{
    assessment_router, Assessment, AssessmentId, AssessmentScoringService,
    KeywordNarrativeScorer, MemoryAssessmentRepository, Observation, Pillar, Question,
    QuestionType, ScoringBand, ScoringPolicy, ScoringServiceError, TargetRole,
};
use rmi_audit::cmms::{
    bad_actors, data_graveyard_index, pm_compliance, reactive_ratio, work_type_distribution,
    CmmsImporter,
};
use rmi_audit::config::AppConfig;
use rmi_audit::error::AppError;
use rmi_audit::telemetry;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "RMI Audit Service",
    about = "Serve and explore Reliability Maturity Index scoring from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the CMMS metric calculators against an export file
    Analyze {
        #[command(subcommand)]
        command: AnalyzeCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Seed a sample assessment and question bank for demos
    #[arg(long)]
    demo: bool,
}

#[derive(Subcommand, Debug)]
enum AnalyzeCommand {
    /// Reactive ratio, data quality, and bad actors from a work order export
    WorkOrders(AnalyzeArgs),
    /// On-time completion rate from a PM schedule export
    PmCompliance(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// CMMS export file (CSV)
    #[arg(long)]
    csv: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Analyze { command } => run_analyze(command),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let repository = Arc::new(MemoryAssessmentRepository::default());
    if args.demo {
        seed_demo(&repository)?;
        info!("demo assessment seeded");
    }

    let scorer = Arc::new(KeywordNarrativeScorer);
    let service = Arc::new(AssessmentScoringService::new(
        repository,
        scorer,
        ScoringPolicy::default(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(assessment_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "RMI audit service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_analyze(command: AnalyzeCommand) -> Result<(), AppError> {
    match command {
        AnalyzeCommand::WorkOrders(args) => {
            let table = CmmsImporter::work_orders_from_path(&args.csv)?;
            let reactive = reactive_ratio(&table)?;
            let quality = data_graveyard_index(&table)?;

            println!("Work order analysis ({} records)", table.len());
            println!(
                "\n{}: {:.1}% reactive ({} of {})",
                reactive.metric,
                reactive.reactive_ratio,
                reactive.reactive_work_orders,
                reactive.total_work_orders
            );
            println!("- severity: {} (score {})", reactive.severity, reactive.score);
            println!(
                "\n{}: {:.1}% poor closures ({} of {})",
                quality.metric,
                quality.graveyard_percentage,
                quality.poor_quality_closures,
                quality.total_work_orders
            );
            println!("- severity: {} (score {})", quality.severity, quality.score);

            if let Ok(distribution) = work_type_distribution(&table) {
                println!("\nWork type distribution");
                for (work_type, count) in &distribution.counts {
                    let share = distribution.percentages.get(work_type).copied().unwrap_or(0.0);
                    println!("- {}: {} ({:.1}%)", work_type, count, share);
                }
            }

            if let Ok(actors) = bad_actors(&table, 10) {
                if !actors.is_empty() {
                    println!("\nBad actors (top {} by reactive demand)", actors.len());
                    for actor in actors {
                        println!("- {}: {} failure work orders", actor.asset, actor.failure_count);
                    }
                }
            }

            Ok(())
        }
        AnalyzeCommand::PmCompliance(args) => {
            let table = CmmsImporter::pm_records_from_path(&args.csv)?;
            let metrics = pm_compliance(&table)?;

            println!("PM compliance analysis ({} records)", metrics.total_pms);
            println!(
                "- on time: {} | late: {} | compliance {:.1}%",
                metrics.on_time_pms, metrics.late_pms, metrics.compliance_rate
            );
            if let Some(average) = metrics.average_days_late {
                println!("- average days late: {:.1}", average);
            }
            println!("- severity: {} (score {})", metrics.severity, metrics.score);

            Ok(())
        }
    }
}

fn seed_demo(repository: &MemoryAssessmentRepository) -> Result<(), ScoringServiceError> {
    repository
        .insert_assessment(Assessment {
            id: AssessmentId(1),
            client_name: "Hawkeye Processing".to_string(),
            site_name: "Cedar Rapids Plant".to_string(),
            asset_class: Some("Rotating Equipment".to_string()),
            industry: Some("Food Processing".to_string()),
            framework_version: "1.0".to_string(),
        })
        .map_err(ScoringServiceError::from)?;

    let questions = [
        demo_question(
            "P-01",
            "Do technicians receive structured reliability training?",
            Pillar::People,
            "Competency",
            TargetRole::Technician,
            QuestionType::Likert,
            false,
            false,
        ),
        demo_question(
            "P-02",
            "Is a skills matrix maintained and reviewed?",
            Pillar::People,
            "Competency",
            TargetRole::Manager,
            QuestionType::Binary,
            true,
            false,
        ),
        demo_question(
            "PR-01",
            "Are lockout/tagout procedures followed on every job?",
            Pillar::Process,
            "Safety",
            TargetRole::Technician,
            QuestionType::Likert,
            true,
            true,
        ),
        demo_question(
            "PR-02",
            "Describe how work orders are prioritized.",
            Pillar::Process,
            "Planning",
            TargetRole::Planner,
            QuestionType::Observational,
            false,
            false,
        ),
        demo_question(
            "T-01",
            "Is the CMMS the single system of record for work history?",
            Pillar::Technology,
            "Systems",
            TargetRole::Manager,
            QuestionType::Binary,
            true,
            false,
        ),
        demo_question(
            "T-02",
            "What percentage of assets have criticality rankings?",
            Pillar::Technology,
            "Asset Data",
            TargetRole::Auditor,
            QuestionType::DataInput,
            false,
            false,
        ),
    ];

    for question in questions {
        repository
            .insert_question(question)
            .map_err(ScoringServiceError::from)?;
    }

    repository
        .insert_observation(
            AssessmentId(1),
            Observation {
                title: "Morning PM route shadowing".to_string(),
                observation_type: "Work Execution".to_string(),
                pillar: Pillar::Process,
                subcategory: Some("Planning".to_string()),
                notes: "Route completed with printed procedure in hand".to_string(),
                pass_fail_result: Some(true),
                severity: None,
            },
        )
        .map_err(ScoringServiceError::from)?;

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn demo_question(
    code: &str,
    text: &str,
    pillar: Pillar,
    subcategory: &str,
    target_role: TargetRole,
    question_type: QuestionType,
    evidence_required: bool,
    is_critical: bool,
) -> Question {
    let scoring_logic = match question_type {
        QuestionType::DataInput => Some(vec![
            ScoringBand {
                lower_bound: 90.0,
                score: 5.0,
            },
            ScoringBand {
                lower_bound: 75.0,
                score: 4.0,
            },
            ScoringBand {
                lower_bound: 50.0,
                score: 3.0,
            },
            ScoringBand {
                lower_bound: 25.0,
                score: 2.0,
            },
            ScoringBand {
                lower_bound: 0.0,
                score: 1.0,
            },
        ]),
        _ => None,
    };

    Question {
        code: code.to_string(),
        text: text.to_string(),
        pillar,
        subcategory: subcategory.to_string(),
        target_role,
        question_type,
        weight: 1.0,
        evidence_required,
        evidence_description: evidence_required
            .then(|| "Attach the supporting record or export".to_string()),
        scoring_logic,
        min_score: 1.0,
        max_score: 5.0,
        is_critical,
        framework_version: "1.0".to_string(),
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
