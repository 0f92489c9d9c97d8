use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use talent_ninebox::config::AppConfig;
use talent_ninebox::error::AppError;
use talent_ninebox::ninebox::{
    ninebox_router, AssessmentService, AssessmentServiceError, AxisDecision, BiasRisk, EmployeeId,
    InMemoryAssessmentStore, InMemoryRawSources, InMemorySignalStore, MappingRegistry,
    RawSourceKind, SaveAssessmentRequest, SignalCategory, SignalSnapshot, TenantId,
};
use talent_ninebox::telemetry;
use tracing::info;

type DemoService =
    AssessmentService<InMemoryAssessmentStore, InMemorySignalStore, InMemoryRawSources>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Talent Nine-Box Engine",
    about = "Score, place, and audit employee nine-box assessments from the command line",
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
    /// Run a scoring walkthrough against bundled sample data
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Write the saved assessment's evidence trail to a CSV file
    #[arg(long)]
    evidence_csv: Option<PathBuf>,
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
        Command::Demo(args) => run_demo(args),
    }
}

fn build_service(config: &AppConfig) -> Result<(Arc<DemoService>, TenantId), AppError> {
    let tenant = TenantId(config.policy.tenant.clone());
    let registry = Arc::new(MappingRegistry::new());
    registry
        .initialize_defaults(&tenant)
        .map_err(AssessmentServiceError::from)?;

    let service = Arc::new(AssessmentService::new(
        registry,
        Arc::new(InMemorySignalStore::new()),
        Arc::new(InMemoryRawSources::new()),
        Arc::new(InMemoryAssessmentStore::new()),
        config.policy.review_threshold,
    ));
    Ok((service, tenant))
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let (service, tenant) = build_service(&config)?;

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(ninebox_router(service, tenant))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "nine-box rating engine ready");

    axum::serve(listener, app).await?;
    Ok(())
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

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry).ok();

    let tenant = TenantId(config.policy.tenant.clone());
    let registry = Arc::new(MappingRegistry::new());
    registry
        .initialize_defaults(&tenant)
        .map_err(AssessmentServiceError::from)?;

    let signals = Arc::new(InMemorySignalStore::new());
    let raw_sources = Arc::new(InMemoryRawSources::new());
    let employee = EmployeeId("emp-0042".to_string());

    raw_sources.set(employee.clone(), RawSourceKind::Appraisal, 4.2);
    raw_sources.set(employee.clone(), RawSourceKind::GoalProgress, 78.3);
    raw_sources.set(employee.clone(), RawSourceKind::AssessmentRating, 3.8);
    signals.insert(
        employee.clone(),
        SignalSnapshot {
            category: SignalCategory::new("leadership"),
            score: 0.82,
            confidence: 0.9,
            bias_risk: BiasRisk::Low,
            is_current: true,
        },
    );
    signals.insert(
        employee.clone(),
        SignalSnapshot {
            category: SignalCategory::new("leadership"),
            score: 0.75,
            confidence: 0.8,
            bias_risk: BiasRisk::Medium,
            is_current: true,
        },
    );
    signals.insert(
        employee.clone(),
        SignalSnapshot {
            category: SignalCategory::new("learning_agility"),
            score: 0.7,
            confidence: 0.75,
            bias_risk: BiasRisk::Low,
            is_current: true,
        },
    );

    let service: Arc<DemoService> = Arc::new(AssessmentService::new(
        registry,
        signals,
        raw_sources,
        Arc::new(InMemoryAssessmentStore::new()),
        config.policy.review_threshold,
    ));

    let suggested = service.compute_suggested_ratings(&tenant, &employee)?;
    println!("Nine-box scoring demo for {}", employee.0);
    for axis in [&suggested.performance, &suggested.potential] {
        println!(
            "  {:<12} score {:.4}  confidence {:.2}  rating {}  ({:?})",
            axis.axis.label(),
            axis.score,
            axis.confidence,
            axis.rating,
            axis.status
        );
        for source in &axis.sources {
            println!(
                "    - {:<32} value {:.4}  weight {:.2}",
                source.label, source.value, source.weight
            );
        }
    }
    if let Some(quadrant) = &suggested.quadrant {
        println!(
            "  placement: {} - {}",
            quadrant.display_label(),
            quadrant.description
        );
    }

    let saved = service.save_assessment(
        &tenant,
        SaveAssessmentRequest {
            employee: employee.clone(),
            performance: AxisDecision {
                rating: suggested.performance.rating,
                overridden: false,
                justification: None,
            },
            potential: AxisDecision {
                rating: 3,
                overridden: true,
                justification: Some("Calibration session agreed on top-band potential".to_string()),
            },
            notes: Some("Demo walkthrough".to_string()),
            assessor: "demo-manager".to_string(),
            assessed_on: None,
        },
    )?;
    println!(
        "Saved assessment {} (performance {}, potential {})",
        saved.id.0, saved.performance_rating, saved.potential_rating
    );

    let evidence = service.get_evidence(saved.id)?;
    println!("Evidence trail ({} records):", evidence.len());
    for record in &evidence {
        println!(
            "  [{}] {:<32} {}",
            record.axis.label(),
            record.source.label(),
            record.summary
        );
    }

    if let Some(path) = args.evidence_csv {
        let file = File::create(&path)?;
        talent_ninebox::ninebox::export::write_evidence_csv(file, &evidence)?;
        println!("Evidence exported to {}", path.display());
    }

    Ok(())
}
