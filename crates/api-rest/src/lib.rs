//! # API REST
//!
//! REST API for the cardio expert system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for wire types and `cardio-core` for inference.

#![warn(rust_2018_idioms)]

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    DiagnoseReq, DiagnoseRes, FiredRule, HealthRes, HealthService, ListRulesRes, ListSymptomsRes,
    RuleRes, SymptomRes,
};
use cardio_core::constants::{CATALOG_MODE_ENV, MAX_PASSES_ENV, RULES_FILE_ENV};
use cardio_core::{CoreConfig, DiagnosisCatalog, Engine, SymptomCatalog};

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    engine: Engine,
    symptoms: Arc<SymptomCatalog>,
    diagnoses: Arc<DiagnosisCatalog>,
}

impl AppState {
    pub fn new(engine: Engine, symptoms: SymptomCatalog, diagnoses: DiagnosisCatalog) -> Self {
        Self {
            engine,
            symptoms: Arc::new(symptoms),
            diagnoses: Arc::new(diagnoses),
        }
    }

    /// Builds state from a resolved core configuration.
    pub fn from_config(cfg: &CoreConfig) -> anyhow::Result<Self> {
        let (engine, symptoms) = cfg.build()?;
        Ok(Self::new(engine, symptoms, DiagnosisCatalog::builtin()))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_symptoms, list_rules, diagnose),
    components(schemas(
        HealthRes,
        DiagnoseReq,
        DiagnoseRes,
        FiredRule,
        SymptomRes,
        ListSymptomsRes,
        RuleRes,
        ListRulesRes,
    ))
)]
pub struct ApiDoc;

/// Resolves the core configuration from process environment variables.
///
/// # Environment Variables
/// - `CARDIO_RULES_FILE`: YAML rule table replacing the built-in rules
/// - `CARDIO_CATALOG`: `questionnaire` (default) or `rules`
/// - `CARDIO_MAX_PASSES`: matcher pass limit override
pub fn config_from_env() -> anyhow::Result<CoreConfig> {
    Ok(CoreConfig::from_env_values(
        std::env::var(RULES_FILE_ENV).ok(),
        std::env::var(CATALOG_MODE_ENV).ok(),
        std::env::var(MAX_PASSES_ENV).ok(),
    )?)
}

/// Builds the REST router with OpenAPI docs and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/symptoms", get(list_symptoms))
        .route("/rules", get(list_rules))
        .route("/diagnose", post(diagnose))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/symptoms",
    responses(
        (status = 200, description = "Questionnaire symptoms in the order they are asked", body = ListSymptomsRes)
    )
)]
#[axum::debug_handler]
async fn list_symptoms(State(state): State<AppState>) -> Json<ListSymptomsRes> {
    let symptoms = state.symptoms.entries().iter().map(SymptomRes::from).collect();
    Json(ListSymptomsRes { symptoms })
}

#[utoipa::path(
    get,
    path = "/rules",
    responses(
        (status = 200, description = "Rule table in scan order", body = ListRulesRes)
    )
)]
#[axum::debug_handler]
async fn list_rules(State(state): State<AppState>) -> Json<ListRulesRes> {
    let rules = state
        .engine
        .registry()
        .rules()
        .iter()
        .map(RuleRes::from)
        .collect();
    Json(ListRulesRes { rules })
}

#[utoipa::path(
    post,
    path = "/diagnose",
    request_body = DiagnoseReq,
    responses(
        (status = 200, description = "Diagnosis for the given symptoms", body = DiagnoseRes),
        (status = 400, description = "Malformed request body")
    )
)]
/// Run inference over a set of symptom identifiers
///
/// Unknown identifiers are accepted and simply never match a rule. An empty list yields an
/// undetermined diagnosis rather than an error.
#[axum::debug_handler]
async fn diagnose(State(state): State<AppState>, Json(req): Json<DiagnoseReq>) -> Json<DiagnoseRes> {
    let inference = state.engine.infer_detailed(&req.symptoms);
    tracing::info!(
        symptoms = req.symptoms.len(),
        diagnosis = %inference.diagnosis,
        "diagnose request"
    );
    Json(DiagnoseRes::from_inference(&inference, &state.diagnoses))
}
