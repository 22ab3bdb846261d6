// Axum API Server Module
//
// Purpose: REST API over the recommendation engine, the submission store
// and the external prediction/report services

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::error::SoilSyncError;
use crate::gateway::report::{build_report_prompt, fallback_suggestions, suggest_applications};
use crate::gateway::{
    FileSubmissionStore, GeminiReportClient, HttpInferenceClient, InferenceClient,
    MemorySubmissionStore, PredictionResult, ReportClient, ReportRequest, ReportResponse,
    Submission, SubmissionStore, DEFAULT_RECENT_LIMIT, HISTORY_CAPACITY,
};
use crate::recommendation::{known_recommendations, SoilParameters};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub inference: Option<Arc<dyn InferenceClient>>,
    pub reports: Option<Arc<dyn ReportClient>>,
    /// Generated reports keyed by serialized request
    pub report_cache: Cache<String, String>,
}

impl AppState {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        let report_cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(300)) // 5 min TTL
            .build();

        Self {
            store,
            inference: None,
            reports: None,
            report_cache,
        }
    }

    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    pub fn with_reports(mut self, client: Arc<dyn ReportClient>) -> Self {
        self.reports = Some(client);
        self
    }

    /// Wire up the store and HTTP clients described by the configuration
    pub fn from_config(config: &ServiceConfig) -> Self {
        let store: Arc<dyn SubmissionStore> = match &config.store_path {
            Some(path) => {
                tracing::info!("Using file submission store at {}", path.display());
                Arc::new(FileSubmissionStore::new(path.clone()))
            }
            None => {
                tracing::info!("Using in-memory submission store");
                Arc::new(MemorySubmissionStore::new())
            }
        };

        let mut state = Self::new(store);

        match &config.inference {
            Some(inference) => {
                tracing::info!("Prediction service: {}", inference.url);
                state = state.with_inference(Arc::new(HttpInferenceClient::new(
                    inference.url.clone(),
                    inference.token.clone(),
                )));
            }
            None => tracing::warn!("Prediction service not configured; /api/predict disabled"),
        }

        match &config.report {
            Some(report) => {
                tracing::info!("Report model: {}", report.model);
                state = state.with_reports(Arc::new(GeminiReportClient::new(
                    report.api_key.clone(),
                    report.model.clone(),
                )));
            }
            None => tracing::warn!("Report service not configured; using fallback suggestions"),
        }

        state
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api", get(api_root))

        // Recommendation engine
        .route("/api/crops", get(list_crops))
        .route("/api/recommendation", post(create_recommendation))
        .route("/api/submission", get(get_submission).delete(clear_submission))
        .route("/api/submissions", get(list_submissions))

        // External services
        .route("/api/predict", post(predict))
        .route("/api/generate-report", post(generate_report))

        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn api_root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Soil Sync API is running" }))
}

async fn list_crops() -> Json<serde_json::Value> {
    let data: Vec<serde_json::Value> = known_recommendations()
        .map(|(crop, recommendation)| {
            serde_json::json!({
                "cropType": crop,
                "recommendation": recommendation,
            })
        })
        .collect();

    Json(serde_json::json!({
        "rows": data.len(),
        "data": data,
    }))
}

/// Resolve, advise and persist one submission
async fn create_recommendation(
    State(state): State<AppState>,
    Json(params): Json<SoilParameters>,
) -> Result<Json<Submission>, AppError> {
    params.validate()?;

    let submission = Submission::from_parameters(params);
    tracing::debug!(
        "Recommendation for {}: {}",
        submission.parameters.crop_type,
        submission.recommendation.name
    );

    // Store I/O may hit disk: run in blocking thread pool
    let store = state.store.clone();
    let saved = submission.clone();
    tokio::task::spawn_blocking(move || store.save(&saved))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(submission))
}

async fn get_submission(State(state): State<AppState>) -> Result<Json<Submission>, AppError> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No submission stored".to_string()))
}

async fn clear_submission(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.clear())
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Deserialize, Debug)]
struct HistoryQuery {
    limit: Option<usize>,
}

/// Past submissions, newest first
async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT).min(HISTORY_CAPACITY);

    let store = state.store.clone();
    let data = tokio::task::spawn_blocking(move || store.recent(limit))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(serde_json::json!({
        "rows": data.len(),
        "data": data,
    })))
}

async fn predict(
    State(state): State<AppState>,
    Json(params): Json<SoilParameters>,
) -> Result<Json<PredictionResult>, AppError> {
    params.validate()?;

    let inference = state
        .inference
        .as_ref()
        .ok_or(SoilSyncError::NotConfigured("prediction service"))?;

    let prediction = inference.predict(&params).await?;

    let suggestions = match &state.reports {
        Some(reports) => suggest_applications(reports.as_ref(), &params, &prediction).await,
        None => fallback_suggestions(),
    };

    Ok(Json(PredictionResult::new(prediction, suggestions)))
}

async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    request.parameters.validate()?;

    let reports = state
        .reports
        .as_ref()
        .ok_or(SoilSyncError::NotConfigured("report service"))?;

    let cache_key = serde_json::to_string(&request).map_err(SoilSyncError::from)?;
    if let Some(report) = state.report_cache.get(&cache_key).await {
        tracing::debug!("Cache hit for report request");
        return Ok(Json(ReportResponse { report }));
    }

    let prompt = build_report_prompt(&request.parameters, request.prediction.as_ref());
    let report = reports.generate(&prompt).await?;

    state.report_cache.insert(cache_key, report.clone()).await;
    Ok(Json(ReportResponse { report }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
    Internal(String),
}

impl From<SoilSyncError> for AppError {
    fn from(err: SoilSyncError) -> Self {
        match err {
            SoilSyncError::Validation(_) => AppError::BadRequest(err.to_string()),
            SoilSyncError::Inference(_) | SoilSyncError::Report(_) => {
                tracing::error!("Upstream service failure: {}", err);
                AppError::Upstream(err.to_string())
            }
            SoilSyncError::NotConfigured(_)
            | SoilSyncError::Storage(_)
            | SoilSyncError::Serialization(_) => {
                tracing::error!("Internal error: {}", err);
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<crate::recommendation::ValidationError> for AppError {
    fn from(err: crate::recommendation::ValidationError) -> Self {
        SoilSyncError::from(err).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
