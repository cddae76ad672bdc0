// 🌐 REST API - axum router over the expense service
// Handlers only extract, delegate to `service`, and shape the JSON reply

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::ExpenseStore;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::service;
use crate::validation::CreateExpenseRequest;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ExpenseStore>,
    /// How long a single store call may run before the request gives up
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn ExpenseStore>, request_timeout: Duration) -> Self {
        Self {
            store,
            request_timeout,
        }
    }

    /// Run a store operation off the async runtime.
    ///
    /// On timeout the call is abandoned and reported as a persistence
    /// failure; it is not retried.
    async fn run<T, F>(&self, op: F) -> ExpenseResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ExpenseStore) -> ExpenseResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || op(store.as_ref()));

        match tokio::time::timeout(self.request_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(anyhow!("store task failed: {}", join_err).into()),
            Err(_) => Err(anyhow!(
                "store call timed out after {}ms",
                self.request_timeout.as_millis()
            )
            .into()),
        }
    }
}

// ============================================================================
// Response Shapes
// ============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct CreatedResponse {
    message: &'static str,
    expense: Expense,
}

#[derive(Serialize)]
struct ListResponse {
    expenses: Vec<Expense>,
}

#[derive(Serialize)]
struct TotalResponse {
    total: f64,
}

#[derive(Serialize)]
struct DeletedResponse {
    message: &'static str,
    id: i64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// First `category` value in the query string; later repeats are ignored
fn category_filter(params: &[(String, String)]) -> Option<String> {
    params
        .iter()
        .find(|(key, _)| key == "category")
        .map(|(_, value)| value.clone())
}

impl IntoResponse for ExpenseError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ExpenseError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ExpenseError::NotFound(_) => (StatusCode::NOT_FOUND, "expense not found".to_string()),
            ExpenseError::Persistence(err) => {
                tracing::error!(error = ?err, "persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// POST /expenses - Create an expense
async fn create_expense(
    State(state): State<AppState>,
    payload: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> ExpenseResult<impl IntoResponse> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "rejected create body");
        ExpenseError::validation("invalid request body")
    })?;

    let expense = state
        .run(move |store| service::create_expense(store, &request))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Expense added successfully",
            expense,
        }),
    ))
}

/// GET /expenses[?category=X] - List expenses, newest first
async fn list_expenses(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ExpenseResult<impl IntoResponse> {
    let category = category_filter(&params);
    let expenses = state
        .run(move |store| service::list_expenses(store, category.as_deref()))
        .await?;

    Ok(Json(ListResponse { expenses }))
}

/// GET /expenses/total[?category=X] - Sum of amounts
async fn total_expenses(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ExpenseResult<impl IntoResponse> {
    let category = category_filter(&params);
    let total = state
        .run(move |store| service::total_expenses(store, category.as_deref()))
        .await?;

    Ok(Json(TotalResponse { total }))
}

/// DELETE /expenses/:id - Delete an expense
async fn delete_expense(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ExpenseResult<impl IntoResponse> {
    let id = state
        .run(move |store| service::delete_expense(store, &raw_id))
        .await?;

    Ok(Json(DeletedResponse {
        message: "Expense deleted successfully",
        id,
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/total", get(total_expenses))
        .route("/expenses/:id", delete(delete_expense))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
