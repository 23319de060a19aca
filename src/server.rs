use crate::aggregate::RepositoryAggregator;
use crate::error::{ProxyError, Result};
use crate::github::client::RepositorySource;
use crate::github::types::{Lookup, RepositoryResult};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct AppState {
    aggregator: RepositoryAggregator,
}

impl AppState {
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        Self {
            aggregator: RepositoryAggregator::new(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    UserNotFound,
    RouteNotFound,
    InvalidPath(PathRejection),
    Upstream(ProxyError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::UserNotFound => "User not found",
            ApiError::RouteNotFound => "Not found",
            ApiError::InvalidPath(_) => "Invalid username",
            ApiError::Upstream(_) => "Upstream request failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(e) => error!(error = %e, "responding with upstream failure"),
            ApiError::InvalidPath(rejection) => debug!(%rejection, "rejected request path"),
            _ => {}
        }
        let status = self.status();
        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/{username}/repositories", get(get_repositories))
        .fallback(|| async { ApiError::RouteNotFound })
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn get_repositories(
    State(state): State<AppState>,
    username: std::result::Result<Path<String>, PathRejection>,
) -> std::result::Result<Json<Vec<RepositoryResult>>, ApiError> {
    let Path(username) = username.map_err(ApiError::InvalidPath)?;
    match state.aggregator.collect(&username).await {
        Ok(Lookup::Found(repos)) => Ok(Json(repos)),
        Ok(Lookup::NotFound) => Err(ApiError::UserNotFound),
        Err(e) => Err(ApiError::Upstream(e)),
    }
}

// Drains in-flight requests once `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
