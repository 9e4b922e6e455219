//! HTTP surface and the verb dispatcher shared by the three services.
//!
//! Each service implements [`Resource`]; [`dispatch`] owns everything the
//! services have in common: preflight, 405, connection checkout and turning
//! errors into envelopes.

pub mod fixtures;
pub mod health;
pub mod roster;
pub mod standings;

use std::collections::HashMap;
use std::future::Future;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get, post},
    Router,
};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::envelope::{ApiRequest, ApiResponse, HttpMethod};
use crate::error::ApiError;

pub use fixtures::Fixtures;
pub use roster::Roster;
pub use standings::Standings;

/// One table-backed service. Every operation runs exactly one statement on
/// the connection it is handed.
pub trait Resource {
    const NAME: &'static str;
    /// Request headers declared in the preflight answer.
    const ALLOW_HEADERS: &'static str = "Content-Type";
    /// Verbs served besides OPTIONS. Anything else is answered with 405.
    const METHODS: &'static [HttpMethod];

    fn list(
        conn: &mut SqliteConnection,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;

    fn create(
        conn: &mut SqliteConnection,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;

    fn replace(
        _conn: &mut SqliteConnection,
        _request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send {
        async { Err(ApiError::MethodNotAllowed) }
    }

    fn remove(
        conn: &mut SqliteConnection,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;
}

/// Routes one invocation to the service's handler for its verb.
pub async fn dispatch<R: Resource>(pool: &SqlitePool, request: &ApiRequest) -> ApiResponse {
    let method = match request.method() {
        Ok(HttpMethod::Options) => return ApiResponse::preflight(R::ALLOW_HEADERS),
        Ok(method) if R::METHODS.contains(&method) => method,
        Ok(method) => {
            tracing::debug!("{} does not serve {}", R::NAME, method);
            return ApiError::MethodNotAllowed.to_envelope();
        }
        Err(unsupported) => {
            tracing::debug!("{} got unsupported method {:?}", R::NAME, unsupported.0);
            return ApiError::MethodNotAllowed.to_envelope();
        }
    };

    match execute::<R>(pool, method, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("{} {} failed", method, R::NAME);
            err.to_envelope()
        }
    }
}

async fn execute<R: Resource>(
    pool: &SqlitePool,
    method: HttpMethod,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    // Returned to the pool when dropped, whichever way this function exits.
    let mut conn = pool.acquire().await?;

    match method {
        HttpMethod::Get => R::list(&mut conn, request).await,
        HttpMethod::Post => R::create(&mut conn, request).await,
        HttpMethod::Put => R::replace(&mut conn, request).await,
        HttpMethod::Delete => R::remove(&mut conn, request).await,
        HttpMethod::Options => Err(ApiError::MethodNotAllowed),
    }
}

pub fn app(pool: SqlitePool) -> Router {
    Router::new()
        .route("/", get(|| async { "League Table API - v1.0" }))
        .route("/health", get(health::health_check))

        // One endpoint per service, any verb
        .route("/api/standings", any(serve::<Standings>))
        .route("/api/fixtures", any(serve::<Fixtures>))
        .route("/api/roster", any(serve::<Roster>))

        // Raw invocation with a request descriptor
        .route("/invoke/{service}", post(invoke))

        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(pool)
}

// ANY /api/{service} - Plain HTTP request reduced to a request descriptor
async fn serve<R: Resource>(
    State(pool): State<SqlitePool>,
    method: Method,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Bytes,
) -> ApiResponse {
    // Unreadable query strings and non-UTF-8 bodies still reach the service,
    // which reads them as absent.
    let request = ApiRequest {
        http_method: Some(method.to_string()),
        body: Some(String::from_utf8_lossy(&body).into_owned()),
        query_string_parameters: Some(query.map(|Query(query)| query).unwrap_or_default()),
    };

    dispatch::<R>(&pool, &request).await
}

// POST /invoke/{service} - Request descriptor in, envelope out
async fn invoke(
    State(pool): State<SqlitePool>,
    Path(service): Path<String>,
    Json(request): Json<ApiRequest>,
) -> Response {
    let envelope = match service.as_str() {
        name if name == Standings::NAME => dispatch::<Standings>(&pool, &request).await,
        name if name == Fixtures::NAME => dispatch::<Fixtures>(&pool, &request).await,
        name if name == Roster::NAME => dispatch::<Roster>(&pool, &request).await,
        _ => {
            return ApiResponse::error(StatusCode::NOT_FOUND, &format!("Unknown service: {service}"))
                .into_response();
        }
    };

    Json(envelope).into_response()
}
