use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{ProfileSearch, SearchError, SortKey};
use crate::models::{ErrorResponse, HealthResponse, SearchRequest};
use crate::routes::auth::JwtVerifier;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub search: ProfileSearch,
    pub verifier: Arc<JwtVerifier>,
    pub expose_internal_errors: bool,
}

/// Configure all profile-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles/search", web::get().to(search_profiles_query))
        .route("/profiles/search", web::post().to(search_profiles_body));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.search.health_check().await;

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search profiles with filters in the query string
///
/// GET /api/v1/profiles/search?gender=female&minAge=25&religion=Islam,Sufi&page=1&limit=10
///
/// Set-valued filters take comma-separated values or a repeated key
/// (`religion=Islam&religion=Hindu`).
async fn search_profiles_query(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
    http_req: HttpRequest,
) -> impl Responder {
    match SearchRequest::from_query_pairs(query.into_inner()) {
        Ok(req) => run_search(&state, req, &http_req).await,
        Err(e) => {
            tracing::info!("Query payload error on {}: {}", http_req.path(), e);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_query".to_string(),
                message: format!("Invalid query: {}", e),
                status_code: 400,
            })
        }
    }
}

/// Search profiles with filters in a JSON body
///
/// POST /api/v1/profiles/search
///
/// Request body:
/// ```json
/// {
///   "gender": "female",
///   "minAge": 25,
///   "maxAge": 32,
///   "religion": ["Islam"],
///   "verified": true,
///   "sort": "newest",
///   "page": 1,
///   "limit": 10
/// }
/// ```
async fn search_profiles_body(
    state: web::Data<AppState>,
    body: web::Json<SearchRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    run_search(&state, body.into_inner(), &http_req).await
}

async fn run_search(state: &AppState, req: SearchRequest, http_req: &HttpRequest) -> HttpResponse {
    let user_id = match state.verifier.authenticate(http_req) {
        Ok(id) => id,
        Err(e) => {
            tracing::info!("Rejected search on {}: {}", http_req.path(), e);
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Unauthorized".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let sort = SortKey::from_key(req.sort.as_deref());

    tracing::info!(
        "Searching profiles for user: {}, page: {:?}, limit: {:?}, sort: {:?}",
        user_id,
        req.page,
        req.limit,
        sort
    );

    match state
        .search
        .search(&req.filters, sort, req.page, req.limit, Some(user_id))
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => search_error_response(&e, state.expose_internal_errors),
    }
}

/// Map a search failure to its HTTP response
///
/// Data-access details are only included when `expose_internal` is set.
pub fn search_error_response(err: &SearchError, expose_internal: bool) -> HttpResponse {
    match err {
        SearchError::InvalidPagination(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid pagination".to_string(),
            message: message.clone(),
            status_code: err.status_code(),
        }),
        SearchError::SearchExecutionFailed(source) => {
            tracing::error!("Profile search failed: {}", source);
            let message = if expose_internal {
                source.to_string()
            } else {
                "An internal error occurred while searching profiles".to_string()
            };
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Search failed".to_string(),
                message,
                status_code: err.status_code(),
            })
        }
    }
}
