use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    CandidateKind, ConnectionActionRequest, ConnectionActionResponse, ConnectionsResponse,
    ErrorResponse,
};
use crate::routes::recommendations::AppState;
use crate::services::{CacheKey, ConnectionError, RequestOutcome};

/// Configure all connection routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/connections/request", web::post().to(request_connection))
        .route("/connections/accept", web::post().to(accept_connection))
        .route("/connections/cancel", web::post().to(cancel_connection))
        .route("/connections", web::get().to(get_connections))
        .route("/connections/stats", web::get().to(get_connection_stats));
}

/// Request a connection endpoint
///
/// POST /api/v1/connections/request
///
/// Request body:
/// ```json
/// {
///   "userId": 1,
///   "targetUserId": 2
/// }
/// ```
///
/// Responds with `"pending"` or, when the other side already asked,
/// `"connected"`.
async fn request_connection(
    state: web::Data<AppState>,
    req: web::Json<ConnectionActionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .connections
        .request(req.user_id, req.target_user_id)
        .await
    {
        Ok(outcome) => {
            invalidate_student_rankings(&state, &[req.user_id, req.target_user_id]).await;

            tracing::debug!(
                "Connection request {} -> {}: {:?}",
                req.user_id,
                req.target_user_id,
                outcome
            );

            HttpResponse::Ok().json(ConnectionActionResponse {
                success: true,
                status: outcome,
            })
        }
        Err(ConnectionError::InvalidInput(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid connection request".to_string(),
                message,
                status_code: 400,
            })
        }
        Err(e) => connection_store_error(e),
    }
}

/// Accept an incoming connection request
///
/// POST /api/v1/connections/accept
async fn accept_connection(
    state: web::Data<AppState>,
    req: web::Json<ConnectionActionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .connections
        .accept(req.user_id, req.target_user_id)
        .await
    {
        Ok(true) => {
            invalidate_student_rankings(&state, &[req.user_id, req.target_user_id]).await;

            HttpResponse::Ok().json(ConnectionActionResponse {
                success: true,
                status: RequestOutcome::Connected,
            })
        }
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "No pending request".to_string(),
            message: format!(
                "User {} has no open request towards user {}",
                req.target_user_id, req.user_id
            ),
            status_code: 404,
        }),
        Err(e) => connection_store_error(e),
    }
}

/// Withdraw an outgoing connection request
///
/// POST /api/v1/connections/cancel
async fn cancel_connection(
    state: web::Data<AppState>,
    req: web::Json<ConnectionActionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .connections
        .cancel(req.user_id, req.target_user_id)
        .await
    {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "No pending request".to_string(),
            message: format!(
                "User {} has no open request towards user {}",
                req.user_id, req.target_user_id
            ),
            status_code: 404,
        }),
        Err(e) => connection_store_error(e),
    }
}

/// Get a user's connection graph
///
/// GET /api/v1/connections?userId={userId}
async fn get_connections(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let user_id = match query.get("userId").and_then(|v| v.parse::<i64>().ok()) {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing userId parameter".to_string(),
                message: "userId query parameter is required and must be numeric".to_string(),
                status_code: 400,
            });
        }
    };

    let connections = state.connections.accepted_ids(user_id).await;
    let incoming = state.connections.incoming_pending(user_id).await;
    let outgoing = state.connections.outgoing_pending(user_id).await;

    match (connections, incoming, outgoing) {
        (Ok(connections), Ok(incoming), Ok(outgoing)) => {
            HttpResponse::Ok().json(ConnectionsResponse {
                user_id,
                connections,
                incoming,
                outgoing,
            })
        }
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => connection_store_error(e),
    }
}

/// Get connection statistics for a user, for client synchronization and
/// debugging purposes
///
/// GET /api/v1/connections/stats?userId={userId}
async fn get_connection_stats(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let user_id = match query.get("userId").and_then(|v| v.parse::<i64>().ok()) {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing userId parameter".to_string(),
                message: "userId query parameter is required and must be numeric".to_string(),
                status_code: 400,
            });
        }
    };

    match state.connections.stats(user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => connection_store_error(e),
    }
}

/// Accepted edges change the mine/others split of the student ranking, so
/// cached rankings for both ends are dropped
async fn invalidate_student_rankings(state: &web::Data<AppState>, user_ids: &[i64]) {
    for user_id in user_ids {
        let pattern = CacheKey::ranking_pattern(CandidateKind::Student, *user_id);
        if let Err(e) = state.cache.invalidate_pattern(&pattern).await {
            tracing::warn!("Failed to invalidate ranking cache {}: {}", pattern, e);
        }
    }
}

fn connection_store_error(e: ConnectionError) -> HttpResponse {
    tracing::error!("Connection store error: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Connection store error".to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}
