use actix_web::{web, HttpResponse, Responder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use validator::Validate;

use crate::core::filters::{matches_search, matches_student_filters, ConnectionFilter, StudentFilters};
use crate::core::Recommender;
use crate::models::{
    CandidateKind, Club, ErrorResponse, Group, HealthResponse, MatchProfile, Module,
    RankCandidatesRequest, RankResponse, RankStudentsRequest, Scorable, Student,
};
use crate::services::{CacheKey, CacheManager, ConnectionStore, StoreClient, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreClient>,
    pub cache: Arc<CacheManager>,
    pub connections: Arc<ConnectionStore>,
    pub recommender: Recommender,
    pub max_limit: u16,
}

/// Configure all ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/recommendations/students", web::post().to(rank_students))
        .route("/recommendations/groups", web::post().to(rank_groups))
        .route("/recommendations/clubs", web::post().to(rank_clubs))
        .route("/recommendations/modules", web::post().to(rank_modules));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.connections.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank students endpoint
///
/// POST /api/v1/recommendations/students
///
/// Request body:
/// ```json
/// {
///   "userId": 1,
///   "limit": 20,
///   "minScore": 0,
///   "search": "string",
///   "year": "WiSe 25/26",
///   "major": "string",
///   "interest": "string",
///   "connection": "all|connected|not_connected"
/// }
/// ```
async fn rank_students(
    state: web::Data<AppState>,
    req: web::Json<RankStudentsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let user_id = req.user_id;
    let limit = req.limit.min(state.max_limit) as usize;

    tracing::info!("Ranking students for user: {}, limit: {}", user_id, limit);

    // The plain listing is cacheable; connection events drop these entries
    // because they move candidates between mine and others
    let cacheable = req.search.is_none()
        && req.year.is_none()
        && req.major.is_none()
        && req.interest.is_none()
        && req.connection == ConnectionFilter::All
        && req.min_score == 0;
    let cache_key = CacheKey::ranking(CandidateKind::Student, user_id, limit);

    if cacheable {
        if let Ok(cached) = state.cache.get::<RankResponse<Student>>(&cache_key).await {
            tracing::debug!("Ranking cache hit for {}", cache_key);
            return HttpResponse::Ok().json(cached);
        }
    }

    let connections = match state.connections.accepted_ids(user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(
                "Failed to fetch connections for {}, proceeding without: {}",
                user_id,
                e
            );
            vec![]
        }
    };

    let mut me = match state.store.get_student(user_id).await {
        Ok(student) => student,
        Err(e) => return store_error("Failed to fetch student profile", e),
    };

    let clubs = match cached_collection(&state, CandidateKind::Club, || state.store.list_clubs())
        .await
    {
        Ok(clubs) => clubs,
        Err(e) => return store_error("Failed to fetch clubs", e),
    };

    let mut students = match cached_collection(&state, CandidateKind::Student, || {
        state.store.list_students()
    })
    .await
    {
        Ok(students) => students,
        Err(e) => return store_error("Failed to fetch students", e),
    };

    // Club memberships feed the shared-affiliation score term
    me.club_ids = clubs
        .iter()
        .filter(|c| c.has_member(user_id))
        .map(|c| c.id)
        .collect();
    crate::services::enrich_with_club_ids(&mut students, &clubs);

    let profile = MatchProfile::from_student(&me);

    let filters = StudentFilters {
        search: req.search.clone(),
        year: req.year.clone(),
        major: req.major.clone(),
        interest: req.interest.clone(),
        connection: req.connection,
    };

    let candidates: Vec<Student> = students
        .into_iter()
        .filter(|s| s.id != user_id)
        .filter(|s| matches_student_filters(s, &filters, &connections))
        .collect();

    let mut result = state.recommender.partition(
        &profile,
        candidates,
        CandidateKind::Student,
        |s: &Student| connections.contains(&s.id),
    );

    if req.min_score > 0 {
        result.others.retain(|s| s.match_score >= req.min_score);
    }
    result.recommended.truncate(limit);
    result.others.truncate(limit);

    let response = RankResponse {
        mine: result.mine,
        recommended: result.recommended,
        others: result.others,
        total_candidates: result.total_candidates,
    };

    if cacheable {
        if let Err(e) = state.cache.set(&cache_key, &response).await {
            tracing::warn!("Failed to cache ranking {}: {}", cache_key, e);
        }
    }

    tracing::info!(
        "Returning {} recommended / {} other students for user {} (from {} candidates)",
        response.recommended.len(),
        response.others.len(),
        user_id,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Rank groups endpoint
///
/// POST /api/v1/recommendations/groups
async fn rank_groups(
    state: web::Data<AppState>,
    req: web::Json<RankCandidatesRequest>,
) -> impl Responder {
    rank_collection(
        &state,
        &req,
        CandidateKind::Group,
        cached_collection(&state, CandidateKind::Group, || state.store.list_groups()),
        |g: &Group, query| matches_search(&g.name, &g.desc, query),
        |g: &Group, user_id, _profile| g.member_ids.contains(&user_id),
    )
    .await
}

/// Rank clubs endpoint
///
/// POST /api/v1/recommendations/clubs
async fn rank_clubs(
    state: web::Data<AppState>,
    req: web::Json<RankCandidatesRequest>,
) -> impl Responder {
    rank_collection(
        &state,
        &req,
        CandidateKind::Club,
        cached_collection(&state, CandidateKind::Club, || state.store.list_clubs()),
        |c: &Club, query| matches_search(&c.name, &c.desc, query),
        |c: &Club, user_id, _profile| c.has_member(user_id),
    )
    .await
}

/// Rank modules endpoint
///
/// POST /api/v1/recommendations/modules
async fn rank_modules(
    state: web::Data<AppState>,
    req: web::Json<RankCandidatesRequest>,
) -> impl Responder {
    rank_collection(
        &state,
        &req,
        CandidateKind::Module,
        cached_collection(&state, CandidateKind::Module, || state.store.list_modules()),
        |m: &Module, query| matches_search(&m.title, &m.desc, query),
        |m: &Module, _user_id, profile| profile.courses.contains(&m.title),
    )
    .await
}

/// Shared ranking flow for the kinds without student-specific filters.
///
/// `list` is lazy: it is only awaited when the response cache misses.
async fn rank_collection<T, Fut, S, M>(
    state: &web::Data<AppState>,
    req: &RankCandidatesRequest,
    kind: CandidateKind,
    list: Fut,
    search: S,
    is_mine: M,
) -> HttpResponse
where
    T: Scorable + Clone + Serialize + DeserializeOwned,
    Fut: Future<Output = Result<Vec<T>, StoreError>>,
    S: Fn(&T, &str) -> bool,
    M: Fn(&T, i64, &MatchProfile) -> bool,
{
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let user_id = req.user_id;
    let limit = req.limit.min(state.max_limit) as usize;

    tracing::info!(
        "Ranking {} for user: {}, limit: {}",
        kind.as_str(),
        user_id,
        limit
    );

    // The plain listing (no search, no cutoff) is the hot path and safe to
    // cache: membership and tags only change through the main backend
    let cacheable = req.search.is_none() && req.min_score == 0;
    let cache_key = CacheKey::ranking(kind, user_id, limit);

    if cacheable {
        if let Ok(cached) = state.cache.get::<RankResponse<T>>(&cache_key).await {
            tracing::debug!("Ranking cache hit for {}", cache_key);
            return HttpResponse::Ok().json(cached);
        }
    }

    let me = match state.store.get_student(user_id).await {
        Ok(student) => student,
        Err(e) => return store_error("Failed to fetch student profile", e),
    };
    let profile = MatchProfile::from_student(&me);

    let candidates = match list.await {
        Ok(items) => items,
        Err(e) => return store_error("Failed to fetch candidates", e),
    };

    let candidates: Vec<T> = match &req.search {
        Some(query) => candidates
            .into_iter()
            .filter(|item| search(item, query))
            .collect(),
        None => candidates,
    };

    let mut result = state
        .recommender
        .partition(&profile, candidates, kind, |item: &T| {
            is_mine(item, user_id, &profile)
        });

    if req.min_score > 0 {
        result.others.retain(|s| s.match_score >= req.min_score);
    }
    result.recommended.truncate(limit);
    result.others.truncate(limit);

    let response = RankResponse {
        mine: result.mine,
        recommended: result.recommended,
        others: result.others,
        total_candidates: result.total_candidates,
    };

    if cacheable {
        if let Err(e) = state.cache.set(&cache_key, &response).await {
            tracing::warn!("Failed to cache ranking {}: {}", cache_key, e);
        }
    }

    tracing::info!(
        "Returning {} recommended / {} other {} for user {}",
        response.recommended.len(),
        response.others.len(),
        kind.as_str(),
        user_id
    );

    HttpResponse::Ok().json(response)
}

/// Read a collection through the cache, falling back to the store
async fn cached_collection<T, F, Fut>(
    state: &web::Data<AppState>,
    kind: CandidateKind,
    fetch: F,
) -> Result<Vec<T>, StoreError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, StoreError>>,
{
    let key = CacheKey::collection(kind);

    if let Ok(items) = state.cache.get::<Vec<T>>(&key).await {
        return Ok(items);
    }

    let items = fetch().await?;

    if let Err(e) = state.cache.set(&key, &items).await {
        tracing::warn!("Failed to cache {} collection: {}", kind.as_str(), e);
    }

    Ok(items)
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn store_error(context: &str, e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(message) => {
            tracing::info!("{}: {}", context, message);
            HttpResponse::NotFound().json(ErrorResponse {
                error: context.to_string(),
                message,
                status_code: 404,
            })
        }
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}
