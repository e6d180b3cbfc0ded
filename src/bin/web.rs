//! Single binary REST server for the tournament service.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; override with env: HOST, PORT.
//!
//! Authentication happens upstream (identity provider): handlers trust the
//! `x-user-id` header as the already-authenticated actor/user id.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::Utc;
use pong_tournament::{
    create_match, create_tournament, delete_tournament, finish_match, generate_brackets,
    get_match, get_tournament, join_tournament, leave_tournament, list_matches, list_tournaments,
    matches_for_tournament, tournament_participants, tournament_stats, update_tournament,
    MatchStatus, MemoryStore, NewTournament, TournamentError, TournamentFilter, TournamentId,
    TournamentPatch, User, UserId,
};
use serde::Deserialize;
use uuid::Uuid;

type AppState = Data<MemoryStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterUserBody {
    username: String,
}

#[derive(Deserialize)]
struct CreateMatchBody {
    player1_id: UserId,
    player2_id: UserId,
}

#[derive(Deserialize)]
struct FinishMatchBody {
    player1_score: u32,
    player2_score: u32,
}

#[derive(Deserialize)]
struct MatchQuery {
    status: Option<MatchStatus>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: Uuid,
}

/// The actor id supplied by the identity provider. The core trusts this id;
/// it never sees credentials.
fn actor_id(req: &HttpRequest) -> Result<UserId, HttpResponse> {
    req.headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| {
            HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "missing or invalid x-user-id header" }))
        })
}

/// Map the error taxonomy to HTTP statuses.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::NotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::Forbidden(_) => HttpResponse::Forbidden().json(body),
        TournamentError::Conflict(_) => HttpResponse::Conflict().json(body),
        TournamentError::InvalidState(_) | TournamentError::Unsupported(_) => {
            HttpResponse::BadRequest().json(body)
        }
        TournamentError::Storage(_) => HttpResponse::ServiceUnavailable().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pong-tournament",
    })
}

/// Register a user (display name only; identity is handled upstream).
#[post("/api/users")]
async fn api_register_user(state: AppState, body: Json<RegisterUserBody>) -> HttpResponse {
    use pong_tournament::TournamentStore;
    let username = body.username.trim();
    if username.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "username cannot be empty" }));
    }
    let user = User::new(username, Utc::now());
    match state.save_user(&user) {
        Ok(()) => HttpResponse::Ok().json(user),
        Err(e) => HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Create a tournament (actor becomes the creator).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    req: HttpRequest,
    body: Json<NewTournament>,
) -> HttpResponse {
    let creator = match actor_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match create_tournament(state.get_ref(), body.into_inner(), creator) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// List tournaments with optional status/type/is_public filters and
/// limit/page pagination.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, filter: Query<TournamentFilter>) -> HttpResponse {
    match list_tournaments(state.get_ref(), &filter) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match get_tournament(state.get_ref(), path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Administrative update (creator only).
#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Json<TournamentPatch>,
) -> HttpResponse {
    let actor = match actor_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match update_tournament(state.get_ref(), path.id, &body, actor) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Delete a tournament (creator only; Draft/Open only).
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let actor = match actor_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match delete_tournament(state.get_ref(), path.id, actor) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Join the tournament as the requesting user.
#[post("/api/tournaments/{id}/join")]
async fn api_join_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let user = match actor_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match join_tournament(state.get_ref(), path.id, user) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Leave the tournament as the requesting user.
#[post("/api/tournaments/{id}/leave")]
async fn api_leave_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let user = match actor_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match leave_tournament(state.get_ref(), path.id, user) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Generate the first bracket round (creator only).
#[post("/api/tournaments/{id}/brackets")]
async fn api_generate_brackets(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let actor = match actor_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match generate_brackets(state.get_ref(), path.id, actor, &mut rand::thread_rng()) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/matches")]
async fn api_tournament_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match matches_for_tournament(state.get_ref(), path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/participants")]
async fn api_tournament_participants(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match tournament_participants(state.get_ref(), path.id) {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/stats")]
async fn api_tournament_stats(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match tournament_stats(state.get_ref(), path.id) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_response(&e),
    }
}

/// Create a standalone match between two users.
#[post("/api/matches")]
async fn api_create_match(state: AppState, body: Json<CreateMatchBody>) -> HttpResponse {
    match create_match(state.get_ref(), body.player1_id, body.player2_id) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches")]
async fn api_list_matches(state: AppState, query: Query<MatchQuery>) -> HttpResponse {
    match list_matches(state.get_ref(), query.status) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match get_match(state.get_ref(), path.id) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Report the final score of a match.
#[put("/api/matches/{id}/finish")]
async fn api_finish_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<FinishMatchBody>,
) -> HttpResponse {
    match finish_match(state.get_ref(), path.id, body.player1_score, body.player2_score) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(MemoryStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_register_user)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_update_tournament)
            .service(api_delete_tournament)
            .service(api_join_tournament)
            .service(api_leave_tournament)
            .service(api_generate_brackets)
            .service(api_tournament_matches)
            .service(api_tournament_participants)
            .service(api_tournament_stats)
            .service(api_create_match)
            .service(api_list_matches)
            .service(api_get_match)
            .service(api_finish_match)
    })
    .bind(bind)?
    .run()
    .await
}
