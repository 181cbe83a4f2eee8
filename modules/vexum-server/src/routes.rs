use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vexum_core::ServerDeps;

use crate::auth::jwt::JwtService;
use crate::rest;

#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(deps: Arc<ServerDeps>) -> Self {
        let session = &deps.file_config.session;
        let jwt = JwtService::new(&deps.config.jwt_secret, session.issuer.clone(), session.ttl_hours);
        Self { deps, jwt }
    }

    pub fn pool(&self) -> &PgPool {
        self.deps.pool()
    }
}

pub fn build_router(deps: Arc<ServerDeps>) -> Router {
    let allowed_origins = deps.file_config.server.allowed_origins.clone();
    let state = AppState::new(deps);

    // Credentialed requests need explicit origins; the wildcard is for local use.
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
            .allow_credentials(true)
    };

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            path = %req.uri().path(),
        )
    });

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(rest::auth::login))
        .route("/auth/me", get(rest::auth::me))
        .route("/auth/logout", post(rest::auth::logout))
        // Directory
        .route("/users", get(rest::directory::list_users))
        .route("/users/{id}", get(rest::directory::get_user))
        .route("/teams", get(rest::directory::list_teams))
        .route("/meeting-types", get(rest::directory::meeting_types))
        // Meetings
        .route(
            "/meetings",
            get(rest::meetings::list_meetings).post(rest::meetings::create_meeting),
        )
        .route(
            "/meetings/{id}",
            get(rest::meetings::get_meeting).patch(rest::meetings::update_meeting),
        )
        .route("/meetings/{id}/participants", post(rest::meetings::add_participant))
        .route("/agenda-items", post(rest::meetings::create_agenda_item))
        .route(
            "/agenda-items/{id}",
            patch(rest::meetings::update_agenda_item).delete(rest::meetings::delete_agenda_item),
        )
        .route("/links", post(rest::meetings::create_link))
        .route("/links/{id}", delete(rest::meetings::delete_link))
        // Decisions, actions, issues, check-ins
        .route(
            "/decisions",
            get(rest::tracking::list_decisions).post(rest::tracking::create_decision),
        )
        .route("/decisions/{id}", patch(rest::tracking::update_decision))
        .route(
            "/actions",
            get(rest::tracking::list_actions).post(rest::tracking::create_action),
        )
        .route("/actions/triage", post(rest::tracking::triage_actions))
        .route("/actions/{id}", patch(rest::tracking::update_action))
        .route("/triage", get(rest::tracking::list_triage))
        .route(
            "/issues",
            get(rest::tracking::list_issues).post(rest::tracking::create_issue),
        )
        .route("/issues/{id}", patch(rest::tracking::update_issue))
        .route("/issues/{id}/postpone", post(rest::tracking::postpone_issue))
        .route(
            "/issues/{id}/convert-to-action",
            post(rest::tracking::convert_issue),
        )
        .route("/check-ins", post(rest::tracking::submit_check_in))
        .route("/quick-capture", post(rest::capture::quick_capture))
        // Broadcasts
        .route(
            "/broadcasts",
            get(rest::broadcasts::list_broadcasts).post(rest::broadcasts::create_broadcast),
        )
        .route("/broadcasts/{id}/consume", post(rest::broadcasts::consume_broadcast))
        // Clients
        .route(
            "/clients",
            get(rest::clients::list_clients).post(rest::clients::create_client),
        )
        .route("/clients/{id}", patch(rest::clients::update_client))
        .route("/initiatives", post(rest::clients::create_initiative))
        .route("/initiatives/{id}", patch(rest::clients::update_initiative))
        .route("/client-summaries", post(rest::clients::submit_summary))
        .route("/proposal-seeds", post(rest::clients::create_proposal_seed))
        .route("/proposal-seeds/{id}", patch(rest::clients::update_proposal_seed))
        // Strategy
        .route("/strategy-priorities", post(rest::strategy::upsert_priority))
        .route("/strategy-not-doing", post(rest::strategy::create_not_doing))
        .route("/strategy-allocations", post(rest::strategy::create_allocation))
        .route("/rule-updates", post(rest::strategy::create_rule_update))
        // Radar and dashboard
        .route("/radar", get(rest::radar::scan))
        .route("/snooze", post(rest::radar::snooze))
        .route("/dashboard", get(rest::radar::dashboard))
}

async fn health() -> &'static str {
    "ok"
}
