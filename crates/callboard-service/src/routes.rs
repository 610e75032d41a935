//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{calls, health, leaderboard, likes, profile};
use crate::state::AppState;

/// Maximum concurrent requests for call provider endpoints.
/// Each one holds an outbound request to the provider.
const CALL_MAX_CONCURRENT_REQUESTS: usize = 20;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Calls (rate-limited)
/// - `POST /proxy-call` - Debit a coin and place a call
/// - `POST /proxy-remove-call` - Cancel a queued call
/// - `GET /get-call-info/:call_id` - Call details and recording URL
///
/// ## API (rate-limited)
/// - `GET /api/likes` - Heart counts
/// - `POST /api/likes/:id` - Toggle a like
/// - `GET /api/user-likes/:userId` - Items a user likes
/// - `GET /api/user-profile/:userId` - Coins, flags and achievements
/// - `POST /api/user-achievement-date/:userId` - When an achievement was unlocked
/// - `POST /api/add-coins` - Credit coins
/// - `POST /api/add-coins-for-share` - One-time share bonus
/// - `POST /api/toggle-hide-me` - Toggle leaderboard anonymity
/// - `GET /api/top-users` - Leaderboard with names
/// - `GET /api/coins/:userId/transactions` - Coin journal
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let call_routes = Router::new()
        .route("/proxy-call", post(calls::place_call))
        .route("/proxy-remove-call", post(calls::remove_call))
        .route("/get-call-info/:call_id", get(calls::get_call_info))
        .layer(ConcurrencyLimitLayer::new(CALL_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Likes
        .route("/likes", get(likes::list_likes))
        .route("/likes/:id", post(likes::toggle_like))
        .route("/user-likes/:userId", get(likes::user_likes))
        // Profile
        .route("/user-profile/:userId", get(profile::get_user_profile))
        .route(
            "/user-achievement-date/:userId",
            post(profile::get_achievement_date),
        )
        .route("/add-coins", post(profile::add_coins))
        .route("/add-coins-for-share", post(profile::add_coins_for_share))
        .route("/toggle-hide-me", post(profile::toggle_hide_me))
        .route("/coins/:userId/transactions", get(profile::list_transactions))
        // Leaderboard
        .route("/top-users", get(leaderboard::top_users))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        .merge(call_routes)
        .nest("/api", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
