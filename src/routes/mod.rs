pub mod admin;
pub mod error;
pub mod health;
pub mod players;
pub mod results;
pub mod settings;
pub mod words;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/settings", get(settings::get_settings).post(settings::update_setting))
        .route("/words", get(words::list_words).post(words::create_word))
        .route("/words/{id}", put(words::update_word).delete(words::delete_word))
        .route("/players/register", post(players::register_player))
        .route("/players/check/{employee_id}", get(players::check_player))
        .route("/game-results", post(results::submit_result))
        .route("/leaderboard", get(results::leaderboard))
        .route("/admin/login", post(admin::login))
}
