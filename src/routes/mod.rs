pub mod generate;
pub mod health;
pub mod quizzes;
pub mod resume;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    cors::cors_layer,
    rate_limit::{new_rps_state, rps_middleware},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/db", get(health::health_db));

    // Routes that call the generative service share a tighter budget.
    let generation_api = Router::new()
        .route("/api/generate-quiz", post(generate::generate_quiz))
        .route("/api/sessions/generate", post(sessions::generate_session))
        .route("/api/sessions/:id/regenerate", post(sessions::regenerate))
        .route("/api/makeresume", post(resume::make_resume))
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(config.generation_rps),
            rps_middleware,
        ));

    let public_api = Router::new()
        .route("/api/quizzes", post(quizzes::publish_quiz))
        .route("/api/quizzes/:id", get(quizzes::get_quiz))
        .route(
            "/api/quizzes/:id/sessions",
            post(quizzes::start_published_session),
        )
        .route("/api/sessions", post(sessions::create_session))
        .route(
            "/api/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/api/sessions/:id/answer", post(sessions::select_answer))
        .route("/api/sessions/:id/next", post(sessions::next_question))
        .route(
            "/api/sessions/:id/previous",
            post(sessions::previous_question),
        )
        .route("/api/sessions/:id/publish", post(sessions::publish_session))
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(config.public_rps),
            rps_middleware,
        ));

    base_routes
        .merge(generation_api)
        .merge(public_api)
        .with_state(state)
        .layer(cors_layer(config.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
