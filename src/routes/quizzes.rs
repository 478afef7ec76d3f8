use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    dto::{
        quiz_dto::{PublishQuizRequest, PublishedQuizResponse, QuizResponse},
        session_dto::SessionResponse,
    },
    error::Result,
    models::quiz::QuizDocument,
    services::{
        quiz_service::{decode_document, parse_quiz_id},
        session_service::SessionOptions,
    },
    utils::extract::Json,
    AppState,
};

#[axum::debug_handler]
pub async fn publish_quiz(
    State(state): State<AppState>,
    Json(payload): Json<PublishQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let document = QuizDocument::new(payload.quiz)?;
    let record = state
        .quiz_service
        .publish(&document, payload.title.as_deref())
        .await?;
    let url = state.config.share_url(record.id);
    Ok((
        StatusCode::CREATED,
        Json(PublishedQuizResponse::new(&record, url)),
    ))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuizResponse>> {
    let id = parse_quiz_id(&id)?;
    let record = state.quiz_service.get_record(id).await?;
    let document = decode_document(&record)?;
    Ok(Json(QuizResponse {
        id: record.id,
        title: record.title,
        created_at: record.created_at,
        document,
    }))
}

/// Starts a replay session over a published quiz.
#[axum::debug_handler]
pub async fn start_published_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_quiz_id(&id)?;
    let document = state.quiz_service.load(id).await?;
    let (session_id, view) = state.sessions.create(document, SessionOptions::published());
    tracing::info!(quiz_id = %id, session_id = %session_id, "Published quiz session started");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse { session_id, view }),
    ))
}
