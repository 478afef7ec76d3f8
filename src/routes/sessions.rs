use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        quiz_dto::{GenerateQuizRequest, PublishSessionRequest, PublishedQuizResponse},
        session_dto::{CreateSessionRequest, SelectAnswerRequest, SessionResponse},
    },
    error::{Error, Result},
    models::quiz::QuizDocument,
    services::session_service::{AdvanceOutcome, SelectOutcome, SessionOptions, SessionStatus},
    utils::extract::{optional_json, Json},
    AppState,
};

fn parse_session_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| Error::NotFound("Session does not exist".to_string()))
}

#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let options = payload.options();
    let document = QuizDocument::new(payload.quiz)?;
    let (session_id, view) = state.sessions.create(document, options);
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse { session_id, view }),
    ))
}

#[axum::debug_handler]
pub async fn generate_session(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let document = state.ai_service.generate_quiz(&payload.topic).await?;
    let (session_id, view) = state.sessions.create(document, SessionOptions::default());
    tracing::info!(session_id = %session_id, "Session started from generated quiz");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse { session_id, view }),
    ))
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let session_id = parse_session_id(&id)?;
    let view = state.sessions.view(session_id)?;
    Ok(Json(SessionResponse { session_id, view }))
}

#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let session_id = parse_session_id(&id)?;
    if state.sessions.remove(session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound("Session does not exist".to_string()))
    }
}

#[axum::debug_handler]
pub async fn select_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SelectAnswerRequest>,
) -> Result<Json<SessionResponse>> {
    payload.validate()?;
    let session_id = parse_session_id(&id)?;
    let view = state.sessions.with_session(session_id, |session| {
        match session.select_answer(&payload.answer) {
            SelectOutcome::Recorded { correct } => tracing::debug!(
                session_id = %session_id,
                index = session.current_index(),
                correct,
                "Answer recorded"
            ),
            SelectOutcome::Ignored => tracing::debug!(
                session_id = %session_id,
                "Answer ignored, question already answered"
            ),
        }
        session.view()
    })?;
    Ok(Json(SessionResponse { session_id, view }))
}

#[axum::debug_handler]
pub async fn next_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let session_id = parse_session_id(&id)?;
    let view = state.sessions.with_session(session_id, |session| {
        if let AdvanceOutcome::Completed(score) = session.advance() {
            tracing::info!(
                session_id = %session_id,
                score = score.score,
                total = score.total,
                "Quiz completed"
            );
        }
        session.view()
    })?;
    Ok(Json(SessionResponse { session_id, view }))
}

#[axum::debug_handler]
pub async fn previous_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let session_id = parse_session_id(&id)?;
    let view = state.sessions.with_session(session_id, |session| {
        session.retreat();
        session.view()
    })?;
    Ok(Json(SessionResponse { session_id, view }))
}

/// Replaces the session's quiz with a freshly generated one. Only one
/// generation may be pending per session.
#[axum::debug_handler]
pub async fn regenerate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<Json<SessionResponse>> {
    payload.validate()?;
    let session_id = parse_session_id(&id)?;
    let ticket = state.sessions.begin_generation(session_id)?;
    let document = state.ai_service.generate_quiz(&payload.topic).await?;
    let view = ticket.complete(document)?;
    Ok(Json(SessionResponse { session_id, view }))
}

#[axum::debug_handler]
pub async fn publish_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let payload: PublishSessionRequest = optional_json(&body)?;
    payload.validate()?;
    let session_id = parse_session_id(&id)?;

    let (document, status, options) = state.sessions.with_session(session_id, |session| {
        (session.document().clone(), session.status(), session.options())
    })?;

    if !options.allow_publish {
        return Err(Error::Conflict(
            "Publishing is disabled for this session".to_string(),
        ));
    }
    if status != SessionStatus::Completed {
        return Err(Error::Conflict(
            "The quiz can only be published once it is completed".to_string(),
        ));
    }

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
