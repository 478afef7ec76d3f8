use axum::extract::State;
use validator::Validate;

use crate::{
    dto::quiz_dto::GenerateQuizRequest, error::Result, models::quiz::QuizDocument,
    utils::extract::Json, AppState,
};

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<Json<QuizDocument>> {
    payload.validate()?;
    let document = state.ai_service.generate_quiz(&payload.topic).await?;
    Ok(Json(document))
}
