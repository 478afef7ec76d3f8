use axum::extract::State;
use url::Url;
use validator::Validate;

use crate::{
    dto::resume_dto::{ResumeRequest, ResumeResponse},
    error::{Error, Result},
    utils::extract::Json,
    AppState,
};

#[axum::debug_handler]
pub async fn make_resume(
    State(state): State<AppState>,
    Json(payload): Json<ResumeRequest>,
) -> Result<Json<ResumeResponse>> {
    payload.validate()?;
    let source = Url::parse(&payload.url).map_err(|e| Error::BadRequest(e.to_string()))?;
    let res = state.resume_service.build_resume(&source).await?;
    Ok(Json(ResumeResponse { res }))
}
