use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResumeRequest {
    #[validate(url(message = "url must be a well-formed URL"))]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub res: String,
}
