pub mod quiz_dto;
pub mod resume_dto;
pub mod session_dto;
