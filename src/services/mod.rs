pub mod ai_service;
pub mod quiz_service;
pub mod resume_service;
pub mod session_service;
pub mod session_store;
