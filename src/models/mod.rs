pub mod published_quiz;
pub mod quiz;
