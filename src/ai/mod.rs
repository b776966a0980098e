pub mod ai_model;
pub mod client;
pub mod fallback;
