//! HTTP surface: `POST /qa` plus health routes

mod dto;
mod routes;

pub use dto::{ErrorResponse, HealthResponse, MessageResponse, QaRequest, QaResponse};
pub use routes::{AppState, router, serve, status_for};
