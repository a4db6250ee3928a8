//! HTTP server module for the MediFind backend.
//!
//! This module provides an axum-based HTTP server that exposes the hospital
//! directory and booking service as a JSON API. Handlers stay thin and call
//! into the data access layer in `db::services`.
//!
//! Request flow:
//!
//! ```text
//! router.rs    routes, CORS, gzip, tracing, body limit, static fallback
//!     |
//! handlers.rs  extract path / query / JSON body, shape the response
//!     |
//! db::services id parsing, booking stamping, crowd level
//!     |
//! FullRepository (local or Postgres)
//! ```
//!
//! Failures come back as [`error::AppError`], which picks the status code.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
