//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! data access layer for storage and derivation.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::Value;

use super::dto::{CreateBookingResponse, HealthResponse, HospitalQuery, HospitalView, StoredBooking};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Hospitals
// =============================================================================

/// GET /api/hospitals?location=<label>
pub async fn list_hospitals(
    State(state): State<AppState>,
    Query(query): Query<HospitalQuery>,
) -> HandlerResult<Vec<HospitalView>> {
    let hospitals =
        db_services::list_hospitals(state.repository.as_ref(), query.location.as_deref()).await?;
    Ok(Json(hospitals))
}

/// GET /api/hospital/{hospital_id}
///
/// 400 when the id is not a storage id, 404 when no hospital has it.
pub async fn get_hospital(
    State(state): State<AppState>,
    Path(hospital_id): Path<String>,
) -> HandlerResult<HospitalView> {
    let hospital = db_services::get_hospital(state.repository.as_ref(), &hospital_id).await?;
    Ok(Json(hospital))
}

// =============================================================================
// Bookings
// =============================================================================

/// POST /api/booking
///
/// Accepts any JSON object and stores it with a generated booking code.
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<CreateBookingResponse> {
    let Json(body) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let fields = match body {
        Value::Object(fields) => fields,
        _ => {
            return Err(AppError::BadRequest(
                "Booking body must be a JSON object".to_string(),
            ))
        }
    };

    let booking = db_services::create_booking(state.repository.as_ref(), fields).await?;
    Ok(Json(CreateBookingResponse::created(booking.booking_id.as_str())))
}

/// GET /api/bookings
pub async fn list_bookings(State(state): State<AppState>) -> HandlerResult<Vec<StoredBooking>> {
    let bookings = db_services::list_bookings(state.repository.as_ref()).await?;
    Ok(Json(bookings))
}
