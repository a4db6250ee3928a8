//! Tests for `RepositoryError` and its context.

use medifind::api::HospitalId;
use medifind::db::repository::{ErrorContext, RepositoryError};
use medifind::services::CrowdLevelError;
use serde_json::json;

#[test]
fn test_error_context_renders_only_set_fields() {
    assert_eq!(ErrorContext::default().to_string(), "[]");
    assert_eq!(
        ErrorContext::new("list_hospitals").to_string(),
        "[operation=list_hospitals]"
    );

    let ctx = ErrorContext::default()
        .with_entity("booking")
        .with_details("pool checkout");
    assert!(ctx.operation.is_none());
    assert_eq!(ctx.to_string(), "[entity=booking, details=pool checkout]");
}

#[test]
fn test_error_context_builders_fill_every_field() {
    let id = HospitalId::generate();
    let ctx = ErrorContext::new("get_hospital")
        .with_entity("hospital")
        .with_entity_id(id)
        .with_details("lookup");

    assert_eq!(
        ctx.to_string(),
        format!("[operation=get_hospital, entity=hospital, id={}, details=lookup]", id)
    );
}

#[test]
fn test_error_display_includes_message_and_context() {
    let err = RepositoryError::not_found_with_context(
        "Hospital not found",
        ErrorContext::new("get_hospital"),
    );
    assert_eq!(
        err.to_string(),
        "Not found: Hospital not found [operation=get_hospital]"
    );
    assert_eq!(err.message(), "Hospital not found");
}

#[test]
fn test_with_operation_overrides_context() {
    let err = RepositoryError::query("boom").with_operation("list_bookings");
    assert_eq!(err.context().operation.as_deref(), Some("list_bookings"));
}

#[test]
fn test_with_entity_id_sets_context() {
    let id = HospitalId::generate();
    let err = RepositoryError::validation("bad data").with_entity_id(id);
    assert_eq!(err.context().entity_id, Some(id.to_string()));
}

#[test]
fn test_client_error_classification() {
    assert!(RepositoryError::not_found("x").is_client_error());
    assert!(RepositoryError::invalid_identifier("x").is_client_error());
    assert!(!RepositoryError::connection("x").is_client_error());
    assert!(!RepositoryError::validation("x").is_client_error());
    assert!(!RepositoryError::configuration("x").is_client_error());
    assert!(!RepositoryError::internal("x").is_client_error());
}

#[test]
fn test_constructors_pick_variant_and_keep_context() {
    let err = RepositoryError::invalid_identifier_with_context(
        "Invalid Hospital ID",
        ErrorContext::new("get_hospital").with_entity_id("not-an-id"),
    );
    assert!(matches!(err, RepositoryError::InvalidIdentifier { .. }));
    assert_eq!(
        err.to_string(),
        "Invalid identifier: Invalid Hospital ID [operation=get_hospital, id=not-an-id]"
    );

    let err = RepositoryError::configuration("missing url").with_operation("open");
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    assert_eq!(err.message(), "missing url");
    assert_eq!(err.context().to_string(), "[operation=open]");
}

#[test]
fn test_from_crowd_level_error_is_server_side() {
    let err: RepositoryError = CrowdLevelError::MalformedWaitTime {
        value: json!("soon"),
    }
    .into();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert!(!err.is_client_error());
    assert!(err.message().contains("soon"));
}
