//! Hospital documents and their public representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::HospitalId;
use crate::models::Document;
use crate::services::crowd::{crowd_level, BookingCounts, CrowdLevel, CrowdLevelError};

/// A hospital record as held by storage: a storage-assigned id plus whatever
/// fields were seeded.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalDocument {
    pub id: HospitalId,
    pub fields: Document,
}

impl HospitalDocument {
    pub fn new(id: HospitalId, fields: Document) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// Exact match on `location` with case folding. Non-string locations never
    /// match.
    pub fn location_matches(&self, wanted: &str) -> bool {
        self.get("location")
            .and_then(Value::as_str)
            .is_some_and(|loc| loc.to_lowercase() == wanted.to_lowercase())
    }
}

/// Public hospital shape returned by the API.
///
/// Stored fields that are missing come back as `""` (numeric ones included),
/// which clients should read as "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalView {
    pub id: String,
    pub name: Value,
    pub address: Value,
    pub location: Value,
    pub phone: Value,
    pub rating: Value,
    pub available_beds: Value,
    pub distance: Value,
    pub wait_time: Value,
    pub crowd_level: CrowdLevel,
}

impl HospitalView {
    /// Build the public view, computing the crowd level from `counts`.
    ///
    /// The classifier sees `available_beds` as `0` and `wait_time` as
    /// `"0 min"` only when those fields are absent; present but unusable
    /// values are reported as errors.
    pub fn from_document(
        doc: &HospitalDocument,
        counts: &BookingCounts,
    ) -> Result<Self, CrowdLevelError> {
        let id = doc.id.to_string();
        let beds = doc
            .get("available_beds")
            .cloned()
            .unwrap_or_else(|| Value::from(0));
        let wait = doc
            .get("wait_time")
            .cloned()
            .unwrap_or_else(|| Value::from("0 min"));
        let crowd_level = crowd_level(&id, &beds, &wait, counts)?;

        let field = |name: &str| {
            doc.get(name)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()))
        };

        Ok(Self {
            name: field("name"),
            address: field("address"),
            location: field("location"),
            phone: field("phone"),
            rating: field("rating"),
            available_beds: field("available_beds"),
            distance: field("distance"),
            wait_time: field("wait_time"),
            crowd_level,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: Value) -> HospitalDocument {
        let fields = match fields {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        };
        HospitalDocument::new(HospitalId::generate(), fields)
    }

    #[test]
    fn test_view_copies_fields_and_defaults_missing_to_empty_string() {
        let hospital = doc(json!({
            "name": "City General Hospital",
            "rating": 4.5,
            "available_beds": 12,
            "wait_time": "15 min",
            "internal_notes": "not exposed"
        }));

        let view = HospitalView::from_document(&hospital, &BookingCounts::new()).unwrap();
        assert_eq!(view.id, hospital.id.to_string());
        assert_eq!(view.name, json!("City General Hospital"));
        assert_eq!(view.rating, json!(4.5));
        assert_eq!(view.available_beds, json!(12));
        assert_eq!(view.address, json!(""));
        assert_eq!(view.phone, json!(""));
        assert_eq!(view.distance, json!(""));
        assert_eq!(view.crowd_level, CrowdLevel::Empty);

        let out = serde_json::to_value(&view).unwrap();
        assert!(out.get("internal_notes").is_none());
        assert_eq!(out["crowd_level"], json!("Empty"));
    }

    #[test]
    fn test_absent_beds_and_wait_use_classifier_defaults() {
        let hospital = doc(json!({ "name": "Bare" }));
        let mut counts = BookingCounts::new();
        counts.record(hospital.id.to_string(), 1);

        let view = HospitalView::from_document(&hospital, &counts).unwrap();
        // zero beds with a booking
        assert_eq!(view.crowd_level, CrowdLevel::High);
        assert_eq!(view.available_beds, json!(""));
        assert_eq!(view.wait_time, json!(""));
    }

    #[test]
    fn test_present_but_malformed_wait_time_is_an_error() {
        let hospital = doc(json!({ "available_beds": 3, "wait_time": "" }));
        let err = HospitalView::from_document(&hospital, &BookingCounts::new()).unwrap_err();
        assert!(matches!(err, CrowdLevelError::MalformedWaitTime { .. }));
    }

    #[test]
    fn test_null_bed_count_is_an_error() {
        let hospital = doc(json!({ "available_beds": null, "wait_time": "5 min" }));
        let err = HospitalView::from_document(&hospital, &BookingCounts::new()).unwrap_err();
        assert!(matches!(err, CrowdLevelError::MalformedBedCount { .. }));
    }

    #[test]
    fn test_location_matches_case_insensitively_and_exactly() {
        let hospital = doc(json!({ "location": "Downtown" }));
        assert!(hospital.location_matches("downtown"));
        assert!(hospital.location_matches("DOWNTOWN"));
        assert!(!hospital.location_matches("Down"));
        assert!(!hospital.location_matches("Downtown East"));

        let numeric = doc(json!({ "location": 5 }));
        assert!(!numeric.location_matches("5"));
    }
}
