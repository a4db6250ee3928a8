use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use serde_json::Value;
use uuid::Uuid;

use super::schema::{bookings, hospitals};

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = hospitals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at only drives ordering
pub struct HospitalRow {
    pub id: Uuid,
    pub doc: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at only drives ordering
pub struct BookingRow {
    pub id: Uuid,
    pub doc: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = hospitals)]
pub struct NewHospitalRow {
    pub doc: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub doc: Value,
}

#[derive(Debug, Clone, QueryableByName)]
pub struct BookingCountRow {
    #[diesel(sql_type = Text)]
    pub hospital_id: String,
    #[diesel(sql_type = BigInt)]
    pub bookings: i64,
}
