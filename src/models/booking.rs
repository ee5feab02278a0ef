use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::bookings;

// Booking status lifecycle: pending -> confirmed -> processing -> ready ->
// delivered, or cancelled. New bookings always start out pending; the later
// transitions are driven by back-office updates outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub pickup_address: String,
    pub special_instructions: Option<String>,
    pub total_amount: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub pickup_address: String,
    pub special_instructions: Option<String>,
    pub total_amount: BigDecimal,
    pub status: String,
}
