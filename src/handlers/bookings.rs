use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::booking::{Booking, NewBooking};
use crate::models::service::Service;
use crate::schema::{bookings, services};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    pub pickup_date: NaiveDate,
    /// Pickup time in `HH:MM:SS` form, e.g. "14:30:00"
    pub pickup_time: NaiveTime,
    pub pickup_address: String,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub pickup_address: String,
    pub special_instructions: Option<String>,
    pub total_amount: String,
    pub status: String,
    pub created_at: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /bookings
///
/// Books a pickup for a service. The booking is priced at the service's
/// current rate and written with status `pending`. There is no conflict or
/// double-booking check; any slot can be booked any number of times.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = CreateBookingResponse),
        (status = 400, description = "Missing pickup address"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Service not found or inactive"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    session: AuthSession,
    pool: web::Data<DbPool>,
    body: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let pickup_address = body.pickup_address.trim().to_string();

    if pickup_address.is_empty() {
        return Err(AppError::Validation(
            "pickup address is required".to_string(),
        ));
    }

    let user_id = session.user_id;

    let booking_id = web::block(move || {
        let mut conn = pool.get()?;

        let service = services::table
            .filter(services::id.eq(body.service_id))
            .filter(services::is_active.eq(true))
            .select(Service::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(AppError::NotFound)?;

        let booking_id = Uuid::new_v4();
        diesel::insert_into(bookings::table)
            .values(&NewBooking {
                id: booking_id,
                user_id,
                service_id: service.id,
                pickup_date: body.pickup_date,
                pickup_time: body.pickup_time,
                pickup_address,
                special_instructions: body.special_instructions,
                total_amount: service.price,
                status: "pending".to_string(),
            })
            .execute(&mut conn)?;

        Ok::<_, AppError>(booking_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "id": booking_id })))
}

/// GET /bookings
///
/// The caller's bookings, newest first, with service names.
#[utoipa::path(
    get,
    path = "/bookings",
    responses(
        (status = 200, description = "The caller's bookings", body = [BookingResponse]),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bookings"
)]
pub async fn list_bookings(
    session: AuthSession,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = session.user_id;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let rows: Vec<(Booking, String)> = bookings::table
            .inner_join(services::table)
            .filter(bookings::user_id.eq(user_id))
            .select((Booking::as_select(), services::name))
            .order(bookings::created_at.desc())
            .load(&mut conn)?;

        let responses: Vec<BookingResponse> = rows
            .into_iter()
            .map(|(b, service_name)| BookingResponse {
                id: b.id,
                service_id: b.service_id,
                service_name,
                pickup_date: b.pickup_date,
                pickup_time: b.pickup_time,
                pickup_address: b.pickup_address,
                special_instructions: b.special_instructions,
                total_amount: b.total_amount.to_string(),
                status: b.status,
                created_at: b.created_at.to_rfc3339(),
            })
            .collect();

        Ok::<_, AppError>(responses)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}
