use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::auth::AuthSession;
use crate::db::DbPool;
use crate::domain::loyalty::{self, BookingEvent, OrderEvent};
use crate::errors::AppError;
use crate::schema::{bookings, orders, services};

/// GET /points
///
/// The caller's loyalty summary, recomputed from their full booking and
/// order history on every request.
#[utoipa::path(
    get,
    path = "/points",
    responses(
        (status = 200, description = "Loyalty summary", body = crate::domain::loyalty::PointsSummary),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "points"
)]
pub async fn get_points(
    session: AuthSession,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = session.user_id;

    let summary = web::block(move || {
        let mut conn = pool.get()?;

        let booking_rows: Vec<(String, BigDecimal, DateTime<Utc>)> = bookings::table
            .inner_join(services::table)
            .filter(bookings::user_id.eq(user_id))
            .select((services::name, bookings::total_amount, bookings::created_at))
            .load(&mut conn)?;

        let order_rows: Vec<(BigDecimal, DateTime<Utc>)> = orders::table
            .filter(orders::user_id.eq(user_id))
            .select((orders::total_amount, orders::created_at))
            .load(&mut conn)?;

        let booking_events: Vec<BookingEvent> = booking_rows
            .into_iter()
            .map(|(service_name, total_amount, created_at)| BookingEvent {
                service_name,
                total_amount,
                created_at,
            })
            .collect();
        let order_events: Vec<OrderEvent> = order_rows
            .into_iter()
            .map(|(total_amount, created_at)| OrderEvent {
                total_amount,
                created_at,
            })
            .collect();

        Ok::<_, AppError>(loyalty::summarize(&booking_events, &order_events))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(summary))
}
