use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthSession;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::profile::{Profile, UpsertProfile};
use crate::schema::{bookings, orders, profiles};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub total_bookings: i64,
    pub total_orders: i64,
    /// Set once the profile row exists; RFC 3339.
    pub member_since: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /profile
///
/// The caller's profile plus activity counts. A user who has never saved a
/// profile gets empty fields rather than a 404, matching the blank form the
/// profile page renders on first visit.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile and stats", body = ProfileResponse),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "profile"
)]
pub async fn get_profile(
    session: AuthSession,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = session.user_id;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let profile = profiles::table
            .filter(profiles::user_id.eq(user_id))
            .select(Profile::as_select())
            .first(&mut conn)
            .optional()?;

        let total_bookings: i64 = bookings::table
            .filter(bookings::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)?;

        let total_orders: i64 = orders::table
            .filter(orders::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)?;

        let response = match profile {
            Some(p) => ProfileResponse {
                full_name: p.full_name,
                phone: p.phone,
                address: p.address,
                avatar_url: p.avatar_url,
                total_bookings,
                total_orders,
                member_since: Some(p.created_at.to_rfc3339()),
            },
            None => ProfileResponse {
                full_name: None,
                phone: None,
                address: None,
                avatar_url: None,
                total_bookings,
                total_orders,
                member_since: None,
            },
        };

        Ok::<_, AppError>(response)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

/// PUT /profile
///
/// Insert-or-update the caller's profile row.
#[utoipa::path(
    put,
    path = "/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile saved"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "profile"
)]
pub async fn update_profile(
    session: AuthSession,
    pool: web::Data<DbPool>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let changes = UpsertProfile {
        user_id: session.user_id,
        full_name: body.full_name,
        phone: body.phone,
        address: body.address,
        avatar_url: body.avatar_url,
    };

    web::block(move || {
        let mut conn = pool.get()?;

        diesel::insert_into(profiles::table)
            .values(&changes)
            .on_conflict(profiles::user_id)
            .do_update()
            .set(&changes)
            .execute(&mut conn)?;

        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().finish())
}
