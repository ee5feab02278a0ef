use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::product::{NewProduct, Product};
use crate::models::service::{NewService, Service};
use crate::schema::{bookings, orders, products, services};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "24.99"
    pub price: String,
    #[serde(default = "default_duration_hours")]
    pub duration_hours: i32,
    pub image_url: Option<String>,
}

fn default_duration_hours() -> i32 {
    24
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub stock_quantity: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub services: i64,
    pub products: i64,
    pub bookings: i64,
    pub orders: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleResponse {
    pub id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub duration_hours: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Service> for AdminServiceResponse {
    fn from(s: Service) -> Self {
        AdminServiceResponse {
            id: s.id,
            name: s.name,
            description: s.description,
            price: s.price.to_string(),
            duration_hours: s.duration_hours,
            image_url: s.image_url,
            is_active: s.is_active,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock_quantity: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Product> for AdminProductResponse {
    fn from(p: Product) -> Self {
        AdminProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            stock_quantity: p.stock_quantity,
            category: p.category,
            image_url: p.image_url,
            is_active: p.is_active,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

fn parse_price(raw: &str) -> Result<BigDecimal, AppError> {
    // Parsed as-is; the admin form enforces nothing beyond "is a decimal",
    // so negative prices and stock counts are accepted here too.
    BigDecimal::from_str(raw)
        .map_err(|e| AppError::Validation(format!("Invalid price '{raw}': {e}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /admin/overview
///
/// Row counts for the admin landing page.
#[utoipa::path(
    get,
    path = "/admin/overview",
    responses(
        (status = 200, description = "Table counts", body = OverviewResponse),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn overview(
    session: AuthSession,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        Ok::<_, AppError>(OverviewResponse {
            services: services::table.count().get_result(&mut conn)?,
            products: products::table.count().get_result(&mut conn)?,
            bookings: bookings::table.count().get_result(&mut conn)?,
            orders: orders::table.count().get_result(&mut conn)?,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

/// GET /admin/services
///
/// All services, active or not, newest first.
#[utoipa::path(
    get,
    path = "/admin/services",
    responses(
        (status = 200, description = "All services", body = [AdminServiceResponse]),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn list_services(
    session: AuthSession,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;

    let rows: Vec<Service> = web::block(move || {
        let mut conn = pool.get()?;
        Ok::<_, AppError>(
            services::table
                .select(Service::as_select())
                .order(services::created_at.desc())
                .load(&mut conn)?,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<AdminServiceResponse> =
        rows.into_iter().map(AdminServiceResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /admin/products
#[utoipa::path(
    get,
    path = "/admin/products",
    responses(
        (status = 200, description = "All products", body = [AdminProductResponse]),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn list_products(
    session: AuthSession,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;

    let rows: Vec<Product> = web::block(move || {
        let mut conn = pool.get()?;
        Ok::<_, AppError>(
            products::table
                .select(Product::as_select())
                .order(products::created_at.desc())
                .load(&mut conn)?,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<AdminProductResponse> =
        rows.into_iter().map(AdminProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// POST /admin/services
#[utoipa::path(
    post,
    path = "/admin/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created"),
        (status = 400, description = "Unparseable price"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn create_service(
    session: AuthSession,
    pool: web::Data<DbPool>,
    body: web::Json<CreateServiceRequest>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;

    let body = body.into_inner();
    let price = parse_price(&body.price)?;

    let service_id = web::block(move || {
        let mut conn = pool.get()?;

        let service_id = Uuid::new_v4();
        diesel::insert_into(services::table)
            .values(&NewService {
                id: service_id,
                name: body.name,
                description: body.description,
                price,
                duration_hours: body.duration_hours,
                image_url: body.image_url,
            })
            .execute(&mut conn)?;

        Ok::<_, AppError>(service_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "id": service_id })))
}

/// POST /admin/products
#[utoipa::path(
    post,
    path = "/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Unparseable price"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn create_product(
    session: AuthSession,
    pool: web::Data<DbPool>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;

    let body = body.into_inner();
    let price = parse_price(&body.price)?;

    let product_id = web::block(move || {
        let mut conn = pool.get()?;

        let product_id = Uuid::new_v4();
        diesel::insert_into(products::table)
            .values(&NewProduct {
                id: product_id,
                name: body.name,
                description: body.description,
                price,
                stock_quantity: body.stock_quantity,
                category: body.category,
                image_url: body.image_url,
            })
            .execute(&mut conn)?;

        Ok::<_, AppError>(product_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "id": product_id })))
}

/// POST /admin/services/{id}/toggle
///
/// Read-then-flip `is_active`. Last writer wins; there is no optimistic
/// concurrency control on catalog rows.
#[utoipa::path(
    post,
    path = "/admin/services/{id}/toggle",
    params(
        ("id" = Uuid, Path, description = "Service UUID"),
    ),
    responses(
        (status = 200, description = "New active state", body = ToggleResponse),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn toggle_service(
    session: AuthSession,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let service_id = path.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let current: bool = services::table
            .filter(services::id.eq(service_id))
            .select(services::is_active)
            .first(&mut conn)?;

        diesel::update(services::table.filter(services::id.eq(service_id)))
            .set(services::is_active.eq(!current))
            .execute(&mut conn)?;

        Ok::<_, AppError>(ToggleResponse {
            id: service_id,
            is_active: !current,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /admin/products/{id}/toggle
#[utoipa::path(
    post,
    path = "/admin/products/{id}/toggle",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "New active state", body = ToggleResponse),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn toggle_product(
    session: AuthSession,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let product_id = path.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let current: bool = products::table
            .filter(products::id.eq(product_id))
            .select(products::is_active)
            .first(&mut conn)?;

        diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(products::is_active.eq(!current))
            .execute(&mut conn)?;

        Ok::<_, AppError>(ToggleResponse {
            id: product_id,
            is_active: !current,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_accepts_plain_decimals() {
        assert_eq!(
            parse_price("24.99").expect("valid"),
            BigDecimal::from_str("24.99").unwrap()
        );
    }

    #[test]
    fn parse_price_accepts_negative_values() {
        // The admin form enforces no lower bound, so neither do we.
        assert!(parse_price("-5.00").is_ok());
    }

    #[test]
    fn parse_price_rejects_garbage() {
        assert!(matches!(
            parse_price("free"),
            Err(AppError::Validation(_))
        ));
    }
}
