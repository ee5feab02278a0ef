use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::product::Product;
use crate::models::service::Service;
use crate::schema::{products, services};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSort {
    #[default]
    Name,
    Price,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CatalogParams {
    #[serde(default)]
    pub sort: CatalogSort,
    /// Number of items to return. Defaults to 100, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "24.99"
    pub price: String,
    pub duration_hours: i32,
    pub image_url: Option<String>,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        ServiceResponse {
            id: s.id,
            name: s.name,
            description: s.description,
            price: s.price.to_string(),
            duration_hours: s.duration_hours,
            image_url: s.image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock_quantity: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            stock_quantity: p.stock_quantity,
            category: p.category,
            image_url: p.image_url,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /services
///
/// Active services only, for the booking page and the marketing sections.
#[utoipa::path(
    get,
    path = "/services",
    params(
        ("sort" = Option<String>, Query, description = "Ordering: name (default) or price"),
        ("limit" = Option<i64>, Query, description = "Max items (default 100, max 100)"),
    ),
    responses(
        (status = 200, description = "Active services", body = [ServiceResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_services(
    pool: web::Data<DbPool>,
    query: web::Query<CatalogParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let limit = params.limit.clamp(1, 100);

    let rows = web::block(move || {
        let mut conn = pool.get()?;

        let mut q = services::table
            .filter(services::is_active.eq(true))
            .select(Service::as_select())
            .into_boxed();
        q = match params.sort {
            CatalogSort::Name => q.order(services::name.asc()),
            CatalogSort::Price => q.order(services::price.asc()),
        };
        Ok::<_, AppError>(q.limit(limit).load(&mut conn)?)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ServiceResponse> = rows.into_iter().map(ServiceResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /products
///
/// Active products only, for the shop page and the featured-products section.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("sort" = Option<String>, Query, description = "Ordering: name (default) or price"),
        ("limit" = Option<i64>, Query, description = "Max items (default 100, max 100)"),
    ),
    responses(
        (status = 200, description = "Active products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<CatalogParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let limit = params.limit.clamp(1, 100);

    let rows = web::block(move || {
        let mut conn = pool.get()?;

        let mut q = products::table
            .filter(products::is_active.eq(true))
            .select(Product::as_select())
            .into_boxed();
        q = match params.sort {
            CatalogSort::Name => q.order(products::name.asc()),
            CatalogSort::Price => q.order(products::price.asc()),
        };
        Ok::<_, AppError>(q.limit(limit).load(&mut conn)?)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductResponse> = rows.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}
