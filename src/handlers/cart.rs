use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::cart_store::CartStore;
use crate::db::DbPool;
use crate::domain::cart::{Cart, CartProduct};
use crate::errors::AppError;
use crate::models::product::Product;
use crate::schema::products;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// New quantity for the line. Zero removes the line.
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub stock_quantity: i32,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_amount: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let total_amount = cart.total_amount().to_string();
        CartResponse {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemResponse {
                    product_id: line.product.id,
                    name: line.product.name.clone(),
                    unit_price: line.product.unit_price.to_string(),
                    quantity: line.quantity,
                    stock_quantity: line.product.stock_quantity,
                    line_total: line.line_total().to_string(),
                })
                .collect(),
            total_amount,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Current cart contents", body = CartResponse),
        (status = 401, description = "Authentication required"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    session: AuthSession,
    store: web::Data<CartStore>,
) -> Result<HttpResponse, AppError> {
    let cart = store.snapshot(session.user_id);
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// POST /cart/items
///
/// Adds one unit of the product to the caller's cart. The product snapshot
/// (price, stock) is taken here; an existing line is incremented and clamped
/// to the current stock level. Out-of-stock products cannot be added at all,
/// mirroring the disabled add button in the shop view.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Product is out of stock"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Product not found or inactive"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    session: AuthSession,
    pool: web::Data<DbPool>,
    store: web::Data<CartStore>,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = body.into_inner().product_id;

    let product = web::block(move || {
        let mut conn = pool.get()?;

        let product = products::table
            .filter(products::id.eq(product_id))
            .filter(products::is_active.eq(true))
            .select(Product::as_select())
            .first(&mut conn)
            .optional()?;

        Ok::<_, AppError>(product)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??
    .ok_or(AppError::NotFound)?;

    if product.stock_quantity < 1 {
        return Err(AppError::Validation("product is out of stock".to_string()));
    }

    let cart = store.add(
        session.user_id,
        CartProduct {
            id: product.id,
            name: product.name,
            unit_price: product.price,
            stock_quantity: product.stock_quantity,
        },
    );

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// PATCH /cart/items/{product_id}
///
/// Sets a line's quantity directly; zero removes the line. No stock clamp is
/// applied here (see `domain::cart::Cart::update_quantity`).
#[utoipa::path(
    patch,
    path = "/cart/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 401, description = "Authentication required"),
    ),
    tag = "cart"
)]
pub async fn update_quantity(
    session: AuthSession,
    store: web::Data<CartStore>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let cart = store.update_quantity(session.user_id, product_id, body.quantity);
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}
