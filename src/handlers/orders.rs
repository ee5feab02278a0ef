use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::cart_store::CartStore;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::order::{NewOrder, Order};
use crate::models::order_item::{NewOrderItem, OrderItem};
use crate::schema::{order_items, orders, products};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub shipping_address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub total_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub total_amount: String,
    pub shipping_address: String,
    pub status: String,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checks out the caller's cart. Validation failures (empty cart, blank
/// shipping address) are reported before the database is touched. The order
/// row and its items are written in a single transaction so a failed item
/// insert can never leave an orphaned order behind. On success the cart is
/// cleared.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created", body = CheckoutResponse),
        (status = 400, description = "Empty cart or missing shipping address"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    session: AuthSession,
    pool: web::Data<DbPool>,
    store: web::Data<CartStore>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let shipping_address = body.into_inner().shipping_address.trim().to_string();
    let cart = store.snapshot(session.user_id);

    if cart.is_empty() {
        return Err(AppError::Validation("cart is empty".to_string()));
    }
    if shipping_address.is_empty() {
        return Err(AppError::Validation(
            "shipping address is required".to_string(),
        ));
    }

    let user_id = session.user_id;
    let total_amount = cart.total_amount();
    let lines: Vec<_> = cart.lines().to_vec();

    let order_id = web::block(move || {
        let mut conn = pool.get()?;

        conn.transaction::<_, AppError, _>(|conn| {
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrder {
                    id: order_id,
                    user_id,
                    total_amount,
                    shipping_address,
                    status: "pending".to_string(),
                })
                .execute(conn)?;

            let new_items: Vec<NewOrderItem> = lines
                .iter()
                .map(|line| NewOrderItem {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: line.product.id,
                    quantity: line.quantity,
                    unit_price: line.product.unit_price.clone(),
                    total_price: line.line_total(),
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            Ok(order_id)
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    store.clear(session.user_id);

    Ok(HttpResponse::Created().json(json!({ "id": order_id })))
}

/// GET /orders
///
/// The caller's orders, newest first, each with its items and product names.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    session: AuthSession,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = session.user_id;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let rows: Vec<Order> = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(Order::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        let order_ids: Vec<Uuid> = rows.iter().map(|o| o.id).collect();
        let items: Vec<(OrderItem, String)> = order_items::table
            .inner_join(products::table)
            .filter(order_items::order_id.eq_any(&order_ids))
            .select((OrderItem::as_select(), products::name))
            .load(&mut conn)?;

        let mut items_by_order: HashMap<Uuid, Vec<OrderItemResponse>> = HashMap::new();
        for (item, product_name) in items {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItemResponse {
                    product_id: item.product_id,
                    product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price.to_string(),
                    total_price: item.total_price.to_string(),
                });
        }

        let responses: Vec<OrderResponse> = rows
            .into_iter()
            .map(|o| OrderResponse {
                items: items_by_order.remove(&o.id).unwrap_or_default(),
                id: o.id,
                total_amount: o.total_amount.to_string(),
                shipping_address: o.shipping_address,
                status: o.status,
                created_at: o.created_at.to_rfc3339(),
            })
            .collect();

        Ok::<_, AppError>(responses)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(result))
}

/// GET /orders/{id}
///
/// A single order, scoped to the caller.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    session: AuthSession,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let user_id = session.user_id;

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .select(Order::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok::<_, AppError>(None);
        };

        let items: Vec<(OrderItem, String)> = order_items::table
            .inner_join(products::table)
            .filter(order_items::order_id.eq(order.id))
            .select((OrderItem::as_select(), products::name))
            .load(&mut conn)?;

        Ok(Some(OrderResponse {
            items: items
                .into_iter()
                .map(|(item, product_name)| OrderItemResponse {
                    product_id: item.product_id,
                    product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price.to_string(),
                    total_price: item.total_price.to_string(),
                })
                .collect(),
            id: order.id,
            total_amount: order.total_amount.to_string(),
            shipping_address: order.shipping_address,
            status: order.status,
            created_at: order.created_at.to_rfc3339(),
        }))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Err(AppError::NotFound),
    }
}
