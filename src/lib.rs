pub mod auth;
pub mod cart_store;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use cart_store::CartStore;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::catalog::list_services,
        handlers::catalog::list_products,
        handlers::cart::get_cart,
        handlers::cart::add_to_cart,
        handlers::cart::update_quantity,
        handlers::orders::checkout,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::bookings::create_booking,
        handlers::bookings::list_bookings,
        handlers::points::get_points,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::admin::overview,
        handlers::admin::list_services,
        handlers::admin::list_products,
        handlers::admin::create_service,
        handlers::admin::create_product,
        handlers::admin::toggle_service,
        handlers::admin::toggle_product,
    ),
    components(schemas(
        handlers::catalog::ServiceResponse,
        handlers::catalog::ProductResponse,
        handlers::cart::AddToCartRequest,
        handlers::cart::UpdateQuantityRequest,
        handlers::cart::CartItemResponse,
        handlers::cart::CartResponse,
        handlers::orders::CheckoutRequest,
        handlers::orders::CheckoutResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderResponse,
        handlers::bookings::CreateBookingRequest,
        handlers::bookings::CreateBookingResponse,
        handlers::bookings::BookingResponse,
        handlers::profile::UpdateProfileRequest,
        handlers::profile::ProfileResponse,
        handlers::admin::CreateServiceRequest,
        handlers::admin::CreateProductRequest,
        handlers::admin::OverviewResponse,
        handlers::admin::ToggleResponse,
        handlers::admin::AdminServiceResponse,
        handlers::admin::AdminProductResponse,
        domain::loyalty::Tier,
        domain::loyalty::ActivityKind,
        domain::loyalty::Activity,
        domain::loyalty::PointsSummary,
    )),
    tags(
        (name = "catalog", description = "Public service and product catalog"),
        (name = "cart", description = "Per-user in-memory shopping cart"),
        (name = "orders", description = "Checkout and order history"),
        (name = "bookings", description = "Service pickup bookings"),
        (name = "points", description = "Loyalty points and tiers"),
        (name = "profile", description = "Customer profile"),
        (name = "admin", description = "Catalog administration"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server. Cart state is shared across all workers and lives only
/// as long as the process.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let cart_store = web::Data::new(CartStore::default());

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(cart_store.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .route("/services", web::get().to(handlers::catalog::list_services))
            .route("/products", web::get().to(handlers::catalog::list_products))
            .service(
                web::scope("/cart")
                    .route("", web::get().to(handlers::cart::get_cart))
                    .route("/items", web::post().to(handlers::cart::add_to_cart))
                    .route(
                        "/items/{product_id}",
                        web::patch().to(handlers::cart::update_quantity),
                    ),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::checkout))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order)),
            )
            .service(
                web::scope("/bookings")
                    .route("", web::post().to(handlers::bookings::create_booking))
                    .route("", web::get().to(handlers::bookings::list_bookings)),
            )
            .route("/points", web::get().to(handlers::points::get_points))
            .service(
                web::scope("/profile")
                    .route("", web::get().to(handlers::profile::get_profile))
                    .route("", web::put().to(handlers::profile::update_profile)),
            )
            .service(
                web::scope("/admin")
                    .route("/overview", web::get().to(handlers::admin::overview))
                    .route("/services", web::get().to(handlers::admin::list_services))
                    .route("/services", web::post().to(handlers::admin::create_service))
                    .route(
                        "/services/{id}/toggle",
                        web::post().to(handlers::admin::toggle_service),
                    )
                    .route("/products", web::get().to(handlers::admin::list_products))
                    .route("/products", web::post().to(handlers::admin::create_product))
                    .route(
                        "/products/{id}/toggle",
                        web::post().to(handlers::admin::toggle_product),
                    ),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
