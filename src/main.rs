use dotenvy::dotenv;
use laundry_service::{build_server, create_pool, run_migrations};
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let pool_size: u32 = env::var("DATABASE_POOL_SIZE")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .expect("DATABASE_POOL_SIZE must be a valid number");

    let pool = create_pool(&database_url, pool_size);
    run_migrations(&pool);

    log::info!(
        "laundry portal listening on {}:{} (pool size {})",
        host,
        port,
        pool_size
    );

    build_server(pool, &host, port)?.await
}
