use job_board_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::cors::cors_layer,
    routes,
    utils::crypto::hash_password,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn")),
        )
        .init();

    // `job-board-backend hash-password <password>` prints a value for ADMIN_PASSWORD_HASH.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let plain = args
            .get(2)
            .ok_or_else(|| anyhow::anyhow!("usage: job-board-backend hash-password <password>"))?;
        let hashed = hash_password(plain).map_err(|e| anyhow::anyhow!("hashing failed: {}", e))?;
        println!("{}", hashed);
        return Ok(());
    }

    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    let app_state = AppState::new(pool, config);
    let app = routes::router(app_state, config.admin_auth_required)
        .layer(cors_layer(config.cors_allowed_origin.as_deref())?)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!(
        "Server listening on {} (uploads to bucket {})",
        addr, config.s3.bucket
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
