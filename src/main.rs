use tokio::net::TcpListener;
use tracing::{error, info};
use users_api::{
    create_router,
    infrastructure::{database::DatabaseManager, logger::Logger},
    Config, UserService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::init("info");

    info!("Starting users API server...");

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    // 数据库不可用或建表失败时直接退出，不接受任何请求
    let database = DatabaseManager::connect(&config.database)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;
    database.init_schema().await.map_err(|e| {
        error!("Failed to initialize schema: {}", e);
        e
    })?;

    let app = create_router(
        UserService::new(database.get_pool().clone()),
        &config.http,
    );

    let listener = TcpListener::bind(config.http.bind_addr()).await?;
    let addr = listener.local_addr()?;
    let prefix = &config.http.api_prefix;

    info!("Users API server running on http://{}", addr);
    info!("Available endpoints:");
    info!("   GET    {}/users      - List users", prefix);
    info!("   POST   {}/users      - Create user", prefix);
    info!("   GET    {}/users/:id  - Get user by ID", prefix);
    info!("   PUT    {}/users/:id  - Update user", prefix);
    info!("   DELETE {}/users/:id  - Delete user", prefix);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
