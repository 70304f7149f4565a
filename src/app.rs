use std::time::Instant;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, HttpServer,
};
use log::{debug, info};

use crate::{
    config::{Config, Environment, StorageBackend},
    db::Database,
    errors::AppError,
    middleware::RequestLogger,
    repositories::Repositories,
    routes,
    services::{expiry_sweeper, Services},
    telemetry,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

/// Assembles the application: shared services, middleware and routes
pub fn build_app(
    services: Services,
    state: web::Data<AppState>,
    enable_debug_logging: bool,
    log_format: &'static str,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // The front end is served from another origin and sends the cookie
    let cors = Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    App::new()
        .app_data(state)
        .configure(|cfg| services.register(cfg))
        .configure(routes::configure_routes)
        .wrap(RequestLogger::new(enable_debug_logging))
        .wrap(cors)
        .wrap(Logger::new(log_format))
}

/// Opens the configured store
async fn open_storage(config: &Config) -> AppResult<(Repositories, Option<Database>)> {
    match config.db.backend {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.db).await?;
            Ok((Repositories::postgres(&db), Some(db)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Ok((Repositories::memory(), None))
        }
    }
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    // Setup enhanced logging based on configuration
    telemetry::setup_logging(&config.app)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    // Log startup information
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    let (repositories, db) = open_storage(&config).await?;

    // Built once so every worker shares the same store and services
    let services = Services::new(&repositories, config.links.clone(), config.auth.clone());
    let sweeper = expiry_sweeper(&repositories, &config.links).spawn();

    let state = web::Data::new(AppState {
        start_time,
        db: db.clone(),
        version: config.app.version.clone(),
    });

    // Determine if we should enable more verbose logging
    let enable_debug_logging = config.app.environment != Environment::Production;
    let log_format = telemetry::access_log_format(&config.app.environment);

    // Start the HTTP server
    let result = HttpServer::new(move || {
        build_app(
            services.clone(),
            state.clone(),
            enable_debug_logging,
            log_format,
        )
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await;

    sweeper.abort();
    if let Some(db) = db {
        db.shutdown().await;
    }

    result?;
    Ok(())
}
