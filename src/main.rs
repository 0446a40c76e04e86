mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{AuthConfig, Config, SwaggerConfig};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::appointments::{
    routes as appointments_routes, AppointmentService, PgAppointmentStore,
};
use crate::features::auth;
use crate::features::auth::clients::GoTrueClient;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::AuthService;
use crate::features::employees::{routes as employees_routes, EmployeeService};
use crate::features::inspections::{
    routes as inspections_routes, InspectionService, InspectionStore, PgInspectionStore,
};
use crate::features::photos::PhotoUploader;
use crate::features::profiles::{routes as profiles_routes, ProfileService};
use crate::features::steps::{routes as steps_routes, StepServices};
use crate::features::wizard::{routes as wizard_routes, WizardService};
use crate::modules::storage::ObjectStorage;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{middleware::from_fn, Router};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(4, |p| p.get()));

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        // Password hashing runs on the blocking pool
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?
        .block_on(run(worker_threads))
}

async fn run(worker_threads: usize) -> anyhow::Result<()> {
    // RUST_LOG may come from .env
    let _ = dotenvy::dotenv();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Starting EDL API (workers={}, pid={})",
        worker_threads,
        std::process::id()
    );

    let pool = database::create_pool(&config.database).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database ready, migrations applied");

    let sessions = Arc::new(auth::SessionManager::new());
    sessions.on_expire(|event| {
        tracing::warn!(
            "Session expired for user {:?}: {}",
            event.user_id,
            event.reason
        );
    });
    let jwt_validator = Arc::new(jwt_validator(&config.auth, Arc::clone(&sessions)));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(GoTrueClient::new(config.gotrue.clone())),
        Arc::clone(&sessions),
    ));

    let minio = modules::storage::MinIOClient::new(config.minio.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?;
    minio
        .ensure_bucket_exists()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare bucket '{}': {}", minio.bucket_name(), e))?;
    tracing::info!("Photo storage ready in bucket '{}'", minio.bucket_name());
    let storage: Arc<dyn ObjectStorage> = Arc::new(minio);
    let uploader = Arc::new(PhotoUploader::new(storage));

    let inspection_store: Arc<dyn InspectionStore> =
        Arc::new(PgInspectionStore::new(pool.clone()));
    let step_services = StepServices::postgres(
        &pool,
        Arc::clone(&inspection_store),
        Arc::clone(&uploader),
    );
    let inspection_service = Arc::new(InspectionService::new(
        inspection_store,
        Arc::clone(&uploader),
        step_services.as_children(),
    ));
    let wizard_service = Arc::new(WizardService::new(
        Arc::clone(&inspection_service),
        step_services.clone(),
    ));
    let appointment_service = Arc::new(AppointmentService::new(
        Arc::new(PgAppointmentStore::new(pool.clone())),
        Arc::clone(&inspection_service),
    ));

    let protected = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(profiles_routes::routes(Arc::new(ProfileService::new(pool.clone()))))
        .merge(employees_routes::routes(Arc::new(EmployeeService::new(pool.clone()))))
        .merge(appointments_routes::routes(appointment_service))
        .merge(inspections_routes::routes(inspection_service))
        .merge(steps_routes::routes(&step_services))
        .merge(wizard_routes::routes(
            wizard_service,
            config.app.max_request_body_size,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    let health = Router::new()
        .route("/health", axum::routing::get(health_check))
        .with_state(pool);

    let app = Router::new()
        .merge(swagger_routes(&config.swagger))
        .merge(protected)
        .merge(auth_routes::public_routes(auth_service))
        .merge(health)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Keeps a client-provided X-Request-Id, otherwise generates a v7 UUID
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let listener = bind_listener(&addr)?;
    tracing::info!("Listening on http://{} (docs at /swagger-ui/)", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

fn jwt_validator(config: &AuthConfig, sessions: Arc<auth::SessionManager>) -> auth::JwtValidator {
    let key_source = match &config.jwt_secret {
        Some(secret) => {
            tracing::info!("Verifying access tokens with the shared secret (HS256)");
            auth::KeySource::Secret(jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()))
        }
        None => {
            tracing::info!("Verifying access tokens with JWKS from {}", config.issuer);
            auth::KeySource::Jwks(Arc::new(auth::JwksClient::new(
                &config.issuer,
                config.jwks_cache_ttl,
            )))
        }
    };
    auth::JwtValidator::new(
        key_source,
        config.issuer.clone(),
        config.audience.clone(),
        config.jwt_leeway,
        sessions,
    )
}

fn swagger_routes(config: &SwaggerConfig) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: config.title.clone(),
        version: config.version.clone(),
        description: config.description.clone(),
    }
    .modify(&mut openapi);

    let docs = Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));
    match config.credentials() {
        Some(credentials) => docs.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
            credentials,
        )))),
        None => {
            tracing::warn!("Swagger UI is served without basic auth");
            docs
        }
    }
}

/// Readiness check, 503 while the database is unreachable
async fn health_check(State(pool): State<PgPool>) -> StatusCode {
    match database::ping(&pool).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Health check failed: {:?}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn bind_listener(addr: &str) -> anyhow::Result<TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;
    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    // Photo uploads arrive in large bodies
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_tcp_keepalive(&socket2::TcpKeepalive::new().with_time(Duration::from_secs(60)))?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(TcpListener::from_std(socket.into())?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
    tracing::info!("Shutdown signal received, draining connections");
}
