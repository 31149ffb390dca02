//! Circle Classroom API Gateway
//!
//! The HTTP surface of the service.
//! Handles:
//! - Identity tokens, student sessions and role guards
//! - Classroom, roster, attendance, grading, notice and timetable routes
//! - The public classroom portal
//! - The super-admin console
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

#[cfg(test)]
mod tests;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use circle_common::{
    ai::{LanguageModel, OpenAiCompatibleModel},
    auth::{JwtManager, StudentSessionManager},
    billing::{BillingPortal, StripePortal},
    config::AppConfig,
    db::{schema, DbPool},
    identity::{HttpIdentityProvider, IdentityProvider},
    metrics::{self, AI_BUCKETS, LATENCY_BUCKETS, METRICS_PREFIX},
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::middleware::LoginRateLimiter;

/// Base64 mark sheets up to 10 MB decoded, plus JSON framing
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Identity tokens minted locally (tests, mock provider) live this long
const IDENTITY_TOKEN_TTL_SECS: u64 = 3600;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub identity_tokens: Arc<JwtManager>,
    pub student_sessions: Arc<StudentSessionManager>,
    pub model: Arc<dyn LanguageModel>,
    pub billing: Arc<dyn BillingPortal>,
    pub identity: Arc<dyn IdentityProvider>,
    pub login_limiter: Arc<LoginRateLimiter>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the token managers and limiter from config around the given clients
    pub fn new(
        config: AppConfig,
        db: DbPool,
        model: Arc<dyn LanguageModel>,
        billing: Arc<dyn BillingPortal>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            identity_tokens: Arc::new(JwtManager::new(
                &config.auth.identity_jwt_secret,
                IDENTITY_TOKEN_TTL_SECS,
            )),
            student_sessions: Arc::new(StudentSessionManager::new(
                &config.auth.student_session_secret,
                config.auth.student_session_ttl_secs,
            )),
            login_limiter: Arc::new(LoginRateLimiter::new(&config.rate_limit)),
            config: Arc::new(config),
            db,
            model,
            billing,
            identity,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    init_tracing(&config);

    info!(
        service = %config.observability.service_name,
        "Starting Circle Classroom gateway v{}",
        circle_common::VERSION
    );

    // Initialize metrics
    let metrics_handle = if config.observability.metrics_enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;
    if config.database.bootstrap_schema {
        schema::bootstrap(db.write()).await?;
    }

    if config.ai.api_key.is_none() {
        tracing::warn!("No AI provider key configured; AI helpers will return upstream errors");
    }

    let model: Arc<dyn LanguageModel> = Arc::new(OpenAiCompatibleModel::new(config.ai.clone())?);
    let billing: Arc<dyn BillingPortal> = Arc::new(StripePortal::new(config.billing.clone())?);
    let identity: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityProvider::new(&config.auth)?);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let mut state = AppState::new(config, db, model, billing, identity);
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }

    spawn_limiter_pruning(state.login_limiter.clone());

    // Build the router
    let app = create_router(state);

    // Start the server
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logging {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_request_duration_seconds", METRICS_PREFIX)),
            LATENCY_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_ai_duration_seconds", METRICS_PREFIX)),
            AI_BUCKETS,
        )?
        .install_recorder()?;

    metrics::register_metrics();
    Ok(handle)
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = if state.config.server.cors_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let timeout = TimeoutLayer::new(state.config.request_timeout());
    let concurrency = ConcurrencyLimitLayer::new(state.config.server.max_concurrent_requests);

    // Super-admin console
    let admin_routes = Router::new()
        .route("/overview", get(handlers::admin::overview))
        .route("/analytics", get(handlers::admin::analytics))
        .route(
            "/schools",
            get(handlers::admin::list_schools).post(handlers::admin::create_school),
        )
        .route("/schools/{id}/status", put(handlers::admin::update_school_status))
        .route("/users", get(handlers::admin::list_users))
        .route("/users/{id}/role", put(handlers::admin::change_role))
        .route("/users/{id}/audit", get(handlers::admin::user_audit))
        .route(
            "/announcements",
            get(handlers::admin::list_announcements).post(handlers::admin::create_announcement),
        )
        .route("/announcements/{id}", put(handlers::admin::toggle_announcement))
        .route(
            "/api-keys",
            get(handlers::admin::list_api_keys).post(handlers::admin::create_api_key),
        )
        .route(
            "/api-keys/{id}",
            delete(handlers::admin::revoke_api_key),
        );

    // Teacher API
    let api_routes = Router::new()
        .route("/setup", post(handlers::classroom::setup))
        .route("/dashboard", get(handlers::classroom::dashboard))
        .route(
            "/settings",
            get(handlers::classroom::get_settings).put(handlers::classroom::update_settings),
        )
        // Roster
        .route(
            "/students",
            get(handlers::students::list_students).post(handlers::students::create_student),
        )
        .route(
            "/students/{id}",
            get(handlers::students::get_student)
                .put(handlers::students::update_student)
                .delete(handlers::students::delete_student),
        )
        .route("/students/{id}/qr", get(handlers::students::student_qr))
        .route("/students/{id}/attendance", get(handlers::students::student_attendance))
        // Attendance
        .route(
            "/attendance",
            get(handlers::attendance::load).put(handlers::attendance::save),
        )
        // Assignments and grades
        .route(
            "/assignments",
            get(handlers::assignments::list_assignments)
                .post(handlers::assignments::create_assignment),
        )
        .route(
            "/assignments/{id}",
            get(handlers::assignments::get_assignment)
                .delete(handlers::assignments::delete_assignment),
        )
        .route(
            "/assignments/{id}/grades",
            get(handlers::assignments::list_grades).put(handlers::assignments::save_grades),
        )
        .route(
            "/assignments/{id}/extract-grades",
            post(handlers::assignments::extract_grades),
        )
        // Notices
        .route(
            "/notices",
            get(handlers::notices::list_notices).post(handlers::notices::create_notice),
        )
        .route(
            "/notices/{id}",
            put(handlers::notices::update_notice).delete(handlers::notices::delete_notice),
        )
        // Timetable
        .route(
            "/timetable",
            get(handlers::timetable::get_timetable).put(handlers::timetable::replace_timetable),
        )
        // Billing
        .route("/billing/portal", post(handlers::billing::portal))
        // AI helpers
        .route("/ai/analyze-results", post(handlers::ai::analyze_results))
        .route("/ai/extract-grades", post(handlers::ai::extract_grades))
        .nest("/admin", admin_routes);

    // Public portal
    let portal_routes = Router::new()
        .route("/{username}", get(handlers::portal::classroom_page))
        .route("/{username}/login", post(handlers::portal::login))
        .route("/{username}/progress", get(handlers::portal::progress));

    // Compose the app
    Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .route("/auth/callback", get(handlers::auth::callback))
        .nest("/api", api_routes)
        .nest("/view", portal_routes)
        .layer(from_fn(middleware::metrics::track_metrics))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(timeout)
        .layer(concurrency)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

/// Forget idle login buckets and expired lockouts once a minute
fn spawn_limiter_pruning(limiter: Arc<LoginRateLimiter>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            limiter.prune();
            tracing::debug!(tracked = limiter.tracked(), "Pruned login limiter");
        }
    });
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
