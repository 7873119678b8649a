//! Construction Site Backend - library for app logic and testing

pub mod config;
pub mod export;
pub mod logging;
pub mod routes;
pub mod state;
pub mod store;
pub mod uploads;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use config::AppConfig;
use state::AppState;

/// Cap for JSON request bodies.
const BODY_LIMIT: usize = 2 * 1024 * 1024;
/// Cap for the multipart upload route: one image plus form overhead.
const UPLOAD_BODY_LIMIT: usize = routes::upload::MAX_FILE_SIZE + 1024 * 1024;

/// CORS for the configured frontend origins. Origins that are not valid
/// header values are skipped with a warning.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let cors = configure_cors(config);
    tracing::info!(origins = ?config.allowed_origins, "CORS configured");

    let uploads = Router::new()
        .route("/api/uploads", post(routes::upload::upload_image))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/api/admin/login", post(routes::auth::login))
        // Contact
        .route(
            "/api/contact",
            get(routes::contact::list).post(routes::contact::submit),
        )
        .route("/api/contact/export", get(routes::contact::export_xlsx))
        .route(
            "/api/contact/{id}",
            get(routes::contact::get_one).delete(routes::contact::delete),
        )
        .route("/api/contact/{id}/read", patch(routes::contact::mark_read))
        // Blog
        .route(
            "/api/blog",
            get(routes::blog::list_published).post(routes::blog::create_post),
        )
        .route("/api/admin/blog", get(routes::blog::list_all))
        .route(
            "/api/blog/category/{category}",
            get(routes::blog::list_by_category),
        )
        .route("/api/blog/search", get(routes::blog::search))
        .route("/api/blog/export", get(routes::blog::export_xlsx))
        .route(
            "/api/blog/{id}",
            get(routes::blog::get_post)
                .patch(routes::blog::update_post)
                .delete(routes::blog::delete_post),
        )
        // Testimonials
        .route(
            "/api/testimonials",
            get(routes::testimonials::list_approved).post(routes::testimonials::submit),
        )
        .route(
            "/api/admin/testimonials",
            get(routes::testimonials::list_all),
        )
        .route(
            "/api/testimonials/type/{project_type}",
            get(routes::testimonials::list_by_project_type),
        )
        .route(
            "/api/testimonials/export",
            get(routes::testimonials::export_xlsx),
        )
        .route(
            "/api/testimonials/{id}",
            get(routes::testimonials::get_testimonial)
                .patch(routes::testimonials::update_testimonial)
                .delete(routes::testimonials::delete_testimonial),
        )
        .route(
            "/api/testimonials/{id}/approve",
            patch(routes::testimonials::approve),
        )
        // Portfolio
        .route(
            "/api/portfolio",
            get(routes::portfolio::list_projects).post(routes::portfolio::create_project),
        )
        .route("/api/portfolio/featured", get(routes::portfolio::list_featured))
        .route(
            "/api/portfolio/category/{category}",
            get(routes::portfolio::list_by_category),
        )
        .route("/api/portfolio/export", get(routes::portfolio::export_xlsx))
        .route(
            "/api/portfolio/{id}",
            get(routes::portfolio::get_project)
                .patch(routes::portfolio::update_project)
                .delete(routes::portfolio::delete_project),
        )
        // Meta tags
        .route(
            "/api/meta-tags",
            get(routes::meta_tags::list_all).post(routes::meta_tags::create),
        )
        .route(
            "/api/meta-tags/{key}",
            get(routes::meta_tags::get_by_path)
                .patch(routes::meta_tags::update)
                .delete(routes::meta_tags::delete),
        )
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        // Global 2 MB request body cap; the upload route merged below has its own
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .merge(uploads)
        .route("/uploads/{name}", get(routes::upload::serve_upload))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();
    let config = AppConfig::default();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init(&config);

    routes::health::init_start_time();

    if config.is_production() {
        for warning in config.insecure_defaults() {
            tracing::warn!("SECURITY: {}", warning);
        }
    }

    let state = AppState::from_config(&config).expect("Failed to hash the admin password");
    {
        let counts = state.store.read().await.counts();
        tracing::info!(seeded = config.seed_data, ?counts, "Store ready");
    }

    let app = create_app(state, &config);

    let addr: SocketAddr = config
        .socket_addr()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
