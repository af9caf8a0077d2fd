mod auth;
mod config;
mod db;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    handlers::{login_handler, logout_handler, profile_handler, register_handler},
    repository::PgUserStore,
    service::AuthService,
    token::TokenCodec,
};
use config::Config;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::profile_handler,
        auth::handlers::logout_handler,
    ),
    components(
        schemas(
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::AuthResponse,
            auth::models::UserView,
        )
    ),
    tags(
        (name = "auth", description = "Storefront authentication endpoints")
    ),
    info(
        title = "Storefront Auth API",
        version = "1.0.0",
        description = "Registration, login, and profile lookup for the storefront"
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Creates and configures the application router
/// Maps auth endpoints to their handlers and adds CORS middleware
fn create_router(service: Arc<AuthService>) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // The storefront client is served from a separate origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/profile", get(profile_handler))
        .route("/api/auth/logout", post(logout_handler))
        .layer(cors)
        .with_state(service)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Storefront Auth API - Starting...");

    let config = Config::from_env().expect("Failed to load configuration");
    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET not set; using the development default. Do not deploy like this.");
    }

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let service = Arc::new(AuthService::new(
        Arc::new(PgUserStore::new(db_pool)),
        TokenCodec::new(config.jwt_secret.clone(), config.token_expiry_secs),
    ));

    let app = create_router(service);

    // Start the Axum server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Storefront Auth API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
