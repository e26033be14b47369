//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{AuthConfig, PgAuthRepository, TokenCodec};
use auth::application::config::{SigningKey, SigningKeySet};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use children::PgChildrenRepository;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,children=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired refresh and reset tokens
    // Errors here should not prevent server startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    match auth_store_for_cleanup.cleanup_expired().await {
        Ok(tokens_deleted) => {
            tracing::info!(tokens_deleted, "Auth token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth token cleanup failed, continuing anyway"
            );
        }
    }

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load the signing secret from the environment
        let secret_b64 =
            env::var("AUTH_SIGNING_SECRET").expect("AUTH_SIGNING_SECRET must be set in production");
        let secret = decode_signing_secret(&secret_b64)?;

        let key_id = env::var("AUTH_SIGNING_KEY_ID").unwrap_or_else(|_| "key-1".to_string());
        let password_pepper = env::var("AUTH_PASSWORD_PEPPER")
            .ok()
            .map(|b64| Engine::decode(&general_purpose::STANDARD, &b64))
            .transpose()?;

        AuthConfig {
            signing_keys: SigningKeySet::new(vec![SigningKey {
                key_id,
                secret,
                valid_from: DateTime::<Utc>::UNIX_EPOCH,
                valid_until: None,
            }]),
            password_pepper,
            ..AuthConfig::default()
        }
    };

    // The children routers verify tokens with the same key set
    let codec = Arc::new(TokenCodec::new(auth_config.signing_keys.clone()));

    let auth_repo = PgAuthRepository::new(pool.clone());
    let children_repo = PgChildrenRepository::new(pool.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/auth", auth::auth_router(auth_repo, auth_config))
        .nest(
            "/children",
            children::children_router(children_repo.clone(), codec.clone()),
        )
        .nest("/admin", children::admin_router(children_repo, codec))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Decode the base64 signing secret, insisting on exactly 32 bytes
fn decode_signing_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = Engine::decode(&general_purpose::STANDARD, secret_b64)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        anyhow::anyhow!("AUTH_SIGNING_SECRET must decode to 32 bytes, got {len}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_secret_accepts_32_bytes() {
        let b64 = Engine::encode(&general_purpose::STANDARD, [7u8; 32]);
        assert_eq!(decode_signing_secret(&b64).unwrap(), [7u8; 32]);
    }

    #[test]
    fn test_signing_secret_rejects_wrong_length() {
        let b64 = Engine::encode(&general_purpose::STANDARD, [7u8; 16]);
        let err = decode_signing_secret(&b64).unwrap_err();
        assert!(err.to_string().contains("32 bytes"));
    }

    #[test]
    fn test_signing_secret_rejects_bad_base64() {
        assert!(decode_signing_secret("not base64!!").is_err());
    }
}
