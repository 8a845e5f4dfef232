/*
 * Responsibility
 * - Config読み込み → 依存生成 (provider / validator / identity store) → Router 組み立て
 * - Middleware の適用 (認証は api::v1::routes 内、HTTP 共通は最後に外側へ)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware;
use crate::repos::PgIdentityStore;
use crate::services::auth::{ExemptPaths, SubjectSource, TokenDecoder, TokenValidator};
use crate::services::identity::IdentityResolver;
use crate::services::provider::{IdentityProvider, KeycloakClient};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,keycloak_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the process-wide services once; every request shares them through `AppState`.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let keycloak_config = &config.keycloak;

    let keycloak = KeycloakClient::new(keycloak_config).map_err(anyhow::Error::msg)?;

    let subject_source = if keycloak_config.decode_token {
        let public_key = match &keycloak_config.realm_public_key {
            Some(key) => key.clone(),
            None => keycloak
                .realm_public_key()
                .await
                .context("failed to fetch realm public key")?,
        };
        let decoder = TokenDecoder::new(&public_key, &keycloak_config.issuer())
            .map_err(anyhow::Error::msg)?;
        SubjectSource::Decode(decoder)
    } else {
        SubjectSource::Introspection
    };

    tracing::info!(
        realm = %keycloak_config.realm,
        client_id = %keycloak_config.client_id,
        decode_token = keycloak_config.decode_token,
        exempt_uris = ?keycloak_config.exempt_uris,
        "keycloak gate configured"
    );

    let provider: Arc<dyn IdentityProvider> = Arc::new(keycloak);
    let validator = TokenValidator::new(provider.clone(), subject_source);

    let exemptions =
        ExemptPaths::new(&keycloak_config.exempt_uris).context("invalid KEYCLOAK_EXEMPT_URIS")?;
    if exemptions.is_empty() {
        tracing::info!("no exempt paths configured; every protected route requires a token");
    }

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;
    let identity = IdentityResolver::new(Arc::new(PgIdentityStore::new(db)));

    Ok(AppState::new(
        provider,
        validator,
        identity,
        exemptions,
        keycloak_config.admin_roles.clone(),
        keycloak_config.allow_anonymous,
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, config)
}
