//! AgriBridge Dashboard Server
//!
//! Loads every dashboard section from the AgriBridge API (or the in-memory
//! demo backend) and serves the section views and actions as JSON.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agribridge_dashboard::config::DashboardConfig;
use agribridge_dashboard::dashboard::{Dashboard, NotificationGuard, Section};
use agribridge_dashboard::gateway::{HttpGateway, MemoryGateway, ResourceGateway};
use agribridge_dashboard::routes;
use agribridge_dashboard::session::TokenSession;
use agribridge_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = DashboardConfig::from_env();

    let session = Arc::new(TokenSession::new());
    let gateway = build_gateway(&config, &session).await?;

    let dashboard = Arc::new(Dashboard::new(
        gateway,
        session,
        config.queries.clone(),
        NotificationGuard::new(config.placeholder_user_id.clone()),
    ));

    match dashboard.activate() {
        Ok(()) => {
            dashboard.settled().await;
            for section in Section::ALL {
                let state = dashboard.state(section);
                match state.error() {
                    Some(error) => warn!(section = %section, error, "section unavailable"),
                    None => info!(
                        section = %section,
                        records = ?state.payload().and_then(|p| p.len()),
                        "section loaded"
                    ),
                }
            }
        }
        Err(e) => warn!(error = %e, "dashboard not activated; serving idle sections"),
    }

    let app = routes::router(AppState::new(dashboard)).layer(build_cors_layer(&config));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_gateway(
    config: &DashboardConfig,
    session: &Arc<TokenSession>,
) -> anyhow::Result<Arc<dyn ResourceGateway>> {
    if config.demo {
        info!("demo mode: using in-memory backend");
        // The demo backend needs no real credential.
        session.login("demo");
        let gateway: Arc<dyn ResourceGateway> =
            Arc::new(MemoryGateway::seeded(config.placeholder_user_id.clone()));
        return Ok(gateway);
    }

    let gateway = HttpGateway::new(
        &config.api_base_url,
        config.request_timeout,
        session.clone(),
    )
    .context("failed to build HTTP client")?;

    if let Some(token) = &config.token {
        session.login(token.clone());
    } else if let Some(credentials) = &config.credentials {
        let token = gateway
            .login(&credentials.username, &credentials.password)
            .await
            .context("login against AgriBridge API failed")?;
        session.login(token.access_token);
    } else {
        warn!("no DASHBOARD_TOKEN or DASHBOARD_USERNAME/DASHBOARD_PASSWORD set");
    }

    info!(base_url = gateway.base_url(), "using AgriBridge API");
    let gateway: Arc<dyn ResourceGateway> = Arc::new(gateway);
    Ok(gateway)
}

fn build_cors_layer(config: &DashboardConfig) -> CorsLayer {
    let allowed_origins = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
}
