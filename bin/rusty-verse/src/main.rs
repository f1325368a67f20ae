//! # Rusty-Verse Binary
//!
//! Loads settings, builds the configured gateway and serves the JSON API.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{bail, Context};
use rv_api::{configure_routes, middleware, AppState};
use rv_config::{GatewayBackend, GatewaySettings, LogSettings, Settings};
use rv_core::compose::Renderer;
use rv_core::models::Actor;
use rv_core::traits::Gateway;
use rv_services::{ServiceSettings, Services};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "gateway-memory")]
use rv_gateway_memory::MemoryGateway;

#[cfg(feature = "gateway-sqlite")]
use rv_gateway_sqlite::SqliteGateway;

#[cfg(feature = "gateway-rest")]
use rv_gateway_rest::RestGateway;

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn build_gateway(settings: &GatewaySettings) -> anyhow::Result<Arc<dyn Gateway>> {
    match settings.backend {
        #[cfg(feature = "gateway-memory")]
        GatewayBackend::Memory => Ok(Arc::new(MemoryGateway::new())),

        #[cfg(feature = "gateway-sqlite")]
        GatewayBackend::Sqlite => {
            let gateway = SqliteGateway::connect(&settings.sqlite_url)
                .await
                .with_context(|| format!("failed to open {}", settings.sqlite_url))?;
            Ok(Arc::new(gateway))
        }

        #[cfg(feature = "gateway-rest")]
        GatewayBackend::Rest => {
            let url = settings
                .rest_url
                .clone()
                .context("gateway.rest_url is not set")?;
            Ok(Arc::new(RestGateway::new(url, settings.api_key.clone())))
        }

        #[allow(unreachable_patterns)]
        other => bail!("gateway backend {other:?} is not compiled into this binary"),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);
    if let Some(path) = &settings.env_file {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let gateway = build_gateway(&settings.gateway).await?;

    // Hosted backends ship the poet directory with their schema.
    if settings.gateway.backend != GatewayBackend::Rest {
        rv_services::seed::ensure_poets_seeded(gateway.as_ref())
            .await
            .context("seeding poets")?;
    }

    let services = Services::new(
        gateway,
        Renderer::builtin(),
        ServiceSettings {
            gallery_limit: settings.limits.gallery,
            profile_limit: settings.limits.profile,
            training_sample: settings.limits.training_sample,
            reply_delay: settings.chat.reply_delay(),
        },
    );
    let state = web::Data::new(AppState {
        services,
        default_actor: Actor::new(settings.identity.default_user_id.clone()),
    });

    let (host, port) = (settings.server.host.clone(), settings.server.port);
    tracing::info!(%host, port, backend = ?settings.gateway.backend, "rusty-verse starting");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::access_log())
            .wrap(middleware::cors_policy())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;
    Ok(())
}
