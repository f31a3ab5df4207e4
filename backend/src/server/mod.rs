//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use std::sync::Arc;
use tracing::info;

use longbox::Trace;
#[cfg(debug_assertions)]
use longbox::doc::ApiDoc;
use longbox::inbound::http::configure_api;
use longbox::inbound::http::health::{HealthState, live, ready};
use longbox::inbound::http::state::HttpState;
use longbox::inbound::http::token_config::{BuildMode, token_signer_from_file};
use longbox::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use state_builders::{ServiceLimits, diesel_adapters, memory_adapters};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Startup failure, reported from `main` as an I/O error.
fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

/// Prepare adapters (migrating and seeding on request) and build handler
/// state.
async fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let signer = token_signer_from_file(
        config.token_secret_file.as_deref(),
        config.token_ttl_seconds,
        BuildMode::from_debug_assertions(),
        Arc::new(DefaultClock),
    )
    .map_err(|err| startup_error("token configuration", err))?;
    let limits = ServiceLimits {
        rank_limit_max: config.rank_limit_max,
        panel_timeout: config.panel_timeout,
    };

    match &config.database_url {
        Some(url) => {
            if config.run_migrations {
                run_pending_migrations(url)
                    .await
                    .map_err(|err| startup_error("migrations", err))?;
            }
            let pool = DbPool::new(PoolConfig::new(url.clone()))
                .await
                .map_err(|err| startup_error("database pool", err))?;
            let adapters = diesel_adapters(&pool);
            if config.seed_demo_data {
                adapters
                    .seed_demo_data()
                    .await
                    .map_err(|err| startup_error("demo data seeding", err))?;
            }
            info!(adapter = "postgres", "catalogue adapters ready");
            Ok(adapters.http_state(signer, limits))
        }
        None => {
            let adapters = memory_adapters();
            if config.seed_demo_data {
                adapters
                    .seed_demo_data()
                    .await
                    .map_err(|err| startup_error("demo data seeding", err))?;
            }
            info!(adapter = "memory", "no database configured; using in-memory catalogue");
            Ok(adapters.http_state(signer, limits))
        }
    }
}

/// Build state, bind the listener, and flip readiness.
///
/// # Errors
/// Startup failures (token secret, migrations, pool, seeding, bind) surface
/// as [`std::io::Error`].
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config).await?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    info!(bind_addr = %config.bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
