use actix_web::{web, App, HttpServer};
use deal_backend::config::server::ServerConfig;
use deal_backend::infra::state::build_state;
use deal_backend::middleware::{
    cors_middleware, Authenticate, RequestTrace, StructuredLogger, TraceSpan,
};
use deal_backend::routes;
use deal_backend::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_security(config.security.clone())
        .with_default_users(config.seed_default_users)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, "starting deal backend");

    let data = web::Data::new(app_state);
    let origins = config.cors_allowed_origins.clone();

    // Last `.wrap()` runs first: cors, trace id, span, access log, then auth.
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Authenticate)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(cors_middleware(&origins))
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
