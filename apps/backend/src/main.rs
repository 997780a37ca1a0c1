use actix_web::{web, App, HttpServer};
use directory_auth::config::settings::Settings;
use directory_auth::infra::state::build_state;
use directory_auth::middleware::request_trace::RequestTrace;
use directory_auth::middleware::structured_logger::StructuredLogger;
use directory_auth::middleware::trace_span::TraceSpan;
use directory_auth::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Settings come first so LOG_FORMAT can shape the subscriber; failures
    // here go to stderr because logging is not up yet.
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(settings.log_format);

    let app_state = match build_state()
        .with_security(settings.security.clone())
        .with_graphql(settings.graphql.clone())
        .build()
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %settings.host,
        port = settings.port,
        version = env!("CARGO_PKG_VERSION"),
        "Auth server starting"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
