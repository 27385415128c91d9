use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use std::sync::Arc;

mod api;
mod config;
mod directory;
mod docs;
mod engine;
mod model;
mod routes;
mod utils;

use config::Config;
use directory::InMemoryDirectory;
use engine::lifecycle::LeaveEngine;

use crate::docs::ApiDoc;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leavedesk"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        calendar_policy = %config.calendar_policy,
        "Server starting..."
    );

    let directory = Arc::new(InMemoryDirectory::new());
    let engine = Arc::new(LeaveEngine::new(
        config.calendar_policy,
        config.rule_limits(),
        directory.clone(),
    ));

    // Warm the directory from the optional seed file before traffic lands.
    if let Some(seed_file) = config.seed_file.clone() {
        let directory_for_warmup = directory.clone();
        actix_web::rt::spawn(async move {
            if let Err(e) = utils::seed::warmup_directory(&directory_for_warmup, &seed_file) {
                error!(error = %e, "Failed to warmup directory from seed file");
            }
        });
    }

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::from(engine.clone()))
            .app_data(Data::from(directory.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            // Engine + directory routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
