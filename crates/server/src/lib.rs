//! Tasklist HTTP server.
//!
//! Wires startup configuration, the Postgres pool and the account routes
//! into a single actix-web application.
mod settings;

pub use settings::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;
use tsk_auth::Crypto;
use tsk_auth::Member;

/// Shortest HS256 secret that is not flagged at startup.
const MIN_SECRET_LENGTH: usize = 32;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

#[rustfmt::skip]
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    if settings.secret().len() < MIN_SECRET_LENGTH {
        log::warn!("JWT_SECRET is shorter than {} bytes", MIN_SECRET_LENGTH);
    }
    let client = tsk_pg::db(&settings.database_url()).await?;
    tsk_pg::migrate::<Member>(&client).await?;
    let crypto = web::Data::new(Crypto::new(settings.secret().expose(), settings.ttl()));
    let params = web::Data::new(settings.params().clone());
    let client = web::Data::new(client);
    log::info!("starting server on {}", settings.bind());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(crypto.clone())
            .app_data(params.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .service(web::scope("/api/v1/users").configure(tsk_auth::routes))
    })
    .bind(settings.bind())?
    .shutdown_timeout(5)
    .run()
    .await?;
    log::info!("server stopped");
    Ok(())
}
