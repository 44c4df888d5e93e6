#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

use std::sync::Arc;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use two_hundred_server::config::Config;
use two_hundred_server::middleware::cors_middleware;
use two_hundred_server::services::timer_supervisor;
use two_hundred_server::state::AppState;
use two_hundred_server::telemetry;
use two_hundred_server::ws;

#[get("/healthz")]
async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env();
    let port = config.port;
    tracing::info!(port, "starting 200 game server");

    let state = Arc::new(AppState::new(config));
    timer_supervisor::spawn(state.lanes.clone());

    HttpServer::new(move || {
        let cors = cors_middleware(&state.config);
        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .service(healthz)
            .route("/ws", web::get().to(ws::upgrade))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
