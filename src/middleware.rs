//! CORS policy. Ported from the teacher's `middleware::cors`, trimmed to
//! this service's single configured frontend origin instead of a
//! comma-separated env list.

use actix_cors::Cors;
use actix_web::http::header;

use crate::config::Config;

pub fn cors_middleware(config: &Config) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    match &config.frontend_url {
        Some(origin) => cors = cors.allowed_origin(origin),
        None => {
            cors = cors.allowed_origin("http://localhost:3000").allowed_origin("http://127.0.0.1:3000");
        }
    }

    cors
}
