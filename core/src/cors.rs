use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};

pub fn middleware(origin: &str) -> Cors {
    Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
        ])
        .allowed_origin(origin)
        .expose_headers(vec![HeaderName::from_static(
            logger::middleware::logger::REQUEST_ID_HEADER,
        )])
        .max_age(3600)
}
