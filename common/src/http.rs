use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;

use super::error::{AppError, Res};

pub struct Success;
impl Success {
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(body))
    }
    pub fn html(body: String) -> Res<HttpResponse> {
        Result::Ok(
            HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(body),
        )
    }
}

/// JSON extractor config that reports malformed bodies as `{ "error": .. }` 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
