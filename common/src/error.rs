use actix_web::HttpResponse;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Stripe error: {0}")]
    Stripe(#[from] stripe::StripeError),

    #[error("Message catalog unavailable: {0}")]
    Catalog(#[from] i18n::CatalogError),

    #[error("Invalid request")]
    Validation(#[from] validator::ValidationErrors),

    // === APPLICATION ERRORS ===
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too Many Requests: {0}")]
    TooManyRequests(String),

    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Upstream timeout: {0}")]
    GatewayTimeout(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                serde_json::json!({ "error": err_msg })
            } else {
                serde_json::json!({ "error": "Internal server error" })
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Stripe(error) => {
                log::error!("Stripe error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            // an unreadable catalog means the localized page cannot exist
            AppError::Catalog(error) => {
                log::error!("Catalog error: {}", error);
                HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Resource not found" }))
            }
            AppError::Validation(issues) => HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": self.to_string(), "issues": issues })),

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(_) => {
                HttpResponse::Unauthorized().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::NotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::BadRequest(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::TooManyRequests(_) => HttpResponse::TooManyRequests()
                .json(serde_json::json!({ "error": self.to_string() })),
            AppError::BadGateway(error) => {
                log::error!("Upstream error: {}", error);
                HttpResponse::BadGateway().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::GatewayTimeout(error) => {
                log::warn!("Upstream timeout: {}", error);
                HttpResponse::GatewayTimeout()
                    .json(serde_json::json!({ "error": self.to_string(), "timeout": true }))
            }

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{body, http::StatusCode};
    use serde_json::Value;
    use validator::{ValidationError, ValidationErrors};

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.to_http_response();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = body_json(AppError::BadRequest("Unknown pricing plan: x".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Unknown pricing plan"));
    }

    #[actix_web::test]
    async fn validation_errors_list_issues() {
        let mut errors = ValidationErrors::new();
        errors.add("cadence", ValidationError::new("cadence"));
        let (status, body) = body_json(AppError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["issues"]["cadence"].is_array());
    }

    #[actix_web::test]
    async fn timeouts_are_flagged_for_retry() {
        let (status, body) = body_json(AppError::GatewayTimeout("preview".into())).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["timeout"], Value::Bool(true));
    }

    #[actix_web::test]
    async fn stripe_failures_are_internal_errors() {
        let err = stripe::StripeError::ClientError("connection reset".into());
        let (status, body) = body_json(AppError::from(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn catalog_failures_surface_as_not_found() {
        let err = i18n::CatalogError::Missing(i18n::Locale::Fr);
        let (status, _) = body_json(AppError::from(err)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
