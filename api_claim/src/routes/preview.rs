use actix_web::{HttpResponse, post, web};
use common::error::{AppError, Res};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::{
    dtos::claim::PreviewRequest,
    services::{claim::best_effort_message, client::WebhooksApiClient},
};

/// Asks the webhooks API to build a preview site for a URL.
///
/// # Input
/// - `req`: JSON payload `{ url }`, an absolute URL
///
/// # Output
/// - The upstream status and JSON body, passed through
/// - Error: 400 for an invalid URL, 502 when upstream fails,
///   504 `{ error, timeout: true }` when it does not answer in time
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/preview', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ url: 'https://acme.example' })
/// });
/// const preview = await response.json();
/// ```
#[post("/preview")]
pub async fn post_preview(
    req: web::Json<PreviewRequest>,
    client: web::Data<WebhooksApiClient>,
    shutdown: Option<web::Data<CancellationToken>>,
) -> Res<HttpResponse> {
    let preview = req.into_inner();
    preview.validate()?;

    let response = client
        .create_preview(&preview, shutdown.as_ref().map(|token| token.get_ref()))
        .await?;

    let status = response.http_status();
    if status.is_server_error() {
        return Err(AppError::BadGateway(best_effort_message(&response)));
    }

    match response.json() {
        Some(body) => Ok(HttpResponse::build(status).json(body)),
        None if status.is_success() => Ok(HttpResponse::build(status).json(serde_json::json!({}))),
        None => Ok(HttpResponse::build(status)
            .json(serde_json::json!({ "error": best_effort_message(&response) }))),
    }
}
