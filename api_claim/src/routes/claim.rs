use actix_web::{HttpRequest, HttpResponse, post, web};
use common::error::{AppError, Res};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::{
    dtos::claim::{ClaimRequest, ClaimResponse},
    misc::bearer::bearer_token,
    services::{
        claim::{ClaimOutcome, interpret_claim},
        client::WebhooksApiClient,
    },
};

/// Claims a preview site for the signed-in user.
///
/// # Input
/// - `Authorization: Bearer <access token>` of the signed-in user
/// - `req`: JSON payload `{ previewId }`
///
/// # Output
/// - Success: 200 `{ claimed: true, alreadyClaimed }`; a preview the user
///   already owns counts as claimed
/// - Error: 401 without a bearer token, the upstream 4xx with `{ error }`,
///   502 for upstream failures, 504 `{ error, timeout: true }` so the page can
///   offer a retry
///
/// # Frontend Example
/// ```javascript
/// const { data } = await supabase.auth.getSession();
/// const response = await fetch('/api/claim', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${data.session.access_token}`
///   },
///   body: JSON.stringify({ previewId })
/// });
/// if (response.status === 504) showRetry();
/// ```
#[post("/claim")]
pub async fn post_claim(
    http_req: HttpRequest,
    req: web::Json<ClaimRequest>,
    client: web::Data<WebhooksApiClient>,
    shutdown: Option<web::Data<CancellationToken>>,
) -> Res<HttpResponse> {
    let token = bearer_token(&http_req)?;
    let claim = req.into_inner();
    claim.validate()?;

    let response = client
        .claim_preview(
            &claim.preview_id,
            token,
            shutdown.as_ref().map(|token| token.get_ref()),
        )
        .await?;

    match interpret_claim(&response) {
        ClaimOutcome::Claimed { already_claimed } => {
            log::info!(
                "Preview {} claimed (already claimed: {})",
                claim.preview_id,
                already_claimed
            );
            Ok(HttpResponse::Ok().json(ClaimResponse {
                claimed: true,
                already_claimed,
            }))
        }
        ClaimOutcome::Rejected { status, message } if status.is_client_error() => {
            log::warn!("Claim of preview {} rejected: {}", claim.preview_id, message);
            Ok(HttpResponse::build(response.http_status())
                .json(serde_json::json!({ "error": message })))
        }
        ClaimOutcome::Rejected { message, .. } => Err(AppError::BadGateway(message)),
    }
}
