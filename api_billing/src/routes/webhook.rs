use std::sync::Arc;

use actix_web::{HttpRequest, Responder, post, web};
use common::{env_config::Config, error::Res, http::Success};

use crate::{
    dtos::webhook::WebhookAck,
    models::event::WebhookOutcome,
    services::webhook::{self, SIGNATURE_HEADER, WebhookError, WebhookVerifier},
};

/// Handles Stripe webhook events.
///
/// # Input
/// - `payload`: raw request body, verified byte for byte
/// - `req`: HTTP request carrying the `stripe-signature` header
/// - `config`: application configuration with the webhook secret
///
/// # Output
/// - Success: 200 `{ received: true }`, or `{ received: true, ignored: true }`
///   for event types this site does not act on
/// - Error: 400 `{ error }` for a missing or invalid signature
///
/// # Note
/// Called by Stripe, not by the frontend. Register
/// `https://<site>/api/webhooks/stripe` in the Stripe Dashboard and subscribe to
/// `checkout.session.completed`, `customer.subscription.updated` and
/// `customer.subscription.deleted`.
#[post("/stripe")]
pub async fn post_stripe_webhook(
    payload: web::Bytes,
    req: HttpRequest,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .ok_or(WebhookError::MissingSignature)?
        .to_str()
        .map_err(|_| WebhookError::MalformedHeader)?;

    let event = WebhookVerifier::new(&config.stripe.webhook_secret)
        .with_tolerance(config.stripe.webhook_tolerance_secs)
        .construct_event(&payload, signature)?;

    match webhook::process_webhook_event(event, &config.site_id)? {
        WebhookOutcome::Dispatched(_) => Success::ok(WebhookAck::received()),
        WebhookOutcome::Ignored => Success::ok(WebhookAck::ignored()),
    }
}
