use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{env_config::Config, error::Res, http::Success};

use crate::{
    dtos::checkout::{CheckoutSelection, CheckoutSessionRequest, PlansResponse},
    models::plan::PricingCatalog,
    services,
};

/// Creates a Stripe subscription checkout session.
///
/// # Input
/// - `req`: JSON payload:
///   - `planId`: plan id from the pricing catalog
///   - `cadence`: `"monthly"` or `"yearly"`
///   - `email`: (Optional) prefilled customer email
///   - `locale`: supported locale code, used for redirects and the Checkout page language
///
/// # Output
/// - Success: 200 with `{ id, url }`; the browser is sent to `url`
/// - Error: 400 `{ error, issues? }` for invalid input or an unknown plan/price,
///   500 when Stripe fails. `issues` is keyed by the snake_case field name
///   (`plan_id`, `cadence`, `email`, `locale`), not the camelCase request key
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/checkout/session', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ planId: 'pro', cadence: 'monthly', locale: 'en' })
/// });
/// if (response.ok) {
///   const { url } = await response.json();
///   window.location.href = url;
/// }
/// ```
#[post("/session")]
pub async fn post_session(
    req: web::Json<CheckoutSessionRequest>,
    client: web::Data<stripe::Client>,
    config: web::Data<Arc<Config>>,
    catalog: web::Data<PricingCatalog>,
) -> Res<impl Responder> {
    let selection = CheckoutSelection::try_from(req.into_inner())?;

    let session =
        services::checkout::create_subscription_session(&client, &config, &catalog, &selection)
            .await?;
    log::info!(
        "Checkout session {} created for plan={} cadence={} locale={}",
        session.id,
        selection.plan_id,
        selection.cadence,
        selection.locale
    );

    Success::ok(session)
}

/// Lists plan ids with the cadences that can be purchased.
#[get("/plans")]
pub async fn get_plans(catalog: web::Data<PricingCatalog>) -> Res<impl Responder> {
    Success::ok(PlansResponse::from(catalog.get_ref()))
}
