use std::collections::HashMap;

use common::{env_config::Config, error::AppError};
use i18n::Locale;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionSubscriptionData, Metadata,
};
use thiserror::Error;

use crate::{
    dtos::checkout::{CheckoutSelection, CheckoutSessionResponse},
    misc::locale::checkout_locale,
    models::plan::{Cadence, PricingCatalog},
};

/// Token Stripe replaces with the session id when redirecting to the success URL.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Unknown pricing plan: {0}")]
    UnknownPlan(String),

    #[error("Missing {cadence} price for plan: {plan_id}")]
    MissingPrice { plan_id: String, cadence: Cadence },

    #[error("Stripe error: {0}")]
    Upstream(#[from] stripe::StripeError),

    #[error("Checkout session {0} was created without a redirect URL")]
    MissingUrl(String),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::UnknownPlan(_) | CheckoutError::MissingPrice { .. } => {
                AppError::BadRequest(err.to_string())
            }
            CheckoutError::Upstream(e) => AppError::Stripe(e),
            CheckoutError::MissingUrl(_) => AppError::Internal(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Looks up the Stripe price for a plan and cadence.
pub fn resolve_price<'a>(
    catalog: &'a PricingCatalog,
    plan_id: &str,
    cadence: Cadence,
) -> Result<&'a str, CheckoutError> {
    let plan = catalog
        .get(plan_id)
        .ok_or_else(|| CheckoutError::UnknownPlan(plan_id.to_string()))?;
    plan.price_for(cadence)
        .ok_or_else(|| CheckoutError::MissingPrice {
            plan_id: plan_id.to_string(),
            cadence,
        })
}

/// Success and cancel targets under the locale's canonical base URL.
pub fn redirect_urls(config: &Config, locale: Locale) -> RedirectUrls {
    let base = config.locale_base_url(locale);
    RedirectUrls {
        success_url: format!(
            "{}/checkout/success?session_id={}",
            base, SESSION_ID_PLACEHOLDER
        ),
        cancel_url: format!("{}/checkout/cancel", base),
    }
}

pub fn session_metadata(site_id: &str, plan_id: &str, cadence: Cadence) -> Metadata {
    HashMap::from([
        ("siteId".to_string(), site_id.to_string()),
        ("planId".to_string(), plan_id.to_string()),
        ("cadence".to_string(), cadence.to_string()),
    ])
}

/// Creates a subscription checkout session for a validated selection.
/// Plan resolution happens before Stripe is contacted; nothing is stored locally.
pub async fn create_subscription_session(
    client: &Client,
    config: &Config,
    catalog: &PricingCatalog,
    selection: &CheckoutSelection,
) -> Result<CheckoutSessionResponse, CheckoutError> {
    let price = resolve_price(catalog, &selection.plan_id, selection.cadence)?;
    let urls = redirect_urls(config, selection.locale);
    let metadata = session_metadata(&config.site_id, &selection.plan_id, selection.cadence);

    let params = CreateCheckoutSession {
        mode: Some(CheckoutSessionMode::Subscription),
        line_items: Some(vec![CreateCheckoutSessionLineItems {
            price: Some(price.to_string()),
            quantity: Some(1),
            ..Default::default()
        }]),
        success_url: Some(urls.success_url.as_str()),
        cancel_url: Some(urls.cancel_url.as_str()),
        customer_email: selection.email.as_deref(),
        locale: Some(checkout_locale(selection.locale)),
        allow_promotion_codes: Some(true),
        metadata: Some(metadata.clone()),
        subscription_data: Some(CreateCheckoutSessionSubscriptionData {
            metadata: Some(metadata),
            ..Default::default()
        }),
        ..Default::default()
    };

    let session = CheckoutSession::create(client, params).await?;
    let id = session.id.to_string();
    let url = session.url.ok_or_else(|| CheckoutError::MissingUrl(id.clone()))?;

    Ok(CheckoutSessionResponse { id, url })
}

#[cfg(test)]
mod tests {
    use common::testing;

    use super::*;
    use crate::models::plan::PricingPlan;

    fn catalog() -> PricingCatalog {
        PricingCatalog::new(vec![
            PricingPlan {
                id: "starter".into(),
                monthly_price_id: Some("price_m".into()),
                yearly_price_id: Some("price_y".into()),
            },
            PricingPlan {
                id: "pro".into(),
                monthly_price_id: Some("price_pro_m".into()),
                yearly_price_id: None,
            },
        ])
    }

    #[test]
    fn known_plan_resolves_each_cadence() {
        let catalog = catalog();
        assert_eq!(resolve_price(&catalog, "starter", Cadence::Monthly).unwrap(), "price_m");
        assert_eq!(resolve_price(&catalog, "starter", Cadence::Yearly).unwrap(), "price_y");
    }

    #[test]
    fn unknown_plan_is_tagged() {
        let err = resolve_price(&catalog(), "unknown", Cadence::Monthly).unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownPlan(ref id) if id == "unknown"));
        assert_eq!(err.to_string(), "Unknown pricing plan: unknown");
    }

    #[test]
    fn missing_cadence_price_is_tagged() {
        let err = resolve_price(&catalog(), "pro", Cadence::Yearly).unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPrice { cadence: Cadence::Yearly, .. }));
        assert!(err.to_string().starts_with("Missing yearly price"));
    }

    #[test]
    fn plan_errors_are_client_errors() {
        let err: AppError = CheckoutError::UnknownPlan("x".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err: AppError = CheckoutError::MissingUrl("cs_1".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn redirect_urls_are_locale_scoped() {
        let config = testing::test_config();
        let urls = redirect_urls(&config, Locale::De);
        assert_eq!(
            urls.success_url,
            "https://www.example.com/de/checkout/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url, "https://www.example.com/de/checkout/cancel");
    }

    #[test]
    fn metadata_tags_site_plan_and_cadence() {
        let metadata = session_metadata("marketing", "pro", Cadence::Monthly);
        assert_eq!(metadata.len(), 3);
        assert_eq!(metadata["siteId"], "marketing");
        assert_eq!(metadata["planId"], "pro");
        assert_eq!(metadata["cadence"], "monthly");
    }
}
