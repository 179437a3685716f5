use common::error::AppError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::models::event::{
    CheckoutSessionObject, KnownEventType, SubscriptionObject, WebhookEvent, WebhookOutcome,
    WebhookRecord, expandable_id,
};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Log target for dispatched webhook records.
pub const WEBHOOK_LOG_TARGET: &str = "billing::webhook";

/// Stripe's recommended tolerance for the signed timestamp, in seconds.
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Missing stripe-signature header")]
    MissingSignature,

    #[error("Malformed stripe-signature header")]
    MalformedHeader,

    #[error("No signature matches the payload")]
    BadSignature,

    #[error("Signature timestamp {0} is outside the tolerance window")]
    StaleTimestamp(i64),

    #[error("Invalid event payload: {0}")]
    BadPayload(#[from] serde_json::Error),
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        AppError::BadRequest(format!("Webhook Error: {}", err))
    }
}

/// Verifies Stripe-signed webhook payloads with the endpoint's signing secret.
///
/// Checks the `t=...,v1=...` scheme itself rather than going through
/// `stripe::Webhook::construct_event`, so only the loose [`WebhookEvent`]
/// envelope is parsed and the payload's API version does not matter.
pub struct WebhookVerifier<'a> {
    secret: &'a str,
    tolerance_secs: u64,
}

impl<'a> WebhookVerifier<'a> {
    pub fn new(secret: &'a str) -> Self {
        Self {
            secret,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    pub fn with_tolerance(mut self, tolerance_secs: u64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Creates an event for the webhook based on the request payload and signature.
    pub fn construct_event(&self, payload: &[u8], header: &str) -> Result<WebhookEvent, WebhookError> {
        self.construct_event_at(payload, header, chrono::Utc::now().timestamp())
    }

    pub fn construct_event_at(
        &self,
        payload: &[u8],
        header: &str,
        now: i64,
    ) -> Result<WebhookEvent, WebhookError> {
        let signature = SignatureHeader::parse(header)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| WebhookError::BadSignature)?;
        mac.update(signature.timestamp_raw.as_bytes());
        mac.update(b".");
        mac.update(payload);

        // Stripe sends one v1 entry per active secret during rotation
        let matched = signature.v1.iter().any(|candidate| {
            hex::decode(candidate)
                .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
                .unwrap_or(false)
        });
        if !matched {
            return Err(WebhookError::BadSignature);
        }

        if now.abs_diff(signature.timestamp) > self.tolerance_secs {
            return Err(WebhookError::StaleTimestamp(signature.timestamp));
        }

        Ok(serde_json::from_slice(payload)?)
    }
}

struct SignatureHeader<'h> {
    timestamp_raw: &'h str,
    timestamp: i64,
    v1: Vec<&'h str>,
}

impl<'h> SignatureHeader<'h> {
    // format: t=<unix seconds>,v1=<hex>[,v1=<hex>][,v0=<hex>]
    fn parse(header: &'h str) -> Result<Self, WebhookError> {
        let mut timestamp_raw = None;
        let mut v1 = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp_raw = Some(value),
                Some(("v1", value)) => v1.push(value),
                _ => {}
            }
        }

        let timestamp_raw = timestamp_raw.ok_or(WebhookError::MalformedHeader)?;
        let timestamp = timestamp_raw
            .parse()
            .map_err(|_| WebhookError::MalformedHeader)?;
        if v1.is_empty() {
            return Err(WebhookError::MalformedHeader);
        }

        Ok(Self {
            timestamp_raw,
            timestamp,
            v1,
        })
    }
}

/// Processes the webhook event.
///
/// Known types produce a [`WebhookRecord`] that is logged; every other type is
/// acknowledged and ignored so Stripe stops redelivering it.
pub fn process_webhook_event(event: WebhookEvent, site_id: &str) -> Result<WebhookOutcome, WebhookError> {
    let Some(kind) = KnownEventType::parse(&event.event_type) else {
        log::debug!("Ignoring webhook event {} ({})", event.id, event.event_type);
        return Ok(WebhookOutcome::Ignored);
    };

    let record = match kind {
        KnownEventType::CheckoutSessionCompleted => {
            let session: CheckoutSessionObject = serde_json::from_value(event.data.object)?;
            WebhookRecord::CheckoutCompleted {
                customer_id: expandable_id(session.customer.as_ref()),
                subscription_id: expandable_id(session.subscription.as_ref()),
                session_id: session.id,
                site_id: site_id.to_string(),
            }
        }
        KnownEventType::CustomerSubscriptionUpdated
        | KnownEventType::CustomerSubscriptionDeleted => {
            let subscription: SubscriptionObject = serde_json::from_value(event.data.object)?;
            WebhookRecord::SubscriptionChanged {
                event_type: kind.as_str(),
                subscription_id: subscription.id,
                status: subscription.status,
                site_id: site_id.to_string(),
            }
        }
    };

    log::info!(
        target: WEBHOOK_LOG_TARGET,
        "{} {} {}",
        kind.as_str(),
        event.id,
        serde_json::to_string(&record).unwrap_or_default()
    );

    Ok(WebhookOutcome::Dispatched(record))
}
