use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stripe event envelope. `data.object` is interpreted per event type.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownEventType {
    CheckoutSessionCompleted,
    CustomerSubscriptionUpdated,
    CustomerSubscriptionDeleted,
}

impl KnownEventType {
    pub fn parse(event_type: &str) -> Option<Self> {
        match event_type {
            "checkout.session.completed" => Some(Self::CheckoutSessionCompleted),
            "customer.subscription.updated" => Some(Self::CustomerSubscriptionUpdated),
            "customer.subscription.deleted" => Some(Self::CustomerSubscriptionDeleted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CustomerSubscriptionUpdated => "customer.subscription.updated",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    // id string, or the full object when expanded
    #[serde(default)]
    pub customer: Option<Value>,
    #[serde(default)]
    pub subscription: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub status: String,
}

/// Observability record emitted for a dispatched event. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WebhookRecord {
    CheckoutCompleted {
        session_id: String,
        customer_id: Option<String>,
        subscription_id: Option<String>,
        site_id: String,
    },
    SubscriptionChanged {
        event_type: &'static str,
        subscription_id: String,
        status: String,
        site_id: String,
    },
}

#[derive(Debug, PartialEq)]
pub enum WebhookOutcome {
    Dispatched(WebhookRecord),
    Ignored,
}

/// Id of a Stripe expandable field.
pub fn expandable_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(id) => Some(id.clone()),
        Value::Object(object) => object.get("id")?.as_str().map(str::to_string),
        _ => None,
    }
}
