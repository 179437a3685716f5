use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self {
            received: true,
            ignored: None,
        }
    }

    pub fn ignored() -> Self {
        Self {
            received: true,
            ignored: Some(true),
        }
    }
}
