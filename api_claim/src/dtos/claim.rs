use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

const MAX_PREVIEW_ID_LEN: usize = 128;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[validate(url(message = "url must be an absolute URL"))]
    pub url: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    #[validate(custom(function = "validate_preview_id"))]
    pub preview_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub claimed: bool,
    pub already_claimed: bool,
}

// ids end up in the upstream path
fn validate_preview_id(id: &str) -> Result<(), ValidationError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_PREVIEW_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        return Ok(());
    }
    let mut err = ValidationError::new("preview_id");
    err.message = Some(Cow::Borrowed(
        "previewId must be 1-128 letters, digits, '-' or '_'",
    ));
    Err(err)
}
