use reqwest::StatusCode;

use crate::services::client::ProxyResponse;

const MAX_TEXT_MESSAGE_CHARS: usize = 200;

#[derive(Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed { already_claimed: bool },
    Rejected { status: StatusCode, message: String },
}

/// A successful or conflicting claim means the caller can proceed.
pub fn interpret_claim(response: &ProxyResponse) -> ClaimOutcome {
    if response.status.is_success() {
        return ClaimOutcome::Claimed {
            already_claimed: false,
        };
    }
    if response.status == StatusCode::CONFLICT {
        return ClaimOutcome::Claimed {
            already_claimed: true,
        };
    }
    ClaimOutcome::Rejected {
        status: response.status,
        message: best_effort_message(response),
    }
}

/// Human readable failure reason from an upstream error body.
///
/// Looks at the `message`, `error` and `detail` fields of a JSON body, then at
/// short plain text, and falls back to a generic message naming the status.
pub fn best_effort_message(response: &ProxyResponse) -> String {
    if let Some(serde_json::Value::Object(body)) = response.json() {
        let found = ["message", "error", "detail"]
            .iter()
            .filter_map(|key| body.get(*key)?.as_str())
            .find(|text| !text.trim().is_empty());
        if let Some(text) = found {
            return text.trim().to_string();
        }
    }

    let text = String::from_utf8_lossy(&response.body);
    let text = text.trim();
    if !text.is_empty() && !text.starts_with('{') && text.chars().count() <= MAX_TEXT_MESSAGE_CHARS
    {
        return text.to_string();
    }

    format!("Request failed with status {}", response.status.as_u16())
}

#[cfg(test)]
mod tests {
    use actix_web::web::Bytes;
    use rstest::rstest;

    use super::*;

    fn response(status: u16, body: &'static str) -> ProxyResponse {
        ProxyResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[rstest]
    #[case(200, false)]
    #[case(201, false)]
    #[case(409, true)]
    fn ok_or_conflict_proceeds(#[case] status: u16, #[case] already_claimed: bool) {
        assert_eq!(
            interpret_claim(&response(status, "")),
            ClaimOutcome::Claimed { already_claimed }
        );
    }

    #[rstest]
    #[case(r#"{"message": "Preview expired"}"#, "Preview expired")]
    #[case(r#"{"error": "Not yours"}"#, "Not yours")]
    #[case(r#"{"detail": "Gone"}"#, "Gone")]
    #[case(r#"{"message": "", "error": "Fallback field"}"#, "Fallback field")]
    #[case("plain text reason", "plain text reason")]
    #[case(r#"{"code": 17}"#, "Request failed with status 400")]
    #[case("", "Request failed with status 400")]
    fn message_is_extracted_best_effort(#[case] body: &'static str, #[case] expected: &str) {
        assert_eq!(best_effort_message(&response(400, body)), expected);
    }

    #[test]
    fn long_text_bodies_are_not_echoed() {
        let body: &'static str = Box::leak("x".repeat(500).into_boxed_str());
        assert_eq!(
            best_effort_message(&response(403, body)),
            "Request failed with status 403"
        );
    }

    #[test]
    fn other_statuses_are_rejected_with_message() {
        assert_eq!(
            interpret_claim(&response(404, r#"{"error": "No such preview"}"#)),
            ClaimOutcome::Rejected {
                status: StatusCode::NOT_FOUND,
                message: "No such preview".into()
            }
        );
    }
}
