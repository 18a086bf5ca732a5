//! Response envelope decoding
//!
//! Every backend function answers with `{ success, message?, data?, error? }`.
//! One rule applies to every endpoint: a response is successful iff the
//! status is 2xx, the body parses, and `success` is `true`. A missing
//! `success` field is a failure — no endpoint is trusted to mean success by
//! omission.

use super::transport::RawResponse;
use crate::error::{AutosaazError, AutosaazResult};
use serde::{Deserialize, Serialize};

/// Wire shape of a backend response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiEnvelope {
    /// Most specific failure text the envelope carries
    fn failure_message(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }
}

/// Decode a raw response into its payload.
///
/// Failures map to the error taxonomy: 401 becomes [`AutosaazError::SessionExpired`]
/// (the orchestrator adds the session teardown), other non-2xx statuses
/// become [`AutosaazError::Http`] carrying the envelope's message when the
/// body parses and a status-line fallback when it does not, and a 2xx
/// response without `success: true` becomes [`AutosaazError::Api`]. Payload
/// and failure never mix: a failing response yields no data at all.
pub fn decode(response: RawResponse) -> AutosaazResult<serde_json::Value> {
    if response.status == 401 {
        return Err(AutosaazError::SessionExpired);
    }

    let envelope: Result<ApiEnvelope, _> = serde_json::from_str(&response.body);

    if !(200..300).contains(&response.status) {
        let message = envelope
            .ok()
            .and_then(|e| e.failure_message())
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        return Err(AutosaazError::http(response.status, message));
    }

    let envelope = envelope
        .map_err(|e| AutosaazError::Json(format!("Malformed response body: {e}")))?;

    match envelope.success {
        Some(true) => Ok(envelope.data.unwrap_or(serde_json::Value::Null)),
        _ => Err(AutosaazError::api(
            envelope
                .failure_message()
                .unwrap_or_else(|| "Request failed".to_string()),
        )),
    }
}
