// SPDX-License-Identifier: MPL-2.0

use crate::api::ApiError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct ErrorBody {
    error_code: i64,
    error_msg: String,
}

/// Parse a raw API body and unwrap its envelope.
///
/// The `error` member is always checked before `response` is read. Returns the
/// payload stored under `response`.
pub fn parse_response(body: &[u8]) -> Result<Value, ApiError> {
    let mut envelope: Value = serde_json::from_slice(body)?;

    if let Some(error) = envelope.get_mut("error") {
        let error: ErrorBody = serde_json::from_value(error.take())?;
        return Err(ApiError::Remote {
            code: error.error_code,
            message: error.error_msg,
        });
    }

    match envelope.get_mut("response") {
        Some(response) => Ok(response.take()),
        None => Err(ApiError::MissingField {
            path: "response".to_string(),
        }),
    }
}
