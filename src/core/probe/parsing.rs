//! Response parsing and contract helpers
//!
//! Decodes JSON bodies and validates the pieces of the contract that more
//! than one check shares: status codes, object fields, record ids and the
//! CORS allow-origin header.

use serde_json::{Map, Value};

use super::client::ApiResponse;
use super::types::CheckError;

pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// Fail unless the response carries the expected status code
pub fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), CheckError> {
    if response.status_code == expected {
        Ok(())
    } else {
        Err(CheckError::UnexpectedStatus {
            expected,
            actual: response.status_code,
        })
    }
}

/// Decode the response body as JSON
pub fn parse_json(body: &[u8]) -> Result<Value, CheckError> {
    serde_json::from_slice(body).map_err(|e| CheckError::InvalidJson(e.to_string()))
}

pub fn as_object(value: &Value) -> Result<&Map<String, Value>, CheckError> {
    value.as_object().ok_or(CheckError::NotAnObject)
}

/// Fail unless every listed field is present
pub fn require_fields(object: &Map<String, Value>, fields: &[&str]) -> Result<(), CheckError> {
    match fields.iter().find(|field| !object.contains_key(**field)) {
        Some(missing) => Err(CheckError::MissingField(missing.to_string())),
        None => Ok(()),
    }
}

/// Fail unless `field` is present and equals the expected string
pub fn expect_str_field(
    object: &Map<String, Value>,
    field: &str,
    expected: &str,
) -> Result<(), CheckError> {
    let actual = object
        .get(field)
        .ok_or_else(|| CheckError::MissingField(field.to_string()))?;

    if actual.as_str() == Some(expected) {
        Ok(())
    } else {
        Err(CheckError::FieldMismatch {
            field: field.to_string(),
            expected: format!("'{}'", expected),
            actual: actual.to_string(),
        })
    }
}

/// Render a record id as a string; numeric ids keep their JSON form
pub fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract the `id` of a created record
pub fn extract_id(object: &Map<String, Value>) -> Result<String, CheckError> {
    match object.get("id") {
        Some(Value::Null) | None => Err(CheckError::MissingField("id".to_string())),
        Some(id) => Ok(id_to_string(id)),
    }
}

/// Decode a record list, requiring an array of objects
pub fn parse_record_list(value: &Value) -> Result<&[Value], CheckError> {
    let records = value.as_array().ok_or(CheckError::NotAnArray)?;
    if records.iter().all(Value::is_object) {
        Ok(records.as_slice())
    } else {
        Err(CheckError::NonObjectRecord)
    }
}

/// Find the record whose `id` matches
pub fn find_record<'a>(records: &'a [Value], id: &str) -> Option<&'a Value> {
    records
        .iter()
        .find(|record| record.get("id").map(id_to_string).as_deref() == Some(id))
}

/// Validate the allow-origin header against the origin that was sent
///
/// Accepts the wildcard `*` or an exact echo of the sent origin.
pub fn validate_allow_origin(
    response: &ApiResponse,
    sent_origin: &str,
) -> Result<String, CheckError> {
    let received = response
        .header(ALLOW_ORIGIN_HEADER)
        .ok_or_else(|| CheckError::MissingHeader(ALLOW_ORIGIN_HEADER.to_string()))?;

    if received == "*" || received == sent_origin {
        Ok(received.to_string())
    } else {
        Err(CheckError::OriginNotAllowed {
            sent: sent_origin.to_string(),
            received: received.to_string(),
        })
    }
}
