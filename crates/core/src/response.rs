//! Shape validation for the homework status API response
//!
//! The API answers with `{"homeworks": [...], "current_date": <unix ts>}`.
//! The body is kept as a `serde_json::Value` until these checks pass so that
//! each kind of malformed payload maps to its own [`CoreError`] variant instead
//! of a single deserialization failure.

use serde_json::Value;

use crate::error::CoreError;

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Validate the decoded response and return its homework list
///
/// Checks run in this order and the first violation is returned:
/// 1. the response is an object
/// 2. `homeworks` is present
/// 3. `current_date` is present
/// 4. `homeworks` is an array
///
/// The list is returned unchanged and may be empty.
pub fn check_response(response: &Value) -> Result<&[Value], CoreError> {
    let object = response
        .as_object()
        .ok_or(CoreError::NotAMapping("Ответ API"))?;

    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or(CoreError::MissingKey(HOMEWORKS_KEY))?;

    if !object.contains_key(CURRENT_DATE_KEY) {
        return Err(CoreError::MissingKey(CURRENT_DATE_KEY));
    }

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(CoreError::WrongType {
            key: HOMEWORKS_KEY,
            expected: "список",
        })
}

/// Extract the server-side timestamp used as the next poll cursor
pub fn current_date(response: &Value) -> Result<i64, CoreError> {
    let value = response
        .as_object()
        .ok_or(CoreError::NotAMapping("Ответ API"))?
        .get(CURRENT_DATE_KEY)
        .ok_or(CoreError::MissingKey(CURRENT_DATE_KEY))?;

    value.as_i64().ok_or(CoreError::WrongType {
        key: CURRENT_DATE_KEY,
        expected: "целое число",
    })
}
