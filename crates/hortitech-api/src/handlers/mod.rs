//! HTTP handlers

pub mod health;
pub mod greenhouses;
pub mod zones;
pub mod realtime;

use crate::error::ApiError;

/// Path ids must be positive integers; anything else never reaches a service.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest(format!("Invalid {what} id: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("5", "greenhouse").unwrap(), 5);
        assert!(parse_id("0", "greenhouse").is_err());
        assert!(parse_id("-3", "greenhouse").is_err());
        assert!(parse_id("abc", "greenhouse").is_err());
        assert!(parse_id("99999999999", "greenhouse").is_err());
    }
}
