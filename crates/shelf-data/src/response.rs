//! HTTP response handling.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::FetchError;

/// An HTTP response, fully read.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response was a client error (4xx status).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get a header value, case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Human-readable error message from the body.
    ///
    /// The hosted service reports errors as JSON with one of `message`,
    /// `error_description`, `msg` or `error`; anything else is returned as
    /// raw text.
    pub fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            for key in ["message", "error_description", "msg", "error"] {
                if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                    return msg.to_string();
                }
            }
        }
        match self.text() {
            Ok(text) if !text.trim().is_empty() => text,
            _ => format!("HTTP {}", self.status),
        }
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::HttpError {
                status: self.status,
                message: self.error_message(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    #[test]
    fn test_status_classes() {
        assert!(make_response(201, b"").is_success());
        assert!(!make_response(301, b"").is_success());
        assert!(make_response(401, b"").is_client_error());
        assert!(!make_response(503, b"").is_client_error());
    }

    #[test]
    fn test_json_rows() {
        let resp = make_response(200, br#"[{"id": 1}, {"id": 2}]"#);
        let rows: Vec<serde_json::Value> = resp.json().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(make_response(200, b"<html>").json::<Vec<i32>>().is_err());
    }

    #[test]
    fn test_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Content-Range".to_string(), "0-9/10".to_string());
        let resp = Response::new(200, headers, vec![]);
        assert_eq!(resp.header("content-range"), Some("0-9/10"));
        assert_eq!(resp.header("etag"), None);
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            make_response(400, br#"{"message":"duplicate key"}"#).error_message(),
            "duplicate key"
        );
        assert_eq!(
            make_response(400, br#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .error_message(),
            "Invalid login credentials"
        );
        assert_eq!(make_response(502, b"Bad Gateway").error_message(), "Bad Gateway");
        assert_eq!(make_response(500, b"").error_message(), "HTTP 500");
    }

    #[test]
    fn test_error_for_status() {
        assert!(make_response(204, b"").error_for_status().is_ok());
        let err = make_response(403, br#"{"message":"permission denied"}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "HTTP 403: permission denied");
    }
}
