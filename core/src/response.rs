//! `ApiResponse`: the status code plus whatever the service sent back.

use serde::de::DeserializeOwned;

use crate::http::HttpResponse;

/// Response body, typed when it deserializes and raw text when it does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<T> {
    Json(T),
    Raw(String),
}

/// Outcome of a single API call.
///
/// Produced for every status code. A 4xx or 5xx response is data, not an
/// error, and callers judge it themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Body<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Attempt to read the body as `T`, falling back to the raw text.
    pub fn from_http(response: HttpResponse) -> Self {
        let body = match serde_json::from_str::<T>(&response.body) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Raw(response.body),
        };
        Self {
            status: response.status,
            headers: response.headers,
            body,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 4xx and 5xx.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    pub fn json(&self) -> Option<&T> {
        match &self.body {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    pub fn into_json(self) -> Option<T> {
        match self.body {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match &self.body {
            Body::Json(_) => None,
            Body::Raw(text) => Some(text),
        }
    }
}
