//! Request descriptor and response envelope shared by every service.
//!
//! A service never sees an HTTP request directly: both the plain HTTP
//! endpoints and the `/invoke` endpoint reduce the call to an [`ApiRequest`]
//! and expect an [`ApiResponse`] back.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ApiError;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const CONTENT_TYPE: &str = "Content-Type";

const PREFLIGHT_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const PREFLIGHT_MAX_AGE: &str = "86400";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// One invocation: `{ httpMethod, body, queryStringParameters }`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl ApiRequest {
    /// A missing method is treated as GET.
    pub fn method(&self) -> Result<HttpMethod, UnsupportedMethod> {
        match self.http_method.as_deref() {
            None => Ok(HttpMethod::Get),
            Some(method) => method.parse(),
        }
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()?
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Integer query parameter; values that do not parse count as absent.
    pub fn query_id(&self, key: &str) -> Option<i64> {
        self.query(key)?.trim().parse().ok()
    }

    /// Decodes the JSON body into an input record. Never rejects: an absent,
    /// blank, `null` or non-JSON body yields the empty record, and the input
    /// records themselves drop fields they cannot read.
    pub fn json_body<T>(&self) -> T
    where
        T: DeserializeOwned + Default,
    {
        let Some(body) = self.body.as_deref().filter(|b| !b.trim().is_empty()) else {
            return T::default();
        };

        match serde_json::from_str::<Option<T>>(body) {
            Ok(record) => record.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("Ignoring unreadable request body: {}", err);
                T::default()
            }
        }
    }
}

/// `{ statusCode, headers, body, isBase64Encoded }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(value)?;
        Ok(Self::json_text(status, body))
    }

    pub fn ok<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Self::json(StatusCode::OK, value)
    }

    pub fn created<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Self::json(StatusCode::CREATED, value)
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json_text(status, serde_json::json!({ "error": message }).to_string())
    }

    /// Fixed CORS answer: no body, no content type, no database access.
    /// Every service advertises the same verb list.
    pub fn preflight(allow_headers: &str) -> Self {
        let headers = BTreeMap::from([
            (ALLOW_ORIGIN.to_string(), "*".to_string()),
            (ALLOW_METHODS.to_string(), PREFLIGHT_METHODS.to_string()),
            (ALLOW_HEADERS.to_string(), allow_headers.to_string()),
            (MAX_AGE.to_string(), PREFLIGHT_MAX_AGE.to_string()),
        ]);

        ApiResponse {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    fn json_text(status: StatusCode, body: String) -> Self {
        let headers = BTreeMap::from([
            (CONTENT_TYPE.to_string(), "application/json".to_string()),
            (ALLOW_ORIGIN.to_string(), "*".to_string()),
        ]);

        ApiResponse {
            status_code: status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Body::from(self.body)).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header {}", name),
            }
        }

        response
    }
}
