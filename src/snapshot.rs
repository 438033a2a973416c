//! Edge vantage point capture
//!
//! Records what this service observed about an inbound request: the
//! transport-layer peer address and the complete header set. The client IP
//! is taken from the socket peer on purpose, never from forwarding headers,
//! so the raw and proxied values can be compared side by side.

use axum::http::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::net::SocketAddr;

/// Fixed subset of headers of specific diagnostic interest
#[derive(Debug, Clone, Serialize)]
pub struct SelectedHeaders {
    #[serde(rename = "x-forwarded-for")]
    pub x_forwarded_for: Option<String>,
    #[serde(rename = "x-real-ip")]
    pub x_real_ip: Option<String>,
    #[serde(rename = "do-connecting-ip")]
    pub do_connecting_ip: Option<String>,
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
    pub host: Option<String>,
}

/// What this service saw from the external caller, captured once per
/// request and immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSnapshot {
    pub client_ip: String,
    pub specific_headers: SelectedHeaders,
    pub all_headers: Map<String, Value>,
}

impl RequestSnapshot {
    /// Capture a snapshot from the request's peer address and headers.
    ///
    /// Header names are lowercased; the map preserves receipt order and the
    /// last value wins for repeated names.
    pub fn capture(peer: Option<SocketAddr>, headers: &HeaderMap) -> Self {
        let client_ip = peer
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let mut all_headers = Map::new();
        for (name, value) in headers.iter() {
            let rendered = String::from_utf8_lossy(value.as_bytes()).into_owned();
            all_headers.insert(name.as_str().to_string(), Value::String(rendered));
        }

        Self {
            client_ip,
            specific_headers: SelectedHeaders {
                x_forwarded_for: header_value(headers, "x-forwarded-for"),
                x_real_ip: header_value(headers, "x-real-ip"),
                do_connecting_ip: header_value(headers, "do-connecting-ip"),
                user_agent: header_value(headers, "user-agent"),
                host: header_value(headers, "host"),
            },
            all_headers,
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
