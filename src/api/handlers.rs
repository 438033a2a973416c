//! Request handlers for the diagnostic endpoints
//!
//! Internal-call failures are data here, not HTTP errors: `/call-b` and
//! `/test-load-balancing` always answer 200 and report failures inside the
//! payload, since the point is diagnostic visibility.

use axum::{
    extract::{ConnectInfo, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::internal::InternalClient;
use crate::probe::{self, ProbeReport};
use crate::snapshot::RequestSnapshot;
use crate::AppState;

/// Static identity payload for `/`
#[derive(Serialize)]
pub struct RootInfo {
    pub app: &'static str,
    pub message: &'static str,
    pub app_b_url: String,
}

/// Liveness payload for `/health`
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Deserialize)]
pub struct CallBParams {
    /// CPU-load hint, forwarded unmodified to the internal service
    pub fib: Option<u64>,
}

/// Response envelope for `/call-b`: both vantage points side by side
#[derive(Serialize)]
pub struct CallBResponse {
    pub test_description: &'static str,
    pub app_a_received: AppAReceived,
    pub internal_call_to_app_b: InternalCallInfo,
    pub app_b_response: AppBResponse,
}

#[derive(Serialize)]
pub struct AppAReceived {
    pub description: &'static str,
    #[serde(flatten)]
    pub snapshot: RequestSnapshot,
}

#[derive(Serialize)]
pub struct InternalCallInfo {
    pub description: &'static str,
    pub url_used: String,
    pub fib_param: Option<u64>,
    pub call_success: bool,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct AppBResponse {
    pub description: &'static str,
    pub data: Option<Value>,
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootInfo> {
    Json(RootInfo {
        app: "test-header-a",
        message: "VPC request chain tracer",
        app_b_url: state.settings.internal.base_url.clone(),
    })
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "healthy" })
}

/// Dual-vantage-point comparator: capture the edge view of the inbound
/// request, make one internal call, return both perspectives.
pub async fn call_b(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Query(params): Query<CallBParams>,
    headers: HeaderMap,
) -> Json<CallBResponse> {
    let snapshot = RequestSnapshot::capture(connect_info.map(|ConnectInfo(addr)| addr), &headers);

    let client = InternalClient::new(&state.settings);
    let timeout = Duration::from_secs(state.settings.internal.call_timeout_secs);
    let result = client.call_diagnostic(params.fib, timeout).await;

    Json(CallBResponse {
        test_description: "External request to App A, which then calls App B internally",
        app_a_received: AppAReceived {
            description: "What App A saw from the external caller (through the load balancer)",
            snapshot,
        },
        internal_call_to_app_b: InternalCallInfo {
            description: "App A called App B using the internal VPC URL",
            url_used: result.target_url,
            fib_param: params.fib,
            call_success: result.succeeded,
            error: result.error,
        },
        app_b_response: AppBResponse {
            description: "What App B saw when App A called it (internal VPC request)",
            data: result.body,
        },
    })
}

/// Load-balancing probe: N independent sequential internal calls, one
/// fresh connection each, tabulated by answering replica.
pub async fn test_load_balancing(State(state): State<Arc<AppState>>) -> Json<ProbeReport> {
    let client = InternalClient::new(&state.settings);
    let internal = &state.settings.internal;
    let report = probe::run(
        &client,
        internal.probe_attempts,
        internal.expected_pods,
        Duration::from_secs(internal.probe_timeout_secs),
    )
    .await;

    Json(report)
}
