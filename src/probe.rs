//! Load-balancing probe
//!
//! Empirically determines whether internal traffic is spread across
//! multiple backend replicas by issuing N independent sequential calls and
//! tabulating which replica answered each one.
//!
//! The replica identifier is the `client_ip` field of the internal
//! service's response body. The wire name is kept for compatibility with
//! the internal service's existing contract, but it carries pod-level
//! identity rather than a real client IP.

use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::internal::InternalClient;

/// Outcome of one probe attempt
#[derive(Debug, Clone, Serialize)]
pub struct ProbeAttempt {
    pub call_number: u32,
    pub pod_ip: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

/// Aggregated result of a full probe run
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub test_description: String,
    pub total_calls: u32,
    /// Operator reference only; the verdict never uses this value
    pub expected_pods: u32,
    pub detailed_results: Vec<ProbeAttempt>,
    pub ip_distribution: Map<String, Value>,
    pub unique_pod_ips_seen: u32,
    pub load_balancing_working: bool,
    pub conclusion: String,
}

impl ProbeReport {
    /// Aggregate per-attempt records into a report.
    ///
    /// The distribution counts only successful attempts, keyed in
    /// first-seen order; the verdict is purely the observed uniqueness.
    pub fn from_attempts(
        expected_pods: u32,
        detailed_results: Vec<ProbeAttempt>,
    ) -> Self {
        let mut ip_distribution = Map::new();
        for attempt in &detailed_results {
            if let Some(pod_ip) = &attempt.pod_ip {
                let count = ip_distribution
                    .get(pod_ip)
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                ip_distribution.insert(pod_ip.clone(), Value::from(count + 1));
            }
        }

        let unique_pod_ips_seen = ip_distribution.len() as u32;
        let load_balancing_working = unique_pod_ips_seen > 1;
        let total_calls = detailed_results.len() as u32;

        let conclusion = if load_balancing_working {
            format!(
                "Load balancing is working: {} distinct pods answered {} calls",
                unique_pod_ips_seen, total_calls
            )
        } else if unique_pod_ips_seen == 1 {
            format!(
                "Load balancing not observed: all successful calls were answered by the same pod ({} calls)",
                total_calls
            )
        } else {
            "No successful calls: unable to observe any pod".to_string()
        };

        Self {
            test_description:
                "Repeated independent internal calls to observe backend replica distribution"
                    .to_string(),
            total_calls,
            expected_pods,
            detailed_results,
            ip_distribution,
            unique_pod_ips_seen,
            load_balancing_working,
            conclusion,
        }
    }
}

/// Run the probe: `attempts` strictly sequential diagnostic calls, each on
/// a fresh connection, each fully awaited before the next begins.
///
/// A failed attempt is recorded and the run continues; all attempts are
/// always made.
pub async fn run(
    client: &InternalClient,
    attempts: u32,
    expected_pods: u32,
    timeout: Duration,
) -> ProbeReport {
    let mut detailed_results = Vec::with_capacity(attempts as usize);

    for call_number in 1..=attempts {
        let result = client.call_diagnostic(None, timeout).await;

        let attempt = match (result.succeeded, result.body) {
            (true, Some(body)) => match body.get("client_ip").and_then(Value::as_str) {
                Some(pod_ip) => ProbeAttempt {
                    call_number,
                    pod_ip: Some(pod_ip.to_string()),
                    success: true,
                    error: None,
                },
                // A body without the identifier cannot be attributed to a
                // replica; count the attempt as failed.
                None => ProbeAttempt {
                    call_number,
                    pod_ip: None,
                    success: false,
                    error: Some("response body missing client_ip field".to_string()),
                },
            },
            (_, _) => ProbeAttempt {
                call_number,
                pod_ip: None,
                success: false,
                error: result.error,
            },
        };

        debug!(
            call_number = attempt.call_number,
            pod_ip = ?attempt.pod_ip,
            success = attempt.success,
            "Probe attempt completed"
        );
        detailed_results.push(attempt);
    }

    let report = ProbeReport::from_attempts(expected_pods, detailed_results);
    info!(
        unique_pods = report.unique_pod_ips_seen,
        working = report.load_balancing_working,
        "Probe run completed"
    );
    report
}
