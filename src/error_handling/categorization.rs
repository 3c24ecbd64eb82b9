//! Error categorization and retry strategy.
//!
//! This module maps gateway errors onto counted categories and decides which of
//! them are worth retrying.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::stats::ProcessingStats;
use super::types::{ErrorType, GatewayError, InfoType};
use crate::config::{RetryPolicy, HTTP_STATUS_TOO_MANY_REQUESTS};

/// `ExponentialBackoff` multiplies its base by itself on every step, so a base
/// of 2 with `factor = initial / 2` yields `initial, 2*initial, 4*initial, ...`.
const RETRY_BACKOFF_BASE: u64 = 2;

/// Creates the exponential backoff delays used between gateway attempts.
///
/// The iterator yields one delay per retry, so it holds `max_attempts - 1`
/// items: `tokio_retry` makes the initial attempt without waiting.
pub fn get_retry_strategy(policy: &RetryPolicy) -> impl Iterator<Item = Duration> {
    let initial_ms = u64::try_from(policy.initial_delay.as_millis()).unwrap_or(u64::MAX);
    ExponentialBackoff::from_millis(RETRY_BACKOFF_BASE)
        .factor((initial_ms / RETRY_BACKOFF_BASE).max(1))
        .max_delay(policy.max_delay)
        .take(policy.max_attempts.saturating_sub(1))
}

/// Whether a failed gateway call may succeed if repeated.
///
/// Timeouts, connection failures, 429 and 5xx responses are transient. Not-found
/// answers, other 4xx responses and undecodable bodies are permanent.
pub fn is_retriable(error: &GatewayError) -> bool {
    match error {
        GatewayError::NotFound(_) | GatewayError::Malformed(_) | GatewayError::Io(_) => false,
        GatewayError::Status { status, .. } => {
            *status == HTTP_STATUS_TOO_MANY_REQUESTS || (500..600).contains(status)
        }
        GatewayError::Transport(e) => {
            if let Some(status) = e.status() {
                let code = status.as_u16();
                return code == HTTP_STATUS_TOO_MANY_REQUESTS || status.is_server_error();
            }
            e.is_timeout() || e.is_connect() || e.is_request()
        }
    }
}

fn categorize_status(status: u16) -> ErrorType {
    match status {
        HTTP_STATUS_TOO_MANY_REQUESTS => ErrorType::GatewayTooManyRequests,
        500..=599 => ErrorType::GatewayServerError,
        400..=499 => ErrorType::GatewayClientError,
        _ => ErrorType::GatewayOther,
    }
}

/// Categorizes a gateway error into an `ErrorType`.
///
/// Returns `None` for `NotFound`, which is an answer rather than a failure.
pub fn categorize_gateway_error(error: &GatewayError) -> Option<ErrorType> {
    let error_type = match error {
        GatewayError::NotFound(_) => return None,
        GatewayError::Status { status, .. } => categorize_status(*status),
        GatewayError::Malformed(_) => ErrorType::GatewayMalformedResponse,
        GatewayError::Io(_) => ErrorType::GatewayIo,
        GatewayError::Transport(e) => {
            if let Some(status) = e.status() {
                categorize_status(status.as_u16())
            } else if e.is_timeout() {
                ErrorType::GatewayTimeout
            } else if e.is_connect() {
                ErrorType::GatewayConnect
            } else if e.is_decode() {
                ErrorType::GatewayDecode
            } else {
                ErrorType::GatewayOther
            }
        }
    };
    Some(error_type)
}

/// Records a gateway error in the processing statistics.
pub fn record_gateway_error(stats: &ProcessingStats, error: &GatewayError) {
    match categorize_gateway_error(error) {
        Some(error_type) => stats.increment_error(error_type),
        None => stats.increment_info(InfoType::GatewayNotFound),
    }
}
