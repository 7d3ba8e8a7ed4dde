// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Retry-with-backoff-until-deadline policy.
//!
//! The policy is deliberately dumb: exponential growth capped at a maximum
//! interval, bounded by a maximum elapsed wall-clock budget. On exhaustion the
//! last error is surfaced unchanged so callers keep the original failure.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Configuration parameters for exponential backoff.
#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Cap applied to the growing interval.
    pub max_interval: Duration,
    /// Exponential factor applied after every failed attempt.
    pub multiplier: f64,
    /// Wall-clock budget; once spending the next delay would exceed it,
    /// retrying stops and the last error is returned.
    pub max_elapsed: Duration,
}

impl Default for BackoffConfig {
    /// Default policy: 500ms initial delay growing 1.5x up to one minute,
    /// bounded by a three minute total budget.
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            multiplier: 1.5,
            max_elapsed: Duration::from_secs(3 * 60),
        }
    }
}

impl BackoffConfig {
    fn next_interval(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.max_interval)
    }
}

/// Runs `operation` until it succeeds or the backoff budget is exhausted,
/// returning the last error on exhaustion.
pub async fn retry_with_backoff<T, E, F, Fut>(config: BackoffConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let start = Instant::now();
    let mut interval = config.initial_interval;
    let mut attempt: u32 = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let elapsed = start.elapsed();
                if elapsed + interval >= config.max_elapsed {
                    warn!("giving up after {attempt} attempts over {elapsed:?}: {err}");
                    return Err(err);
                }
                debug!("attempt {attempt} failed, retrying in {interval:?}: {err}");
                sleep(interval).await;
                interval = config.next_interval(interval);
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
