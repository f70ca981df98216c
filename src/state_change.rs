// This file is part of the terraform-provider-paas project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Polling of a remote object until it reaches a target state.
//!
//! The transition logic lives in the pure [`step`] function; [`wait_for_state`]
//! only owns timing, backoff, timeout and cancellation.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::format_duration;
use crate::utils::quoted_list;

pub const DEFAULT_NOT_FOUND_CHECKS: usize = 20;
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Single-shot probe of the remote state.
#[async_trait]
pub trait StateRefresh: Send + Sync {
    type Output: Send;

    /// Current object and its state, `None` when the object does not exist.
    async fn refresh(&self) -> Result<Option<(Self::Output, String)>>;
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error(
        "timeout while waiting for state to become {} (last state: '{last_state}', timeout: {})",
        quoted_list(.expected),
        display_timeout(.timeout)
    )]
    Timeout {
        last_state: String,
        expected: Vec<String>,
        timeout: Duration,
    },
    #[error("unexpected state '{state}', wanted target {}", quoted_list(.expected))]
    UnexpectedState { state: String, expected: Vec<String> },
    #[error("couldn't find resource ({checks} retries)")]
    NotFound { checks: usize },
    #[error("wait cancelled")]
    Cancelled,
    #[error(transparent)]
    Probe(anyhow::Error),
}

fn display_timeout(timeout: &Duration) -> String {
    format_duration(*timeout)
}

/// Terminal failure of a wait, with the object of the last probe if any.
#[derive(Debug)]
pub struct WaitFailure<T> {
    pub error: WaitError,
    pub last: Option<T>,
}

#[derive(Debug, Clone)]
pub struct StateChangeConf {
    pub pending: Vec<String>,
    pub target: Vec<String>,
    /// Wait before the first probe.
    pub delay: Duration,
    /// Fixed interval between probes, replacing the exponential backoff.
    pub poll_interval: Option<Duration>,
    /// Lower bound of the backoff.
    pub min_timeout: Duration,
    pub timeout: Duration,
    /// Consecutive not-found probes tolerated before the wait fails with
    /// [`WaitError::NotFound`].
    pub not_found_checks: usize,
}

impl StateChangeConf {
    pub fn new(pending: &[&str], target: &[&str], timeout: Duration) -> Self {
        Self {
            pending: pending.iter().map(|s| s.to_string()).collect(),
            target: target.iter().map(|s| s.to_string()).collect(),
            delay: Duration::ZERO,
            poll_interval: None,
            min_timeout: Duration::ZERO,
            timeout,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
        }
    }

    pub fn with_not_found_checks(mut self, checks: usize) -> Self {
        self.not_found_checks = checks;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn with_min_timeout(mut self, min_timeout: Duration) -> Self {
        self.min_timeout = min_timeout;
        self
    }

    /// Interval before the probe following one that waited `previous`.
    pub fn next_interval(&self, previous: Duration) -> Duration {
        if let Some(interval) = self.poll_interval {
            return interval;
        }
        let next = if previous.is_zero() {
            INITIAL_BACKOFF
        } else {
            previous * 2
        };
        next.min(MAX_BACKOFF).max(self.min_timeout)
    }
}

/// Bookkeeping carried between probes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub probes: usize,
    pub not_found: usize,
    pub last_state: String,
}

#[derive(Debug)]
pub enum WaitState<T> {
    Polling { progress: Progress, last: Option<T> },
    Succeeded(Option<T>),
    Failed { error: WaitError, last: Option<T> },
}

/// Transition after one probe.
pub fn step<T>(
    conf: &StateChangeConf,
    mut progress: Progress,
    probe: Result<Option<(T, String)>>,
) -> WaitState<T> {
    progress.probes += 1;

    match probe {
        Err(err) => WaitState::Failed {
            error: WaitError::Probe(err),
            last: None,
        },
        Ok(None) => {
            if conf.target.is_empty() {
                return WaitState::Succeeded(None);
            }
            progress.not_found += 1;
            progress.last_state = String::new();
            if progress.not_found > conf.not_found_checks {
                WaitState::Failed {
                    error: WaitError::NotFound {
                        checks: progress.not_found,
                    },
                    last: None,
                }
            } else {
                WaitState::Polling {
                    progress,
                    last: None,
                }
            }
        }
        Ok(Some((object, state))) => {
            progress.not_found = 0;
            if conf.target.contains(&state) {
                WaitState::Succeeded(Some(object))
            } else if conf.pending.contains(&state) {
                progress.last_state = state;
                WaitState::Polling {
                    progress,
                    last: Some(object),
                }
            } else {
                WaitState::Failed {
                    error: WaitError::UnexpectedState {
                        state,
                        expected: conf.target.clone(),
                    },
                    last: Some(object),
                }
            }
        }
    }
}

/// Probe `refresh` until a target state, a failure, the timeout or cancellation.
pub async fn wait_for_state<R: StateRefresh>(
    conf: &StateChangeConf,
    token: &CancellationToken,
    refresh: &R,
) -> Result<Option<R::Output>, WaitFailure<R::Output>> {
    let deadline = tokio::time::sleep(conf.timeout);
    tokio::pin!(deadline);

    let mut progress = Progress::default();
    let mut last = None;
    let mut wait = Duration::ZERO;
    let mut pause = conf.delay;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                return Err(WaitFailure {
                    error: WaitError::Cancelled,
                    last,
                });
            }
            _ = &mut deadline => {
                return Err(WaitFailure {
                    error: WaitError::Timeout {
                        last_state: progress.last_state,
                        expected: conf.target.clone(),
                        timeout: conf.timeout,
                    },
                    last,
                });
            }
            probe = async {
                tokio::time::sleep(pause).await;
                refresh.refresh().await
            } => {
                match step(conf, std::mem::take(&mut progress), probe) {
                    WaitState::Polling { progress: next, last: object } => {
                        tracing::debug!(
                            "Waiting for state {}: probe {} returned '{}'",
                            quoted_list(&conf.target),
                            next.probes,
                            next.last_state
                        );
                        progress = next;
                        last = object;
                    }
                    WaitState::Succeeded(object) => return Ok(object),
                    WaitState::Failed { error, last: object } => {
                        return Err(WaitFailure {
                            error,
                            last: object.or(last),
                        });
                    }
                }
            }
        }

        wait = conf.next_interval(wait);
        pause = wait;
    }
}
