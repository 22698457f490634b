use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::ReportCache;
use crate::client::ReportSource;
use crate::error::ClientError;
use crate::types::InvestigationReport;

/// What asked for a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTrigger {
    Tick,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStart {
    Started,
    /// Another poll is outstanding; this request was dropped, not queued
    Coalesced,
    Unauthenticated,
    ShutDown,
}

/// Raw result of a finished poll task
#[derive(Debug)]
pub enum PollOutcome {
    Reports(Vec<InvestigationReport>),
    Error(ClientError),
    Aborted,
}

/// Result of folding a poll into the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Merged { reports: usize },
    Failed(String),
    Discarded,
}

/// Drives a `ReportSource` with an in-flight guard: at most one listing call
/// is outstanding at any time.
pub struct PollingScheduler<S: ReportSource + 'static> {
    source: Arc<S>,
    in_flight: Option<JoinHandle<Result<Vec<InvestigationReport>, ClientError>>>,
    shut_down: bool,
}

impl<S: ReportSource + 'static> PollingScheduler<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            in_flight: None,
            shut_down: false,
        }
    }

    /// Repeating timer for tick-driven polls. Ticks missed while the loop was
    /// busy are skipped rather than replayed in a burst.
    pub fn ticker(period: Duration) -> Interval {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn trigger(&mut self, trigger: PollTrigger) -> PollStart {
        if self.shut_down {
            return PollStart::ShutDown;
        }
        if !self.source.is_authenticated() {
            debug!("Skipping {:?} poll: no credentials", trigger);
            return PollStart::Unauthenticated;
        }
        if self.in_flight.is_some() {
            debug!("Coalescing {:?} poll into the outstanding one", trigger);
            return PollStart::Coalesced;
        }

        debug!("Starting {:?} poll", trigger);
        let source = Arc::clone(&self.source);
        self.in_flight = Some(tokio::spawn(async move { source.list_reports().await }));
        PollStart::Started
    }

    /// Wait for the outstanding poll. Never resolves when nothing is in
    /// flight, so it can sit in a `select!` next to other event sources.
    /// Cancel safe: dropping the future leaves the poll outstanding.
    pub async fn next_outcome(&mut self) -> PollOutcome {
        let Some(handle) = self.in_flight.as_mut() else {
            return futures::future::pending().await;
        };

        let joined = handle.await;
        self.in_flight = None;

        match joined {
            Ok(Ok(reports)) => PollOutcome::Reports(reports),
            Ok(Err(e)) => PollOutcome::Error(e),
            Err(e) => {
                debug!("Poll task did not complete: {}", e);
                PollOutcome::Aborted
            }
        }
    }

    /// Fold a finished poll into the cache. Failures leave the cache untouched
    /// and come back as a warning message for the user.
    pub fn apply(&mut self, outcome: PollOutcome, cache: &mut ReportCache) -> PollStatus {
        if self.shut_down {
            return PollStatus::Discarded;
        }

        match outcome {
            PollOutcome::Reports(reports) => {
                let count = reports.len();
                cache.merge(reports);
                info!("Merged {} reports ({} cached)", count, cache.len());
                PollStatus::Merged { reports: count }
            }
            PollOutcome::Error(e) => {
                warn!("Poll failed: {}", e);
                PollStatus::Failed(format!("Failed to refresh data: {}", e))
            }
            PollOutcome::Aborted => PollStatus::Discarded,
        }
    }

    /// Trigger, wait and apply in one go. Returns `None` when no poll started.
    pub async fn poll_once(&mut self, trigger: PollTrigger, cache: &mut ReportCache) -> Option<PollStatus> {
        if self.trigger(trigger) != PollStart::Started {
            return None;
        }
        let outcome = self.next_outcome().await;
        Some(self.apply(outcome, cache))
    }

    /// Abandon any outstanding call. Nothing is written to a cache afterwards.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl<S: ReportSource + 'static> Drop for PollingScheduler<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
