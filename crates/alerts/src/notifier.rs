//! Throttled alert dispatch.

use crate::format::format_opportunity_message;
use crate::AlertSink;
use scanner_core::Opportunity;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Configuration for the notifier.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Minimum time between two dispatch attempts, across all opportunities.
    pub cooldown: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(2000),
        }
    }
}

/// When the last dispatch was attempted. Only the owning `Notifier` mutates it.
#[derive(Debug, Default)]
pub struct NotificationState {
    last_attempt: Option<Instant>,
}

impl NotificationState {
    pub fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }

    fn cooling_down(&self, now: Instant, cooldown: Duration) -> bool {
        self.last_attempt
            .is_some_and(|last| now.saturating_duration_since(last) < cooldown)
    }
}

/// What happened to a single notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    Throttled,
    Failed,
}

/// Formats opportunities and hands them to an alert sink, at most once per cooldown.
pub struct Notifier {
    sink: Arc<dyn AlertSink>,
    destination: String,
    config: NotifierConfig,
    state: NotificationState,
}

impl Notifier {
    pub fn new(sink: Arc<dyn AlertSink>, destination: impl Into<String>, config: NotifierConfig) -> Self {
        Self {
            sink,
            destination: destination.into(),
            config,
            state: NotificationState::default(),
        }
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    /// Send an alert for `opportunity` unless the cooldown is active.
    ///
    /// The cooldown restarts on every attempt, successful or not. Failed
    /// deliveries are logged and dropped.
    pub async fn notify(&mut self, opportunity: &Opportunity) -> NotifyOutcome {
        let now = Instant::now();
        if self.state.cooling_down(now, self.config.cooldown) {
            warn!(
                network = %opportunity.network,
                pair = %opportunity.pair,
                "Skipping notification due to cooldown"
            );
            return NotifyOutcome::Throttled;
        }
        self.state.last_attempt = Some(now);

        let message = format_opportunity_message(opportunity, chrono::Utc::now());
        match self.sink.deliver(&self.destination, &message).await {
            Ok(()) => {
                info!(
                    network = %opportunity.network,
                    pair = %opportunity.pair,
                    spread_pct = format!("{:.2}", opportunity.spread_pct),
                    "Alert sent"
                );
                NotifyOutcome::Sent
            }
            Err(e) => {
                error!(
                    network = %opportunity.network,
                    pair = %opportunity.pair,
                    error = %e,
                    "Failed to send alert"
                );
                NotifyOutcome::Failed
            }
        }
    }
}
