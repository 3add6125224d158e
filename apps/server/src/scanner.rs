//! Periodic multi-network scan orchestration.

use futures_util::future::join_all;
use scanner_alerts::{Notifier, NotifyOutcome};
use scanner_core::Opportunity;
use scanner_engine::{NetworkPipeline, ScanError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};

/// Counters for one scan cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub networks_scanned: usize,
    pub networks_failed: usize,
    pub quotes_collected: usize,
    pub opportunities: usize,
    pub notifications_sent: usize,
    pub notifications_throttled: usize,
    pub notifications_failed: usize,
}

/// Runs every network pipeline concurrently, then dispatches the
/// opportunities found in network order.
pub struct Scanner {
    pipelines: Vec<Arc<NetworkPipeline>>,
    notifier: Notifier,
}

impl Scanner {
    pub fn new(pipelines: Vec<NetworkPipeline>, notifier: Notifier) -> Self {
        Self {
            pipelines: pipelines.into_iter().map(Arc::new).collect(),
            notifier,
        }
    }

    /// Scan all networks once and notify every opportunity found.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let handles: Vec<_> = self
            .pipelines
            .iter()
            .map(|pipeline| {
                let pipeline = pipeline.clone();
                tokio::spawn(async move { pipeline.scan().await })
            })
            .collect();
        let results = join_all(handles).await;

        // `join_all` keeps input order, so opportunities stay in network order.
        let mut opportunities: Vec<Opportunity> = Vec::new();
        for (pipeline, result) in self.pipelines.iter().zip(results) {
            let network = pipeline.network();
            let result = result.unwrap_or_else(|e| {
                Err(ScanError::TaskFailed {
                    network,
                    reason: e.to_string(),
                })
            });
            match result {
                Ok(scan) => {
                    report.networks_scanned += 1;
                    report.quotes_collected += scan.quotes_collected;
                    opportunities.extend(scan.opportunities);
                }
                Err(e) => {
                    report.networks_failed += 1;
                    error!(network = %network, error = %e, "Network scan failed");
                }
            }
        }

        report.opportunities = opportunities.len();
        for opportunity in &opportunities {
            match self.notifier.notify(opportunity).await {
                NotifyOutcome::Sent => report.notifications_sent += 1,
                NotifyOutcome::Throttled => report.notifications_throttled += 1,
                NotifyOutcome::Failed => report.notifications_failed += 1,
            }
        }

        info!(
            networks = report.networks_scanned,
            failed = report.networks_failed,
            quotes = report.quotes_collected,
            opportunities = report.opportunities,
            sent = report.notifications_sent,
            throttled = report.notifications_throttled,
            alert_failures = report.notifications_failed,
            "Scan cycle complete"
        );
        report
    }

    /// Run cycles every `period` until Ctrl-C.
    pub async fn run(&mut self, period: Duration) -> usize {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        self.run_until(period, shutdown).await
    }

    /// Run cycles every `period`, starting immediately, until `shutdown`
    /// completes. Shutdown is only observed between cycles. Returns the
    /// number of cycles run.
    ///
    /// A cycle that overruns the period drops the ticks that fell due while
    /// it ran; the next cycle starts one period after it finished.
    pub async fn run_until(&mut self, period: Duration, shutdown: impl Future<Output = ()>) -> usize {
        info!(interval_ms = period.as_millis() as u64, "Starting scanner");
        let mut ticker = tokio::time::interval(period);
        tokio::pin!(shutdown);
        let mut cycles = 0usize;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(cycles, "Shutting down scanner");
                    break;
                }
                _ = ticker.tick() => {
                    let started = Instant::now();
                    self.run_cycle().await;
                    cycles += 1;

                    let elapsed = started.elapsed();
                    if elapsed >= period {
                        info!(
                            elapsed_ms = elapsed.as_millis() as u64,
                            "Scan cycle overran interval, skipping missed ticks"
                        );
                        ticker.reset();
                    }
                }
            }
        }
        cycles
    }
}
