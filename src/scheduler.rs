// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Scheduler
 * Fixed worker pool draining the domain queue into the findings queue
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::engine::{DomainCheck, Engine};
use crate::types::DomainFinding;

/// Worker pool running the detection engine over a queue of domains.
///
/// Rendezvous channels on both sides: producers block until a worker is
/// free, and workers block on the findings queue until the consumer keeps
/// up - that is the only backpressure in the pipeline. Findings come out
/// in whatever order the workers finish; within one finding the matches
/// keep check order.
pub struct Scanner {
    engine: Arc<Engine>,
    workers: usize,
    checks: Vec<DomainCheck>,
    domains_rx: flume::Receiver<String>,
}

impl Scanner {
    /// Returns the scanner and the sender side of its domain queue. Workers
    /// exit once every sender clone is dropped and the queue is drained.
    pub fn new(engine: Engine, workers: usize) -> (Self, flume::Sender<String>) {
        let (domains_tx, domains_rx) = flume::bounded(0);
        let scanner = Self {
            engine: Arc::new(engine),
            workers: workers.max(1),
            checks: DomainCheck::DEFAULT_ORDER.to_vec(),
            domains_rx,
        };
        (scanner, domains_tx)
    }

    /// Override the checks run per domain (order is preserved)
    pub fn with_checks(mut self, checks: Vec<DomainCheck>) -> Self {
        self.checks = checks;
        self
    }

    /// Start the workers. The returned queue yields one [`DomainFinding`]
    /// per input domain - empty match lists included - and closes once every
    /// worker has finished.
    pub fn scan(self) -> flume::Receiver<DomainFinding> {
        let (findings_tx, findings_rx) = flume::bounded(0);

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let engine = Arc::clone(&self.engine);
            let checks = self.checks.clone();
            let domains_rx = self.domains_rx.clone();
            let findings_tx = findings_tx.clone();

            handles.push(tokio::spawn(async move {
                while let Ok(domain) = domains_rx.recv_async().await {
                    info!("Checking {domain}");
                    let mut finding = DomainFinding::new(&domain);
                    for check in &checks {
                        match engine.run_check(*check, &domain).await {
                            Ok(matches) => finding.matches.extend(matches),
                            Err(e) => warn!("{e}"),
                        }
                    }
                    if findings_tx.send_async(finding).await.is_err() {
                        break;
                    }
                }
                debug!("scan worker {worker_id} finished");
            }));
        }
        drop(findings_tx);

        // the findings queue closes when the last worker drops its sender;
        // this task only waits for them so completion gets logged in order
        tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!("scan worker panicked: {e}");
                }
            }
            debug!("all scan workers finished");
        });

        findings_rx
    }
}
