use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use queuewatch_core::alerts::{AlertThresholds, InvalidThresholdInput};
use queuewatch_core::snapshot::ViewerSnapshot;

use crate::build_snapshot;
use crate::fetcher::ReportFetcher;

/// Read side of one viewer's refresh loop, plus the threshold control.
///
/// Readers always see a complete snapshot: the poller swaps in a new
/// `Arc<ViewerSnapshot>` only after a full cycle succeeds.
#[derive(Debug, Clone)]
pub struct ViewerHandle {
    snapshot_rx: watch::Receiver<Arc<ViewerSnapshot>>,
    thresholds_tx: Arc<watch::Sender<AlertThresholds>>,
}

impl ViewerHandle {
    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<ViewerSnapshot> {
        Arc::clone(&*self.snapshot_rx.borrow())
    }

    pub fn thresholds(&self) -> AlertThresholds {
        *self.thresholds_tx.borrow()
    }

    /// Validate and apply a threshold form. Takes effect on the next refresh.
    ///
    /// Validation runs against the value held under the channel lock, so
    /// concurrent updates to one viewer never overwrite each other.
    pub fn update_thresholds(
        &self,
        form: &HashMap<String, String>,
    ) -> Result<AlertThresholds, InvalidThresholdInput> {
        let mut outcome = Ok(AlertThresholds::default());
        self.thresholds_tx.send_if_modified(|current| {
            outcome = current.apply_form(form).map(|()| *current);
            outcome.is_ok()
        });
        outcome
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewerSnapshot>> {
        self.snapshot_rx.clone()
    }
}

struct Poller {
    fetcher: ReportFetcher,
    snapshot_tx: watch::Sender<Arc<ViewerSnapshot>>,
    thresholds_rx: watch::Receiver<AlertThresholds>,
}

impl Poller {
    fn new(fetcher: ReportFetcher, thresholds: AlertThresholds) -> (Self, ViewerHandle) {
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(ViewerSnapshot::default()));
        let (thresholds_tx, thresholds_rx) = watch::channel(thresholds);
        let poller = Self {
            fetcher,
            snapshot_tx,
            thresholds_rx,
        };
        let handle = ViewerHandle {
            snapshot_rx,
            thresholds_tx: Arc::new(thresholds_tx),
        };
        (poller, handle)
    }

    /// One fetch, parse, classify, publish cycle. A failed fetch leaves the
    /// previous snapshot in place.
    async fn refresh_once(&self) -> bool {
        let markup = match self.fetcher.fetch().await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!(error = %e, "Report refresh failed, keeping previous snapshot");
                return false;
            },
        };

        let thresholds = *self.thresholds_rx.borrow();
        let snapshot = build_snapshot(&markup, &thresholds);
        tracing::debug!(
            agents = snapshot.agents.len(),
            alerts = snapshot.alerts.len(),
            calls_in_queue = snapshot.total_calls_in_queue,
            "Published report snapshot"
        );
        self.snapshot_tx.send_replace(Arc::new(snapshot));
        true
    }

    async fn run(self, interval: Duration) {
        loop {
            self.refresh_once().await;
            if self.snapshot_tx.is_closed() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {},
                _ = self.snapshot_tx.closed() => break,
            }
        }
        tracing::debug!("Viewer poller stopped");
    }
}

/// Start a viewer's refresh loop. The first refresh runs immediately; the
/// loop ends on its own once every handle has been dropped.
pub fn spawn_viewer(
    fetcher: ReportFetcher,
    interval: Duration,
    thresholds: AlertThresholds,
) -> (ViewerHandle, JoinHandle<()>) {
    let (poller, handle) = Poller::new(fetcher, thresholds);
    let task = tokio::spawn(poller.run(interval));
    (handle, task)
}
