use std::sync::Arc;

use cookiejar_infra::CookieSource;
use cookiejar_persistence::StorageError;
use tokio::sync::mpsc;
use tracing::debug;

use crate::aggregator::{Aggregation, AggregationEvent, CookieAggregator, RunId};
use crate::domain::{BootState, ViewerState};
use crate::ports::Presenter;
use crate::watchlist_store::WatchListStore;

/// The viewer surface: reloads the watch-list, runs one aggregation per
/// refresh and renders the joined records once that run finishes.
///
/// Aggregations run on spawned tasks and report back over a channel; events
/// from any run other than the latest are dropped in `tick`.
pub struct ViewerKernel<S: CookieSource + ?Sized + 'static, P> {
    state: ViewerState,
    watch_list: WatchListStore,
    aggregator: Arc<CookieAggregator<S>>,
    presenter: Arc<P>,

    tx: mpsc::Sender<AggregationEvent>,
    rx: mpsc::Receiver<AggregationEvent>,
}

impl<S, P> ViewerKernel<S, P>
where
    S: CookieSource + ?Sized + 'static,
    P: Presenter,
{
    pub fn new(watch_list: WatchListStore, aggregator: CookieAggregator<S>, presenter: P) -> Self {
        let (tx, rx) = mpsc::channel(100);
        Self {
            state: ViewerState::default(),
            watch_list,
            aggregator: Arc::new(aggregator),
            presenter: Arc::new(presenter),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn sender(&self) -> mpsc::Sender<AggregationEvent> {
        self.tx.clone()
    }

    /// Reads the current watch-list and starts a fresh aggregation over it.
    /// Any run still in flight is superseded.
    pub async fn refresh(&mut self) -> Result<RunId, StorageError> {
        let list = match self.watch_list.load().await {
            Ok(list) => list,
            Err(e) => {
                let message = e.to_string();
                self.state.boot = BootState::Failed(message.clone());
                self.state.last_error = Some(message.clone());
                self.presenter.show_error(&message);
                return Err(e);
            }
        };

        let run_id = uuid::Uuid::new_v4();
        self.state.boot = BootState::Loading;
        self.state.list = list.clone();
        self.state.current_run = Some(run_id);
        self.state.settled = 0;
        self.state.records.clear();
        self.state.last_error = None;

        let aggregator = self.aggregator.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            aggregator.run_with_events(run_id, &list, tx).await;
        });
        debug!(%run_id, "aggregation started");
        Ok(run_id)
    }

    /// Applies queued events without blocking. Returns the aggregation if the
    /// current run finished during this tick.
    pub fn tick(&mut self) -> Option<Aggregation> {
        let mut finished = None;
        while let Ok(ev) = self.rx.try_recv() {
            if let Some(done) = self.handle(ev) {
                finished = Some(done);
            }
        }
        finished
    }

    /// Waits until the current run finishes. Returns `None` when no run is
    /// in progress.
    pub async fn wait_for_render(&mut self) -> Option<Aggregation> {
        while self.state.is_aggregating() {
            let ev = self.rx.recv().await?;
            if let Some(done) = self.handle(ev) {
                return Some(done);
            }
        }
        None
    }

    fn handle(&mut self, ev: AggregationEvent) -> Option<Aggregation> {
        if self.state.current_run != Some(ev.run_id()) {
            debug!(run_id = %ev.run_id(), "dropping event from superseded run");
            return None;
        }
        match ev {
            AggregationEvent::Started { .. } => None,
            AggregationEvent::LookupSettled { .. } => {
                self.state.settled += 1;
                None
            }
            AggregationEvent::Finished { aggregation, .. } => {
                if self.state.boot != BootState::Loading {
                    return None;
                }
                self.state.boot = BootState::Ready;
                self.state.settled = aggregation.settled;
                self.state.records = aggregation.records.clone();
                self.presenter.render_cookies(&self.state.records);
                Some(aggregation)
            }
        }
    }
}
