use std::sync::Arc;
use std::time::Duration;

use cookiejar_core::{CookieQuery, CookieRecord, DisplayRecord, WatchList};
use cookiejar_infra::CookieSource;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub type RunId = Uuid;

/// How one lookup settled. Every variant counts toward completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Matched,
    NoMatch,
    Failed(String),
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub run_id: RunId,
    /// Number of lookups dispatched, fixed before the first one starts.
    pub requested: usize,
    pub settled: usize,
    /// Found cookies in settlement order.
    pub records: Vec<DisplayRecord>,
    pub failed: usize,
    pub timed_out: usize,
}

#[derive(Debug, Clone)]
pub enum AggregationEvent {
    Started {
        run_id: RunId,
        requested: usize,
    },
    LookupSettled {
        run_id: RunId,
        index: usize,
        outcome: LookupOutcome,
    },
    Finished {
        run_id: RunId,
        aggregation: Aggregation,
    },
}

impl AggregationEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            AggregationEvent::Started { run_id, .. }
            | AggregationEvent::LookupSettled { run_id, .. }
            | AggregationEvent::Finished { run_id, .. } => *run_id,
        }
    }
}

/// Fans one lookup per watch spec out to the cookie source and joins them.
///
/// All per-run state (counter, collected results) lives inside a single call,
/// so overlapping runs never see each other's results.
pub struct CookieAggregator<S: CookieSource + ?Sized> {
    source: Arc<S>,
    lookup_timeout: Duration,
}

impl<S: CookieSource + ?Sized> CookieAggregator<S> {
    pub fn new(source: Arc<S>, lookup_timeout: Duration) -> Self {
        Self {
            source,
            lookup_timeout,
        }
    }

    pub async fn run(&self, list: &WatchList) -> Aggregation {
        self.run_inner(Uuid::new_v4(), list, None).await
    }

    /// Same as `run`, but streams progress tagged with `run_id` and ends with
    /// exactly one `Finished`.
    pub async fn run_with_events(
        &self,
        run_id: RunId,
        list: &WatchList,
        tx: mpsc::Sender<AggregationEvent>,
    ) -> Aggregation {
        self.run_inner(run_id, list, Some(&tx)).await
    }

    async fn run_inner(
        &self,
        run_id: RunId,
        list: &WatchList,
        tx: Option<&mpsc::Sender<AggregationEvent>>,
    ) -> Aggregation {
        let requested = list.len();
        emit(tx, AggregationEvent::Started { run_id, requested }).await;

        let mut aggregation = Aggregation {
            run_id,
            requested,
            settled: 0,
            records: Vec::new(),
            failed: 0,
            timed_out: 0,
        };

        // Nothing will ever settle, so finish here rather than wait on the loop.
        if requested == 0 {
            return finish(tx, aggregation).await;
        }

        let mut lookups = FuturesUnordered::new();
        for (index, spec) in list.iter().enumerate() {
            let query = CookieQuery::for_spec(spec);
            lookups.push(async move {
                let res =
                    tokio::time::timeout(self.lookup_timeout, self.source.get_all(&query)).await;
                (index, query, res)
            });
        }

        while let Some((index, query, res)) = lookups.next().await {
            aggregation.settled += 1;
            let (outcome, first): (LookupOutcome, Option<CookieRecord>) = match res {
                Ok(Ok(mut cookies)) if !cookies.is_empty() => {
                    (LookupOutcome::Matched, Some(cookies.swap_remove(0)))
                }
                Ok(Ok(_)) => (LookupOutcome::NoMatch, None),
                Ok(Err(e)) => {
                    warn!(name = %query.name, domain = ?query.domain, "cookie lookup failed: {e}");
                    aggregation.failed += 1;
                    (LookupOutcome::Failed(e.to_string()), None)
                }
                Err(_) => {
                    warn!(
                        name = %query.name,
                        domain = ?query.domain,
                        "cookie lookup timed out after {:?}",
                        self.lookup_timeout
                    );
                    aggregation.timed_out += 1;
                    (LookupOutcome::TimedOut, None)
                }
            };
            debug!(
                %run_id,
                index,
                settled = aggregation.settled,
                requested,
                ?outcome,
                "lookup settled"
            );
            if let Some(cookie) = first {
                aggregation
                    .records
                    .push(DisplayRecord::join(index, &list.specs()[index], cookie));
            }
            emit(
                tx,
                AggregationEvent::LookupSettled {
                    run_id,
                    index,
                    outcome,
                },
            )
            .await;
        }

        finish(tx, aggregation).await
    }
}

async fn emit(tx: Option<&mpsc::Sender<AggregationEvent>>, ev: AggregationEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(ev).await;
    }
}

async fn finish(
    tx: Option<&mpsc::Sender<AggregationEvent>>,
    aggregation: Aggregation,
) -> Aggregation {
    info!(
        run_id = %aggregation.run_id,
        requested = aggregation.requested,
        found = aggregation.records.len(),
        failed = aggregation.failed,
        timed_out = aggregation.timed_out,
        "aggregation finished"
    );
    emit(
        tx,
        AggregationEvent::Finished {
            run_id: aggregation.run_id,
            aggregation: aggregation.clone(),
        },
    )
    .await;
    aggregation
}
