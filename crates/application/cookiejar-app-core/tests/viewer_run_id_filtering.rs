mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{cookie, FixedSource, GatedSource, RecordingPresenter, Scripted};
use cookiejar_app_core::{
    Aggregation, AggregationEvent, BootState, CookieAggregator, ViewerKernel, WatchListStore,
};
use cookiejar_core::{DisplayRecord, WatchList};
use cookiejar_persistence::{encode_value, KeyValueSlot, MemorySlotStore};

fn store_with(list: &WatchList) -> WatchListStore {
    let slot = MemorySlotStore::new();
    slot.set(
        cookiejar_config::WATCH_LIST_STORAGE_KEY,
        &encode_value(list).unwrap(),
    )
    .unwrap();
    WatchListStore::new(Arc::new(slot))
}

#[tokio::test]
async fn stale_aggregation_events_are_ignored_in_tick() {
    // Every lookup blocks, so the real run never finishes during the test.
    let source = Arc::new(GatedSource::default());
    let _gates: Vec<_> = ["SESSION", "csrftoken", "_ga"]
        .iter()
        .map(|n| source.gate(n))
        .collect();
    let presenter = RecordingPresenter::default();
    let mut viewer = ViewerKernel::new(
        WatchListStore::new(Arc::new(MemorySlotStore::new())),
        CookieAggregator::new(source, Duration::from_secs(30)),
        presenter.clone(),
    );

    let current = viewer.refresh().await.unwrap();
    let stale = uuid::Uuid::new_v4();
    assert_ne!(current, stale);

    viewer
        .sender()
        .send(AggregationEvent::Finished {
            run_id: stale,
            aggregation: Aggregation {
                run_id: stale,
                requested: 1,
                settled: 1,
                records: vec![DisplayRecord {
                    watch_index: 0,
                    watch_id: "1".into(),
                    name: "SESSION".into(),
                    value: "stale".into(),
                    domain: "localhost".into(),
                    desc: None,
                }],
                failed: 0,
                timed_out: 0,
            },
        })
        .await
        .unwrap();

    assert!(viewer.tick().is_none());

    let state = viewer.state();
    assert_eq!(state.current_run, Some(current));
    assert_eq!(state.boot, BootState::Loading);
    assert!(state.records.is_empty());
    assert!(presenter.cookie_renders().is_empty());
}

#[tokio::test]
async fn superseded_refresh_renders_only_the_latest_run() {
    let source = FixedSource::default()
        .with("SESSION", Scripted::Found(vec![cookie("SESSION", "s1", "localhost")]));
    let presenter = RecordingPresenter::default();
    let mut viewer = ViewerKernel::new(
        store_with(&WatchList::builtin_default()),
        CookieAggregator::new(Arc::new(source), Duration::from_millis(200)),
        presenter.clone(),
    );

    let first = viewer.refresh().await.unwrap();
    let second = viewer.refresh().await.unwrap();

    let aggregation = viewer.wait_for_render().await.unwrap();
    assert_ne!(first, second);
    assert_eq!(aggregation.run_id, second);

    // Let the superseded run drain too; it must not render.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(viewer.tick().is_none());

    let renders = presenter.cookie_renders();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].len(), 1);
    assert_eq!(renders[0][0].value, "s1");
    assert_eq!(viewer.state().boot, BootState::Ready);
}

#[tokio::test]
async fn empty_watch_list_renders_an_empty_result_once() {
    let presenter = RecordingPresenter::default();
    let mut viewer = ViewerKernel::new(
        store_with(&WatchList::new()),
        CookieAggregator::new(Arc::new(FixedSource::default()), Duration::from_millis(100)),
        presenter.clone(),
    );

    viewer.refresh().await.unwrap();
    let aggregation = viewer.wait_for_render().await.unwrap();

    assert_eq!(aggregation.requested, 0);
    assert_eq!(presenter.cookie_renders(), vec![Vec::<DisplayRecord>::new()]);
}

#[tokio::test]
async fn wait_without_refresh_returns_none() {
    let mut viewer = ViewerKernel::new(
        WatchListStore::new(Arc::new(MemorySlotStore::new())),
        CookieAggregator::new(Arc::new(FixedSource::default()), Duration::from_millis(100)),
        RecordingPresenter::default(),
    );

    assert!(viewer.wait_for_render().await.is_none());
}
