//! Ordering guarantees of the engine queue

use appforge_files::FileSet;
use appforge_merge::{
    EventSink, MergeAction, MergeEngine, MergeEvent, MergePolicyResolver, PathMatcher, PolicyRule, Presence,
};
use appforge_test_utils::{file_set, minimal_baseline};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn merges_wait_for_a_pending_baseline_and_run_in_call_order() {
    let (events, mut rx) = EventSink::channel();
    let engine = MergeEngine::new().with_events(events).spawn();

    let (release, gate) = oneshot::channel::<()>();
    let load = engine.load_baseline_with(async move {
        gate.await.map_err(|_| "gate dropped")?;
        Ok::<_, &str>(minimal_baseline())
    });

    let first = engine.merge(file_set(&[("screens/home.tsx", "first")]));
    let second = engine.merge(file_set(&[("screens/home.tsx", "second"), ("lib/a.ts", "a")]));
    let first = tokio::spawn(first);
    let second = tokio::spawn(second);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!first.is_finished());
    assert!(!second.is_finished());
    assert!(rx.try_recv().is_err());

    release.send(()).unwrap();
    load.await.unwrap();

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert_eq!(first.replaced.len(), 1);
    assert_eq!(second.replaced.len(), 1);
    assert_eq!(second.added.len(), 1);

    let files = engine.merged_files().await.unwrap();
    assert_eq!(files.content("screens/home.tsx"), Some("second"));
    assert_eq!(files.len(), 3);

    let mut completed = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            MergeEvent::BaselineLoaded { files } => {
                assert!(completed.is_empty());
                assert_eq!(files, 2);
            }
            MergeEvent::MergeCompleted { added, replaced, .. } => completed.push((added, replaced)),
            _ => {}
        }
    }
    assert_eq!(completed, vec![(0, 1), (1, 1)]);
}

#[tokio::test]
async fn concurrent_loads_share_the_in_flight_load() {
    let engine = MergeEngine::new().spawn();
    let (release, gate) = oneshot::channel::<()>();

    let first = engine.load_baseline_with(async move {
        let _ = gate.await;
        Ok::<_, &str>(minimal_baseline())
    });
    let second = engine.load_baseline(file_set(&[("other.ts", "never used")]));
    let second = tokio::spawn(second);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!second.is_finished());

    release.send(()).unwrap();
    first.await.unwrap();
    second.await.unwrap().unwrap();

    let files = engine.merged_files().await.unwrap();
    assert!(files.contains("config.json"));
    assert!(!files.contains("other.ts"));
}

#[tokio::test]
async fn merge_before_any_load_is_never_dropped() {
    let engine = MergeEngine::new().spawn();
    let merge = engine.merge(file_set(&[("components/Badge.tsx", "badge")]));
    let merge = tokio::spawn(merge);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!merge.is_finished());

    engine.load_baseline(FileSet::new()).await.unwrap();
    let report = merge.await.unwrap().unwrap();
    assert_eq!(report.added.len(), 1);
}

#[tokio::test]
async fn queued_work_drains_after_handles_drop() {
    let engine = MergeEngine::new().spawn();
    let (release, gate) = oneshot::channel::<()>();
    let load = engine.load_baseline_with(async move {
        let _ = gate.await;
        Ok::<_, &str>(minimal_baseline())
    });
    let merge = engine.merge(file_set(&[("lib/x.ts", "x")]));
    drop(engine);

    release.send(()).unwrap();
    load.await.unwrap();
    assert_eq!(merge.await.unwrap().added.len(), 1);
}

#[tokio::test]
async fn custom_policy_table_reaches_engine_merges() {
    let resolver = MergePolicyResolver::with_rules(vec![
        PolicyRule::new(PathMatcher::Under("screens".into()), Presence::Any, MergeAction::Keep, "frozen screens"),
        PolicyRule::new(PathMatcher::Any, Presence::Any, MergeAction::Replace, "rest"),
    ]);
    let engine = MergeEngine::new().with_resolver(resolver).spawn();
    engine.load_baseline(minimal_baseline()).await.unwrap();

    let report = engine
        .merge(file_set(&[("screens/home.tsx", "new"), ("screens/extra.tsx", "x")]))
        .await
        .unwrap();
    assert_eq!(report.kept.len(), 2);

    let files = engine.merged_files().await.unwrap();
    assert_eq!(files.content("screens/home.tsx"), Some("old"));
    assert!(!files.contains("screens/extra.tsx"));
}
