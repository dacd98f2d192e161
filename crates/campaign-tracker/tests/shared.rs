//! Async usage of the tracker from a tokio runtime.

use std::sync::Arc;

use campaign_tracker::{
    CampaignId, ManualClock, Occurrence, SharedTracker, SqliteTracker, StorageLocation,
    TrackerConfig, TrackerStatus,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn track_and_query_through_shared_handle() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(10_000));
    let tracker = SharedTracker::new(SqliteTracker::with_clock(
        TrackerConfig::default(),
        clock.clone(),
    ));

    tracker
        .open(StorageLocation::directory(dir.path()))
        .await
        .unwrap();

    assert_eq!(
        tracker.get_occurrence("MyCampaign1").await.unwrap(),
        Occurrence::NEVER
    );

    for _ in 0..4 {
        tracker.track_view_event("MyCampaign1").await.unwrap();
        clock.advance(100);
    }
    let event = tracker.track_view_event("MyCampaign2").await.unwrap();
    assert_eq!(event.occurrence, Occurrence::new(1, 10_400));

    let counts = tracker
        .get_view_counts(vec![
            CampaignId::from("MyCampaign1"),
            CampaignId::from("MyCampaign2"),
        ])
        .await
        .unwrap();
    assert_eq!(counts["MyCampaign1"], 4);
    assert_eq!(counts["MyCampaign2"], 1);
    assert_eq!(
        tracker.campaign_last_occurrence("MyCampaign1").await.unwrap(),
        10_300
    );

    tracker.close().await.unwrap();
    assert_eq!(tracker.tracker().status(), TrackerStatus::Closed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_lose_no_increments() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = SharedTracker::sqlite();
    tracker
        .open(StorageLocation::directory(dir.path()))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let tracker = tracker.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..10 {
                tracker.track_view_event("shared").await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(
        tracker.get_occurrence("shared").await.unwrap().view_count,
        80
    );
    tracker.close().await.unwrap();
}

#[tokio::test]
async fn closed_shared_tracker_reports_unavailable() {
    let tracker = SharedTracker::sqlite();
    let err = tracker.get_occurrence("foo").await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(err.to_string().contains("view tracker unavailable"));
}
