use criterion::{criterion_group, criterion_main, Criterion};

use campaign_tracker_store::{SqliteTracker, StorageLocation, ViewTracker};

fn bench_track_in_memory(c: &mut Criterion) {
    c.bench_function("track_in_memory_1k", |b| {
        b.iter(|| {
            let tracker = SqliteTracker::new();
            tracker.open(StorageLocation::InMemory);
            for i in 0..1_000u32 {
                let _ = tracker
                    .track_view_event(&format!("C{}", i % 32))
                    .expect("track");
            }
            tracker.close();
        });
    });
}

fn bench_track_on_disk(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let tracker = SqliteTracker::new();
    tracker.open(StorageLocation::directory(dir.path()));

    c.bench_function("track_on_disk", |b| {
        b.iter(|| {
            let _ = tracker.track_view_event("hot").expect("track");
        });
    });

    tracker.close();
}

fn bench_get_occurrence(c: &mut Criterion) {
    let tracker = SqliteTracker::new();
    tracker.open(StorageLocation::InMemory);
    for i in 0..256u32 {
        let _ = tracker.track_view_event(&format!("C{i}")).expect("track");
    }

    c.bench_function("get_occurrence", |b| {
        b.iter(|| {
            let _ = tracker.get_occurrence("C128").expect("get");
        });
    });
}

criterion_group!(
    benches,
    bench_track_in_memory,
    bench_track_on_disk,
    bench_get_occurrence
);
criterion_main!(benches);
