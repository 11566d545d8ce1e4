//! Benchmarks for client storage and checklist persistence
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use diabetrack::checklist::ChecklistTracker;
use diabetrack::classify::classify;
use diabetrack::models::{MealContext, UserProfile};
use diabetrack::storage::{
    read_json, write_json, ClientStorage, FileStorage, MemoryStorage, PROFILE_KEY,
};
use std::sync::Arc;
use tempfile::tempdir;

fn sample_profile() -> UserProfile {
    let mut profile = UserProfile::new("Bench User", "bench@example.com");
    profile.height_cm = Some(172.0);
    profile.weight_kg = Some(68.5);
    profile
}

fn bench_file_storage(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_storage");

    group.bench_function("set_item", |b| {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("session.json")).unwrap();

        b.iter(|| storage.set_item(black_box("token"), black_box("tok123")).unwrap());
    });

    group.bench_function("get_item", |b| {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
        storage.set_item("token", "tok123").unwrap();

        b.iter(|| storage.get_item(black_box("token")).unwrap());
    });

    group.bench_function("profile_roundtrip", |b| {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
        let profile = sample_profile();

        b.iter(|| {
            write_json(&storage, PROFILE_KEY, black_box(&profile)).unwrap();
            let _: Option<UserProfile> = read_json(&storage, PROFILE_KEY).unwrap();
        });
    });

    group.finish();
}

fn bench_checklist(c: &mut Criterion) {
    let mut group = c.benchmark_group("checklist");

    group.bench_function("toggle_memory", |b| {
        let mut checklist = ChecklistTracker::load(Arc::new(MemoryStorage::new()));
        b.iter(|| checklist.toggle(black_box("reading")).unwrap());
    });

    group.bench_function("toggle_file", |b| {
        let dir = tempdir().unwrap();
        let storage = Arc::new(FileStorage::open(dir.path().join("session.json")).unwrap());
        let mut checklist = ChecklistTracker::load(storage);
        b.iter(|| checklist.toggle(black_box("reading")).unwrap());
    });

    group.bench_function("load_file", |b| {
        let dir = tempdir().unwrap();
        let storage: Arc<dyn ClientStorage> =
            Arc::new(FileStorage::open(dir.path().join("session.json")).unwrap());
        ChecklistTracker::load(Arc::clone(&storage)).toggle("bmi").unwrap();

        b.iter(|| ChecklistTracker::load(Arc::clone(&storage)).completed());
    });

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let values: Vec<f64> = (40..=500).map(f64::from).collect();
    group.throughput(Throughput::Elements(values.len() as u64 * 2));

    group.bench_function("sweep", |b| {
        b.iter(|| {
            for v in &values {
                black_box(classify(*v, MealContext::PreMeal));
                black_box(classify(*v, MealContext::PostMeal));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_file_storage, bench_checklist, bench_classify);
criterion_main!(benches);
