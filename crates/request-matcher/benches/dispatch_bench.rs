use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use hyper::Method;
use request_matcher::{FixtureStore, IncomingRequest, MatcherDispatcher};
use std::sync::Arc;

/// A store of `count` fixtures where only the last one matches `/api/v1/endpoint{count - 1}`.
fn build_store(count: usize) -> Arc<FixtureStore> {
    let store = Arc::new(FixtureStore::new());
    for i in 0..count {
        store
            .add_fixture(200, "body.json")
            .if_request_matches()
            .method_is(Method::POST)
            .path_is(&format!("/api/v1/endpoint{i}"))
            .queries_contain("page", "1")
            .headers_contain("content-type", "application/json")
            .body_contains(r#""key""#)
            .register()
            .expect("fixture registers");
    }
    store
}

fn request_for(index: usize) -> IncomingRequest {
    IncomingRequest::new(Method::POST, &format!("/api/v1/endpoint{index}?page=1"))
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"key": "value"}"#)
}

fn bench_select_last_fixture(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_last_fixture");

    for count in [1, 10, 100, 1000] {
        let request = request_for(count - 1);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || MatcherDispatcher::new(build_store(count)),
                |dispatcher| black_box(dispatcher.select(black_box(&request)).is_ok()),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_no_match_diagnostics(c: &mut Criterion) {
    let mut group = c.benchmark_group("no_match_diagnostics");

    for count in [10, 100, 1000] {
        // Misses never consume, so one store serves every iteration
        let dispatcher = MatcherDispatcher::new(build_store(count));
        let request = IncomingRequest::new(Method::GET, "/unknown");
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(dispatcher.select(black_box(&request)).is_err()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select_last_fixture, bench_no_match_diagnostics);
criterion_main!(benches);
