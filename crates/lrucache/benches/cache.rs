use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lrucache::LruCache;

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_with_eviction", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        let mut counter = 0u64;

        b.iter(|| {
            black_box(cache.insert(counter, counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_find_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("find_hit", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for key in 0..1000u64 {
            cache.insert(key, key);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.find(&(counter % 1000)));
            counter += 1;
        });
    });

    group.bench_function("find_miss", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for key in 0..1000u64 {
            cache.insert(key, key);
        }

        let mut counter = 1000u64;
        b.iter(|| {
            black_box(cache.find(&counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_find_50_insert", |b| {
        let mut cache = LruCache::new(100).unwrap();
        for key in 0..100u64 {
            cache.insert(key, key);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 200)));
            } else {
                black_box(cache.insert(counter % 200, counter));
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_find_hit, bench_mixed_50_50);
criterion_main!(benches);
