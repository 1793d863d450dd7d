use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use servfor_di::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Region {
    Emea,
    Apac,
    Amer,
}

impl ConnectionEnum for Region {
    fn variants() -> &'static [Self] {
        &[Region::Emea, Region::Apac, Region::Amer]
    }
}

fn named(count: usize) -> HashMap<String, String> {
    (0..count)
        .map(|i| (format!("db{i}"), format!("Data Source=host-{i};User Id=u{i}")))
        .collect()
}

// ===== Micro Benchmarks =====

fn bench_module_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("module_load");

    for &key_count in &[1usize, 10, 100] {
        let module = ServForOracleModule::from_named(named(key_count)).unwrap();
        group.bench_with_input(BenchmarkId::new("named_keys", key_count), &module, |b, module| {
            b.iter(|| {
                let mut services = ServiceCollection::new();
                module.load(&mut services);
                black_box(services.len());
            })
        });
    }

    group.finish();
}

fn bench_keyed_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_resolve");

    let transient = ServiceCollection::new()
        .add_module(ServForOracleModule::from_named(named(10)).unwrap())
        .unwrap()
        .build();
    group.bench_function("transient_string_key", |b| {
        b.iter(|| {
            let service = transient.get_keyed_trait::<dyn ServiceForOracle, _>("db5").unwrap();
            black_box(service.has_logger());
        })
    });

    let singleton = ServiceCollection::new()
        .add_module(
            ServForOracleModule::from_enum_sequence::<Region, _, _>(["Data Source=e", "Data Source=a", "Data Source=m"])
                .unwrap()
                .with_service_lifetime(Lifetime::Singleton),
        )
        .unwrap()
        .build();
    let _ = singleton.get_keyed_trait::<dyn ServiceForOracle, _>(Region::Apac).unwrap();
    group.bench_function("singleton_enum_key", |b| {
        b.iter(|| {
            let service = singleton.get_keyed_trait::<dyn ServiceForOracle, _>(Region::Apac).unwrap();
            black_box(service);
        })
    });

    group.finish();
}

fn bench_describe_connection(c: &mut Criterion) {
    let provider = ServiceCollection::new()
        .add_module(ServForOracleModule::from_connection_string("Data Source=db01;User Id=app;Password=x").unwrap())
        .unwrap()
        .build();
    let service = provider.get_trait::<dyn ServiceForOracle>().unwrap();
    let _ = service.describe_connection().unwrap();

    c.bench_function("describe_connection_cached", |b| {
        b.iter(|| black_box(service.describe_connection().unwrap()))
    });

    c.bench_function("connection_info_parse", |b| {
        b.iter(|| black_box(ConnectionInfo::parse("Data Source=db01;User Id=app;Password=x;Pooling=true").unwrap()))
    });
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let provider = ServiceCollection::new()
        .add_module(ServForOracleModule::from_named(named(4)).unwrap())
        .unwrap()
        .build();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("keyed_transient_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for t in 0..threads {
                            let provider = &provider;
                            s.spawn(move |_| {
                                let key = format!("db{}", t % 4);
                                for _ in 0..iters / threads as u64 {
                                    let service = provider
                                        .get_keyed_trait::<dyn ServiceForOracle, _>(key.clone())
                                        .unwrap();
                                    black_box(service);
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    micro_benches,
    bench_module_load,
    bench_keyed_resolve,
    bench_describe_connection,
    bench_contention
);

criterion_main!(micro_benches);
