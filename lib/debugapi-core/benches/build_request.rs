#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use debugapi_core::{EndpointCatalog, PathTemplate};
use std::hint::black_box;

fn benchmark_build_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_request");
    let Ok(catalog) = EndpointCatalog::builtin() else {
        return;
    };

    let test_cases: [(&str, &[(&str, &str)]); 4] = [
        ("tidb_info", &[]),
        ("tidb_schema_db", &[("db", "test")]),
        (
            "tidb_stats_dump_timestamp",
            &[("db", "test"), ("table", "t1"), ("yyyyMMddHHmmss", "20240101000000")],
        ),
        ("tidb_pprof_profile", &[("seconds", "30")]),
    ];

    for (id, values) in test_cases {
        let Some(endpoint) = catalog.get(id) else {
            continue;
        };
        group.bench_function(id, |b| {
            b.iter(|| {
                let result = endpoint.build_request(black_box("10.0.0.1"), 10080, black_box(values));
                black_box(result)
            });
        });
    }

    group.finish();
}

fn benchmark_template_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_parse");

    let templates = [
        "/info",
        "/schema/{db}/{table}",
        "/api/{version}/users/{id}/posts/{id}/comments/{version}",
    ];

    for (i, template) in templates.iter().enumerate() {
        group.bench_function(format!("parse_{i}"), |b| {
            b.iter(|| black_box(PathTemplate::parse(black_box(*template))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build_request, benchmark_template_parse);
criterion_main!(benches);
