//! 通知构建基准测试
//!
//! 测试字段模板渲染和整条报告构建的性能

use chrono::{DateTime, FixedOffset};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Duration;
use uptime_ping::config::{Link, NotificationConfig};
use uptime_ping::notification::template::{default_field_template, FieldContext};
use uptime_ping::notification::{build_summary, FieldTemplate};
use uptime_ping::{PingResult, ProbeOutcome, ResultSet};

fn sample_results(count: usize) -> ResultSet {
    let timestamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default();

    (0..count)
        .map(|i| {
            let link = Link::new(
                format!("svc-{:03}", i),
                format!("https://svc-{}.example/health", i),
                format!("service number {}", i),
            );
            let outcome = if i % 5 == 0 {
                ProbeOutcome::TimedOut
            } else {
                ProbeOutcome::Responded { status_code: 200 }
            };
            let result = PingResult::from_outcome_at(
                &link,
                outcome,
                Duration::from_millis(40 + i as u64),
                timestamp,
            );
            (link.id, result)
        })
        .collect()
}

fn notification_benchmark(c: &mut Criterion) {
    c.bench_function("field_template_rendering", |b| {
        let template = FieldTemplate::new(&default_field_template()).unwrap();
        let results = sample_results(1);
        let result = results.values().next().unwrap();
        let offset = FixedOffset::east_opt(7 * 3_600).unwrap();

        b.iter(|| {
            let value = template
                .render(&FieldContext::from_result(result, offset))
                .unwrap();
            black_box(value)
        });
    });

    c.bench_function("build_summary_25_links", |b| {
        let results = sample_results(25);
        let config = NotificationConfig::default();

        b.iter(|| {
            let message = build_summary(black_box(&results), &config).unwrap();
            black_box(message)
        });
    });

    c.bench_function("summary_serialization", |b| {
        let message = build_summary(&sample_results(25), &NotificationConfig::default()).unwrap();

        b.iter(|| {
            let payload = serde_json::to_string(black_box(&message)).unwrap();
            black_box(payload)
        });
    });
}

criterion_group!(benches, notification_benchmark);
criterion_main!(benches);
