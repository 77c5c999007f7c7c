//! Request and rendering benchmarks
//!
//! Measures the per-turn work done locally around a Converse call (excludes
//! network I/O): building the request body, decoding a response and
//! rendering it to the console.
//!
//! Run with: `cargo bench`

use bedrock_console::adapter::render_response;
use bedrock_console::config::{Config, InferenceSettings};
use bedrock_console::converse::{ConverseRequest, ConverseResponse};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const PROMPTS: [(&str, &str); 3] = [
    ("short", "What is Rust?"),
    (
        "medium",
        "Explain how ownership and borrowing work in Rust, and why they prevent data races at compile time.",
    ),
    (
        "long",
        "Write a comprehensive tutorial on async programming in Rust, covering futures, tokio, async/await syntax, pinning, and common patterns. Include code examples and explain the relationship between Future, Poll, and Waker.",
    ),
];

/// Benchmark building and serializing a single-turn request
fn bench_request_body(c: &mut Criterion) {
    let settings = InferenceSettings::default();
    let mut group = c.benchmark_group("request_body");

    for (name, prompt) in PROMPTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &prompt, |b, p| {
            b.iter(|| {
                let request = ConverseRequest::single_turn(&settings, p);
                serde_json::to_vec(&request).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark decoding and rendering a typical reply
fn bench_response_rendering(c: &mut Criterion) {
    let body = r#"{
        "output": {"message": {"role": "assistant", "content": [{"text": "Rust is a systems programming language focused on safety, speed and concurrency."}]}},
        "stopReason": "end_turn",
        "usage": {"inputTokens": 12, "outputTokens": 18, "totalTokens": 30},
        "metrics": {"latencyMs": 350}
    }"#;

    c.bench_function("response_rendering", |b| {
        let mut out = Vec::with_capacity(256);
        b.iter(|| {
            out.clear();
            let response: ConverseResponse = serde_json::from_str(black_box(body)).unwrap();
            render_response(&response, &mut out).unwrap();
        });
    });
}

/// Benchmark configuration parsing
///
/// Runs once at startup, so anything under a millisecond is irrelevant in
/// practice; tracked to catch pathological regressions in validation.
fn bench_config_parsing(c: &mut Criterion) {
    let toml_str = r#"
[model]
model_id = "amazon.nova-lite-v1:0"
max_tokens = 3000
temperature = 0.7

[endpoint]
region = "us-east-1"
request_timeout_seconds = 120
"#;

    c.bench_function("config_parsing", |b| {
        b.iter(|| {
            let config: Config = toml::from_str(toml_str).unwrap();
            config
        });
    });
}

criterion_group!(
    benches,
    bench_request_body,
    bench_response_rendering,
    bench_config_parsing,
);
criterion_main!(benches);
