//! grok 벤치마크
//!
//! 매크로 확장/컴파일 비용과 매칭 및 전체 체인 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sluice_core::event::Event;
use sluice_transformer::{
    ActionRegistry, GrokCompiler, GrokMatcher, PatternLibrary, TransformerBuilder,
    TransformerConfig,
};

const ACCESS_EXPR: &str =
    r"^%{IPV4:client} %{USER:user} \[%{DATESTAMP:time}\] %{WORD:method} %{UNIXPATH:path}$";

const ACCESS_LINE: &str = "192.168.0.10 alice [2024-01-15 12:30:45] GET /api/v1/items";

const MISS_LINE: &str = "this line does not look like an access log at all";

fn bench_compile(c: &mut Criterion) {
    let library = PatternLibrary::builtin();
    let compiler = GrokCompiler::new(&library).unwrap();

    let mut group = c.benchmark_group("grok_compile");
    for expr in ["%{INT:n}", "%{DATESTAMP:ts}", ACCESS_EXPR] {
        group.bench_with_input(BenchmarkId::from_parameter(expr), expr, |b, expr| {
            b.iter(|| compiler.compile(black_box(expr)).unwrap())
        });
    }
    group.finish();
}

fn bench_match(c: &mut Criterion) {
    let library = PatternLibrary::builtin();
    let compiled = GrokCompiler::new(&library)
        .unwrap()
        .compile(ACCESS_EXPR)
        .unwrap();
    let matcher = GrokMatcher::new(compiled, true);

    let mut group = c.benchmark_group("grok_match");
    group.throughput(Throughput::Elements(1));
    group.bench_function("hit", |b| b.iter(|| matcher.extract(black_box(ACCESS_LINE))));
    group.bench_function("miss", |b| b.iter(|| matcher.extract(black_box(MISS_LINE))));
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let config = TransformerConfig::from_yaml_str(&format!(
        r#"
actions:
  - action: "grok(body)"
    match: '{ACCESS_EXPR}'
  - action: "move(client, source.ip)"
  - action: "add(event.kind, access)"
  - action: "flatten()"
"#
    ))
    .unwrap();
    let registry = ActionRegistry::with_builtins();
    let transformer = TransformerBuilder::new(&registry).build(&config).unwrap();

    let mut group = c.benchmark_group("transform_chain");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("access_log_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                let mut event = Event::from_body(ACCESS_LINE);
                transformer.transform(&mut event).unwrap();
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_compile, bench_match, bench_chain);
criterion_main!(benches);
