use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use powerprompt::runtime::MockEnvironment;
use powerprompt::template::{self, Context, Globals, SegmentsCache};
use powerprompt::{Alignment, Block, Config, Engine, ExtraPromptKind, Properties, SegmentConfig};
use serde_json::{json, Map};
use std::time::Duration;

fn text_segment(index: usize, style: &str) -> SegmentConfig {
    SegmentConfig {
        kind: "text".to_string(),
        style: style.to_string(),
        powerline_symbol: "\u{e0b0}".to_string(),
        leading_diamond: "\u{e0b6}".to_string(),
        trailing_diamond: "\u{e0b4}".to_string(),
        background: format!("p:{}", ["path", "git", "status", "time"][index % 4]),
        foreground: "p:path-text".to_string(),
        background_templates: vec!["{{ if gt .Code 0 }}p:error{{ end }}"].into(),
        template: " {{ .Text }} {{ if .Root }}#{{ end }}".to_string(),
        properties: Properties::from(json!({ "text": format!("segment-{index}") })),
        ..SegmentConfig::default()
    }
}

fn theme(segments: usize, style: &str) -> Config {
    let left = Block {
        segments: (0..segments).map(|index| text_segment(index, style)).collect(),
        ..Block::default()
    };
    let right = Block {
        alignment: Alignment::Right,
        filler: "\u{2500}".to_string(),
        segments: vec![text_segment(segments, style)],
        ..Block::default()
    };
    Config {
        palette: powerprompt::themes::get_palette("dark").unwrap_or_default(),
        blocks: vec![left, right],
        ..Config::default()
    }
}

fn bench_primary_prompt(c: &mut Criterion) {
    let env = MockEnvironment::new()
        .with_plain(false)
        .with_shell("bash")
        .with_width(200)
        .with_error_code(1);

    let mut group = c.benchmark_group("primary_prompt");
    for size in [4, 16, 64] {
        let config = theme(size, "powerline");
        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            b.iter(|| {
                let mut engine = Engine::new(config, &env);
                black_box(engine.primary())
            })
        });
    }
    group.finish();
}

fn bench_styles(c: &mut Criterion) {
    let env = MockEnvironment::new().with_plain(false).with_width(200);

    let mut group = c.benchmark_group("styles");
    for style in ["plain", "powerline", "diamond", "accordion"] {
        let config = theme(8, style);
        group.bench_function(style, |b| {
            b.iter(|| {
                let mut engine = Engine::new(&config, &env);
                black_box(engine.primary())
            })
        });
    }
    group.finish();
}

fn bench_builtin_theme(c: &mut Criterion) {
    let config = Config::builtin();
    // git would measure the repository, not the renderer
    let env = MockEnvironment::new()
        .with_plain(false)
        .with_shell("zsh")
        .with_width(120)
        .with_toggles("git");

    let mut group = c.benchmark_group("builtin_theme");
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("primary", |b| {
        b.iter(|| {
            let mut engine = Engine::new(&config, &env);
            black_box(engine.primary())
        })
    });
    group.bench_function("transient", |b| {
        b.iter(|| {
            let mut engine = Engine::new(&config, &env);
            black_box(engine.extra_prompt(ExtraPromptKind::Transient))
        })
    });
    group.finish();
}

fn bench_template_rendering(c: &mut Criterion) {
    let env = MockEnvironment::new().with_error_code(2);
    let globals = Globals::new(&env, &Map::new());
    let mut segments = SegmentsCache::new();
    segments.put("Git", json!({ "Branch": "main", "Detached": false }));
    let data = json!({ "Path": "~/src/powerprompt", "Folder": "powerprompt" });
    let context = Context::new(&env, &globals, &segments).with_data(&data);

    c.bench_function("template_rendering", |b| {
        b.iter(|| {
            black_box(template::render(
                black_box("{{ .Path }}{{ if and .Segments.Git (not .Segments.Git.Detached) }} on {{ .Segments.Git.Branch | upper }}{{ end }}{{ if gt .Code 0 }} [{{ .Code }}]{{ end }}"),
                &context,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_primary_prompt,
    bench_styles,
    bench_builtin_theme,
    bench_template_rendering
);
criterion_main!(benches);
