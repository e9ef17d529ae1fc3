use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use storyboard_engine::{
    encode_state, extract_keywords, hash_string, synthesize, StoryboardState, WarningPolicy,
};

const SENTENCES: &[&str] = &[
    "Our product launch changes how teams plan their week.",
    "Growth follows when the audience sees the story clearly!",
    "Compare the old workflow with the new grid of tools.",
    "Every journey needs a hero and a future worth chasing?",
];

fn long_script(sentences: usize) -> String {
    (0..sentences)
        .map(|idx| SENTENCES[idx % SENTENCES.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    for sentences in [4usize, 40, 160] {
        let script = long_script(sentences);
        group.bench_function(format!("sentences_{sentences}"), |b| {
            b.iter(|| synthesize(&script))
        });
    }
    group.finish();
}

fn bench_keywords(c: &mut Criterion) {
    let script = long_script(40);
    c.bench_function("extract_keywords", |b| b.iter(|| extract_keywords(&script, 3)));
}

fn bench_hash(c: &mut Criterion) {
    let script = long_script(40);
    c.bench_function("hash_string", |b| b.iter(|| hash_string(&script)));
}

fn bench_set_script(c: &mut Criterion) {
    let script = long_script(120);
    let policy = WarningPolicy::default();
    c.bench_function("set_script_with_warnings", |b| {
        b.iter_batched(
            || StoryboardState::initial(0),
            |mut state| state.set_script(script.clone(), &policy, 1),
            BatchSize::SmallInput,
        )
    });
}

fn bench_encode_state(c: &mut Criterion) {
    let mut state = StoryboardState::initial(0);
    state.commit_scenes(synthesize(&long_script(40)), 1);
    c.bench_function("encode_state", |b| {
        b.iter(|| encode_state(&state).expect("encode"))
    });
}

criterion_group!(
    core_benches,
    bench_synthesize,
    bench_keywords,
    bench_hash,
    bench_set_script,
    bench_encode_state
);
criterion_main!(core_benches);
