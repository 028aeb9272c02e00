use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use indexmap::IndexMap;

use echodrill::engine::compare::{char_hint, check_sentence, check_spelling};
use echodrill::engine::review::{ReviewQueue, due_items};
use echodrill::engine::schedule::{ItemProgress, init_word_progress, update_word_progress};

fn make_words(count: usize) -> IndexMap<String, ItemProgress> {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let key = format!("word{i}");
            let mut p = init_word_progress(&key, base + Duration::hours(i as i64));
            // Spread levels so roughly half are due
            for _ in 0..(i % 4) {
                p = update_word_progress(&p, true, p.last_practiced);
            }
            (key, p)
        })
        .collect()
}

fn bench_compare(c: &mut Criterion) {
    let target = "The red apple is big and looks very sweet";
    let slots = ["The", "red", "aple", "is", "big", "and", "look", "very", ""];

    c.bench_function("check_sentence (9 words)", |b| {
        b.iter(|| check_sentence(black_box(target), black_box(&slots)))
    });

    c.bench_function("char_hint + check_spelling", |b| {
        b.iter(|| {
            (
                char_hint(black_box("beautifull"), black_box("beautiful")),
                check_spelling(black_box("beautiful"), black_box("beauty")),
            )
        })
    });
}

fn bench_review(c: &mut Criterion) {
    let words = make_words(5000);
    let sentences = IndexMap::new();
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

    c.bench_function("due_items (5000 words)", |b| {
        b.iter(|| due_items(black_box(&words), now).len())
    });

    c.bench_function("ReviewQueue::collect (5000 words)", |b| {
        b.iter(|| ReviewQueue::collect(black_box(&words), &sentences, now))
    });
}

criterion_group!(benches, bench_compare, bench_review);
criterion_main!(benches);
