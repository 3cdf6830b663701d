//! Event dispatch benchmarks for frond.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use frond::testing::{El, Harness, el};

/// A listing page with `n` product sliders of eight cards each.
fn listing(n: u32) -> Vec<El> {
    (0..n)
        .map(|s| {
            let y = 400.0 * f64::from(s);
            let cards = (0..8).map(move |i| {
                el("li")
                    .flag("slider-card")
                    .rect(300.0 * f64::from(i), y, 300.0, 300.0)
            });
            el("slider-interface").rect(0.0, y, 1200.0, 400.0).children([
                el("ul")
                    .flag("slider-card-list")
                    .rect(0.0, y, 1200.0, 300.0)
                    .clips()
                    .children(cards),
                el("div").flag("slider-nav").children([
                    el("button").id(&format!("prev{s}")).flag("slider-prev"),
                    el("button").id(&format!("next{s}")).flag("slider-next"),
                ]),
            ])
        })
        .collect()
}

/// Benchmark upgrading a page and scrolling through it.
fn benchmark_scroll(c: &mut Criterion) {
    c.bench_function("attach_and_scroll", |b| {
        b.iter(|| {
            let mut h = Harness::builder(listing(20)).build().expect("Failed to create harness");
            for y in (0..8000).step_by(200) {
                h.scroll_window(f64::from(y)).expect("Failed to scroll");
            }
            black_box(h.dump());
        });
    });
}

/// Benchmark clicking through slider controls.
fn benchmark_clicks(c: &mut Criterion) {
    let mut h = Harness::builder(listing(5)).build().expect("Failed to create harness");
    c.bench_function("slider_clicks", |b| {
        b.iter(|| {
            h.click("next0").expect("Failed to click");
            h.advance(200).expect("Failed to advance");
            h.click("prev0").expect("Failed to click");
            h.advance(200).expect("Failed to advance");
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_scroll, benchmark_clicks
}
criterion_main!(benches);
