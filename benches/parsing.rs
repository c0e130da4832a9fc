//! Performance benchmarks for tidemark
//!
//! Run with: cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Sample documents of various sizes and shapes
mod samples {
    pub const TINY: &str = "Hello, world!";

    pub const SMALL: &str = r#"# Heading

This is a paragraph of plain text
spread over two lines.

> A quoted line
> and its continuation.
"#;

    pub const MEDIUM: &str = r#"# Project README

This is a sample README file that exercises every core block kind.

## Features

Paragraphs, headings, block quotes, fenced code, thematic breaks.

### Code Example

```rust
fn main() {
    println!("Hello, world!");
}
```

## Notes

> This is a blockquote with a second
> line and a lazy third line.

Setext Heading
==============

---

[docs]: https://docs.rs "Documentation"

Thank you for reading!
"#;

    /// Generate a large document by repeating sections
    pub fn large() -> String {
        let section = r#"
## Section Title

This paragraph spans a couple of lines
to give the continuation path some work.

> A blockquote that spans
> multiple lines
lazily continued here.

```rust
fn example() {
    let x = 42;
    println!("{}", x);
}
```

Another paragraph to add some content. This helps test the parser's
behavior on longer documents.

"#;
        section.repeat(50)
    }

    /// Document with deeply nested quotes
    pub fn pathological_nested() -> String {
        "> ".repeat(100) + "deep\n"
    }

    /// Many single-line paragraphs, each closing the previous one
    pub fn paragraph_churn() -> String {
        "line\n\n".repeat(2000)
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.throughput(Throughput::Bytes(samples::TINY.len() as u64));
    group.bench_function("tiny", |b| {
        b.iter(|| tidemark::parse(black_box(samples::TINY)))
    });

    group.throughput(Throughput::Bytes(samples::SMALL.len() as u64));
    group.bench_function("small", |b| {
        b.iter(|| tidemark::parse(black_box(samples::SMALL)))
    });

    group.throughput(Throughput::Bytes(samples::MEDIUM.len() as u64));
    group.bench_function("medium", |b| {
        b.iter(|| tidemark::parse(black_box(samples::MEDIUM)))
    });

    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large", |b| {
        b.iter(|| tidemark::parse(black_box(&large)))
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20); // Fewer samples for slow cases

    let nested = samples::pathological_nested();
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("deep_nesting", |b| {
        b.iter(|| tidemark::parse(black_box(&nested)))
    });

    let churn = samples::paragraph_churn();
    group.throughput(Throughput::Bytes(churn.len() as u64));
    group.bench_function("paragraph_churn", |b| {
        b.iter(|| tidemark::parse(black_box(&churn)))
    });

    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    // Parser construction including registry initialization
    group.bench_function("core_setup", |b| {
        b.iter(|| {
            let mut registry = tidemark::Registry::core();
            black_box(registry.block_matchers().len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_pathological, bench_registry);
criterion_main!(benches);
