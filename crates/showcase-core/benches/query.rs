use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use showcase_core::grade::derive_grade;
use showcase_core::{Catalog, Class, Project, Query, SortKey};

const CLASSES: [&str; 6] = [
    "RM225 - G3 - Kappa",
    "RM224 - G3 - Iota",
    "RM324 - G5 - Xi",
    "RM143 - G1 - Epsilon",
    "Rise - 2-8",
    "Gonzalez-ULTIMATE",
];

const TIERS: [usize; 3] = [100, 1_000, 10_000];

fn synthetic_catalog(size: usize) -> Catalog {
    let projects = (0..size)
        .map(|i| {
            let klass = CLASSES[i % CLASSES.len()];
            Project {
                id: format!("p{i}"),
                title: format!("Design {} {}", i % 97, if i % 7 == 0 { "Rocket" } else { "Bridge" }),
                student: format!("Kappa_{:03}", i % 500),
                klass: klass.to_string(),
                grade: derive_grade(klass),
                embed_url: format!("https://www.tinkercad.com/embed/{i}"),
                tags: vec!["stem".to_string()],
                date: format!("2025-09-{:02}", 1 + i % 28),
                ..Project::default()
            }
        })
        .collect();
    let classes = CLASSES.iter().map(|name| Class::new(*name, 25, "")).collect();
    Catalog::new(projects, classes)
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog.query");

    for size in TIERS {
        let catalog = synthetic_catalog(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("all_date_desc", size), &catalog, |b, catalog| {
            b.iter(|| black_box(catalog.query(&Query::new()).len()));
        });

        group.bench_with_input(BenchmarkId::new("grade_search", size), &catalog, |b, catalog| {
            let query = Query::new().grade("Grade 3").search("rocket");
            b.iter(|| black_box(catalog.query(&query).len()));
        });

        group.bench_with_input(BenchmarkId::new("title_sort", size), &catalog, |b, catalog| {
            let query = Query::new().sort(SortKey::TitleAsc);
            b.iter(|| black_box(catalog.query(&query).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
