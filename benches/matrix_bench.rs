use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use githeat::heat::contrib::{ContributionMap, MonthSet};
use githeat::heat::matrix::{build_matrix, MatrixOptions};
use githeat::heat::palette::COLORS_GRASS;
use githeat::heat::parse::{CommitFilter, CommitIndex, DELIMITER};
use githeat::model::DaySet;

fn synthetic_log(end: NaiveDate) -> String {
    (0..2000)
        .map(|i| {
            let day = end - Duration::days(i % 370);
            format!(
                "{i:07x}{d}{day} 12:00:00 +0000{d}author{a}{d}a{a}@example.com{d}change {i}",
                d = DELIMITER,
                a = i % 7
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pipeline_benchmark(c: &mut Criterion) {
    let end = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
    let raw = synthetic_log(end);

    c.bench_function("parse_log", |b| {
        b.iter(|| CommitIndex::parse(black_box(&raw), &CommitFilter::default()).unwrap())
    });

    let index = CommitIndex::parse(&raw, &CommitFilter::default()).unwrap();
    c.bench_function("map_to_matrix", |b| {
        b.iter(|| {
            let mut map = ContributionMap::initialize(end);
            map.compute(black_box(&index), &DaySet::new(), &MonthSet::new());
            map.normalize();
            build_matrix(&map, &COLORS_GRASS, MatrixOptions::default())
        })
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
