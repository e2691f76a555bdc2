// benches/table_parse.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use borough_map::{join, specs};

const PAGE: &str = include_str!("../tests/fixtures/postal_codes.html");
const GEO: &str = include_str!("../tests/fixtures/geo.csv");

fn bench_table(c: &mut Criterion) {
    c.bench_function("parse_tables", |b| {
        b.iter(|| {
            let tables = specs::table::parse_tables(black_box(PAGE));
            black_box(tables.len())
        })
    });

    c.bench_function("extract_and_drop_unassigned", |b| {
        b.iter(|| {
            let t = specs::table::extract(black_box(PAGE), 0).unwrap();
            let t = specs::table::drop_unassigned(t).unwrap();
            black_box(t.len())
        })
    });
}

fn bench_join(c: &mut Criterion) {
    let table = specs::table::drop_unassigned(specs::table::extract(PAGE, 0).unwrap()).unwrap();
    let geo = specs::geo::parse_csv(GEO).unwrap();

    c.bench_function("outer_join", |b| {
        b.iter(|| {
            let joined = join::outer_join(black_box(&table), black_box(&geo)).unwrap();
            black_box(joined.records.len())
        })
    });
}

criterion_group!(benches, bench_table, bench_join);
criterion_main!(benches);
