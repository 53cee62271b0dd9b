use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgcrud::{BuildStatement, ColumnValues, Exclusions, insert, select, update};

fn columns(n: usize) -> ColumnValues {
    (0..n).map(|i| (format!("col{i}"), format!("value {i}"))).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/insert");

    for n in [1, 5, 10, 50, 100] {
        let contents = columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &contents, |b, contents| {
            b.iter(|| {
                let stmt = insert("t").values(contents.clone()).build();
                black_box(stmt)
            });
        });
    }

    group.finish();
}

fn bench_update_with_exclusions(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/update");

    for n in [5, 20, 100] {
        let contents = columns(n);
        let excluded: Exclusions = (0..n).step_by(3).map(|i| format!("col{i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let stmt = update("t")
                    .values(contents.clone())
                    .exclusions(excluded.clone())
                    .where_eq("id", 1)
                    .build();
                black_box(stmt)
            });
        });
    }

    group.finish();
}

fn bench_select_like(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/select_like");

    for n in [1, 5, 10, 50] {
        let conditions = columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &conditions, |b, conditions| {
            b.iter(|| {
                let stmt = select("t")
                    .conditions(conditions.clone())
                    .like(true)
                    .order_by("col0 DESC")
                    .limit(10)
                    .build();
                black_box(stmt)
            });
        });
    }

    group.finish();
}

fn bench_inline_sql(c: &mut Criterion) {
    let stmt = insert("t")
        .values(columns(20))
        .build()
        .expect("valid insert");
    c.bench_function("statement_builder/to_inline_sql", |b| {
        b.iter(|| black_box(stmt.to_inline_sql()));
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_update_with_exclusions,
    bench_select_like,
    bench_inline_sql
);
criterion_main!(benches);
