use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mapsql::{
    FieldType, InsertRequest, Mapping, QueryRequest, Record, SqlMapper, Value, record,
};

/// Mapping with `n` number columns plus a point and a polygon.
fn build_mapping(n: usize) -> Mapping {
    let mut mapping = Mapping::new()
        .field("location", FieldType::Point)
        .field("borders", FieldType::Polygon);
    for i in 0..n {
        mapping.insert(format!("col{i}"), FieldType::Number);
    }
    mapping
}

fn build_data(n: usize) -> Record {
    let mut data = record! {
        "location" => record! { "x" => 12.33, "y" => 12.22 },
        "borders" => vec![
            record! { "x" => 1, "y" => 1 },
            record! { "x" => 1, "y" => 2 },
            record! { "x" => 2, "y" => 2 },
        ],
    };
    for i in 0..n {
        data.insert(format!("col{i}"), i as i64);
    }
    data
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/insert");
    let mapper = SqlMapper::new();

    for n in [1, 5, 10, 50, 100] {
        let request = InsertRequest::new("t", build_mapping(n)).with_data(build_data(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &request, |b, request| {
            b.iter(|| black_box(mapper.insert(request)));
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/query");
    let mapper = SqlMapper::new();

    for n in [1, 5, 10, 50] {
        let mut and = Record::new();
        let mut or = Record::new();
        for i in 0..n {
            and.insert(format!("col{i}"), record! { ">=" => i as i64 });
            or.insert(
                format!("col{i}"),
                record! { "in" => (0..10).map(Value::from).collect::<Vec<_>>() },
            );
        }
        let request = QueryRequest::new("t", build_mapping(n))
            .with_where(record! { "and" => and, "or" => or })
            .with_offset(vec![0, 20])
            .with_count("c");

        group.bench_with_input(BenchmarkId::from_parameter(n), &request, |b, request| {
            b.iter(|| black_box(mapper.query(request)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_query);
criterion_main!(benches);
