use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use csvedit_sheet::{sniff_delimiter, CsvOptions, Table};

fn sample_csv(rows: usize) -> String {
    let mut out = String::from("id,name,email,comment\n");
    for i in 0..rows {
        out.push_str(&format!(
            "{i},user {i},user{i}@example.com,\"note, with comma {i}\"\n"
        ));
    }
    out
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [100, 1000, 10000].iter() {
        let content = sample_csv(*size);
        let sniffed = CsvOptions::default();
        let fixed = CsvOptions::default().with_delimiter(b',');

        group.bench_with_input(BenchmarkId::new("sniffed", size), size, |b, _| {
            b.iter(|| Table::from_csv_bytes(black_box(content.as_bytes()), &sniffed))
        });

        group.bench_with_input(BenchmarkId::new("fixed", size), size, |b, _| {
            b.iter(|| Table::from_csv_bytes(black_box(content.as_bytes()), &fixed))
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [100, 1000, 10000].iter() {
        let table = Table::from_csv_str(&sample_csv(*size)).unwrap();

        group.bench_with_input(BenchmarkId::new("to_csv_string", size), size, |b, _| {
            b.iter(|| black_box(&table).to_csv_string())
        });
    }

    group.finish();
}

fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit");
    let table = Table::from_csv_str(&sample_csv(1000)).unwrap();

    group.bench_function("edit_cell", |b| {
        let mut table = table.clone();
        b.iter(|| table.edit_cell(black_box(500), black_box(2), "changed"))
    });

    group.bench_function("delete_first_row", |b| {
        b.iter(|| {
            let mut table = table.clone();
            table.delete_row(black_box(0))
        })
    });

    group.finish();
}

fn bench_sniff(c: &mut Criterion) {
    let content = sample_csv(10);
    c.bench_function("sniff_delimiter", |b| {
        b.iter(|| sniff_delimiter(black_box(&content)))
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_edit, bench_sniff);
criterion_main!(benches);
