use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

fn stored_rules() -> String {
    let fixture_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ingo_rules.txt");
    std::fs::read_to_string(fixture_path).unwrap()
}

fn bench_repair(c: &mut Criterion) {
    let stored = stored_rules();

    c.bench_function("repair_length_prefixes", |b| {
        b.iter(|| ingo2zimbra::serialize::repair_length_prefixes(&stored))
    });
}

fn bench_convert(c: &mut Criterion) {
    let stored = stored_rules();
    let options = ingo2zimbra::convert::ConvertOptions::default();

    c.bench_function("convert_stored_rules", |b| {
        b.iter(|| {
            ingo2zimbra::convert::convert_stored_rules("user@example.com", &stored, &options)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_repair, bench_convert);
criterion_main!(benches);
