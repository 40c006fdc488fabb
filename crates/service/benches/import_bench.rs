use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::alumni::import::parse_csv;
use service::alumni::repository::memory::MemoryAlumniRepository;
use service::AlumniService;

fn sample_csv(rows: usize) -> String {
    let mut csv = String::from("nama,email,tahun_mulai,tahun_lulus,tempat_kerja,tempat_kuliah,kesesuaian_kerja,kesesuaian_kuliah\n");
    for i in 0..rows {
        let kerja = if i % 2 == 0 { "PT Maju" } else { "" };
        let kuliah = if i % 3 == 0 { "UGM" } else { "" };
        csv.push_str(&format!("Alumni {i},a{i}@example.com,2016,{},{kerja},{kuliah},ya,tidak\n", 2019 + i % 3));
    }
    csv
}

fn bench_import(c: &mut Criterion) {
    let csv = sample_csv(1000);

    c.bench_function("import_parse_csv_1000", |b| {
        b.iter(|| parse_csv(csv.as_bytes(), 5000).unwrap());
    });

    // rows carry no password so argon2 stays out of the measurement
    let rt = tokio::runtime::Runtime::new().unwrap();
    c.bench_function("import_and_chart_1000", |b| {
        b.iter(|| {
            let svc = AlumniService::new(Arc::new(MemoryAlumniRepository::new()));
            let report = rt.block_on(svc.import_spreadsheet(csv.as_bytes())).unwrap();
            assert_eq!(report.imported, 1000);
            rt.block_on(svc.chart(Some(2020))).unwrap()
        });
    });
}

criterion_group!(benches, bench_import);
criterion_main!(benches);
