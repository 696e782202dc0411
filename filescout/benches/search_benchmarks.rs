use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filescout::{search, CancellationToken, SearchOptions, SearchProgress};
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<()> {
    for i in 0..file_count {
        let file_path = dir.path().join(format!("test_{}.txt", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(file, "Line {} in file {}: nothing to see", j, i)?;
        }
        if i % 10 == 0 {
            writeln!(file, "one ERROR line near the end")?;
        }
    }
    Ok(())
}

fn no_progress(_: SearchProgress) {}

fn bench_metadata_search(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 100, 50).unwrap();

    let mut options = SearchOptions::new(dir.path());
    options.name_pattern = Some("test_*.txt".to_string());

    c.bench_function("metadata_search", |b| {
        b.iter(|| {
            black_box(search(&options, &no_progress, &CancellationToken::new()).unwrap())
        });
    });
}

fn bench_content_search(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 100, 50).unwrap();

    let mut options = SearchOptions::new(dir.path());
    options.content_query = Some("ERROR".to_string());

    c.bench_function("content_search", |b| {
        b.iter(|| {
            black_box(search(&options, &no_progress, &CancellationToken::new()).unwrap())
        });
    });
}

criterion_group!(benches, bench_metadata_search, bench_content_search);
criterion_main!(benches);
