use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flate2::{write::GzEncoder, Compression};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rpager::cancel::CancelToken;
use rpager::content::{open_content, Content};
use rpager::reader::{BackwardReader, ForwardReader};
use rpager::search::{Direction, Pattern, Scanner};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::runtime::Runtime;

const LEVELS: [&str; 4] = ["INFO", "WARN", "DEBUG", "ERROR"];

fn log_bytes(size_kb: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let target = size_kb * 1024;
    let mut data = Vec::with_capacity(target + 256);
    let mut line_num = 0u64;
    while data.len() < target {
        let level = LEVELS[rng.gen_range(0..LEVELS.len())];
        let padding = rng.gen_range(0..160);
        let line = format!(
            "[2024-09-02T10:{:02}:{:02}] {} request {} user_{} {}\n",
            (line_num / 60) % 60,
            line_num % 60,
            level,
            line_num,
            rng.gen_range(0..1000),
            "x".repeat(padding)
        );
        data.extend_from_slice(line.as_bytes());
        line_num += 1;
    }
    data
}

fn plain_file(size_kb: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(&log_bytes(size_kb, 7)).unwrap();
    file.flush().unwrap();
    file
}

fn gzip_file(size_kb: usize) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let mut encoder = GzEncoder::new(std::fs::File::create(file.path()).unwrap(), Compression::fast());
    encoder.write_all(&log_bytes(size_kb, 7)).unwrap();
    encoder.finish().unwrap();
    file
}

fn open(rt: &Runtime, file: &NamedTempFile) -> Arc<dyn Content> {
    rt.block_on(open_content(file.path())).unwrap()
}

fn bench_page_reads(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("page_reads");
    group.measurement_time(Duration::from_secs(5));

    for &size_kb in &[512usize, 20_000] {
        let file = plain_file(size_kb);
        let content = open(&rt, &file);
        let size = content.size().unwrap();
        let label = format!("{}KB", size_kb);

        group.bench_with_input(BenchmarkId::new("forward_page", &label), &content, |b, content| {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            b.iter(|| {
                let start = rng.gen_range(0..size);
                let mut reader = ForwardReader::new(content.as_ref(), start);
                for _ in 0..50 {
                    black_box(reader.read_line().unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("backward_page", &label), &content, |b, content| {
            let mut rng = ChaCha8Rng::seed_from_u64(13);
            b.iter(|| {
                let end = rng.gen_range(1..=size);
                let mut reader = BackwardReader::new(content.as_ref(), end);
                for _ in 0..50 {
                    black_box(reader.read_line().unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_scans(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("scans");
    group.sample_size(10);

    let file = plain_file(20_000);
    let content = open(&rt, &file);
    let size = content.size().unwrap();
    let token = CancelToken::new();
    let pattern = Pattern::compile("user_99[0-9] ERROR|ERROR request 4[0-9]{4} ").unwrap();

    group.bench_function("regex_forward", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        b.iter(|| {
            let scanner = Scanner::new(content.as_ref(), &token);
            let start = rng.gen_range(0..size / 2);
            black_box(scanner.find(&pattern, start, Direction::Forward).unwrap());
        });
    });

    group.bench_function("regex_backward", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        b.iter(|| {
            let scanner = Scanner::new(content.as_ref(), &token);
            let start = rng.gen_range(size / 2..size);
            black_box(scanner.find(&pattern, start, Direction::Backward).unwrap());
        });
    });

    group.bench_function("bisect", |b| {
        let scanner = Scanner::new(content.as_ref(), &token);
        b.iter(|| black_box(scanner.bisect(b"[2024-09-02T10:30").unwrap()));
    });

    group.bench_function("last_page", |b| {
        let scanner = Scanner::new(content.as_ref(), &token);
        b.iter(|| black_box(scanner.last_page(60).unwrap()));
    });
    group.finish();
}

fn bench_open(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("open");
    group.sample_size(10);

    let plain = plain_file(5_000);
    let gzip = gzip_file(5_000);
    group.bench_function("plain_5MB", |b| {
        b.iter(|| black_box(open(&rt, &plain).size().unwrap()));
    });
    group.bench_function("gzip_5MB", |b| {
        b.iter(|| black_box(open(&rt, &gzip).size().unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_page_reads, bench_scans, bench_open);
criterion_main!(benches);
