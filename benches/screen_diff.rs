use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rpager::render::{diff, Colour, ScreenState, Style};

fn random_screen(rng: &mut ChaCha8Rng, rows: u16, cols: u16) -> ScreenState {
    let mut screen = ScreenState::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            let byte = rng.gen_range(b' '..=b'~');
            let style = if rng.gen_ratio(1, 20) {
                Style::with_colours(Colour::Black, Colour::PALETTE[rng.gen_range(0..6)])
            } else {
                Style::DEFAULT
            };
            screen.put(row, col, byte, style);
        }
    }
    screen
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen_diff");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for &(rows, cols) in &[(24u16, 80u16), (60, 240)] {
        let label = format!("{}x{}", cols, rows);
        let base = random_screen(&mut rng, rows, cols);

        group.bench_with_input(BenchmarkId::new("full_repaint", &label), &base, |b, screen| {
            b.iter(|| black_box(diff(None, screen)));
        });

        // One line scrolled in: every row shifts.
        let scrolled = random_screen(&mut rng, rows, cols);
        group.bench_with_input(BenchmarkId::new("scroll", &label), &scrolled, |b, screen| {
            b.iter(|| black_box(diff(Some(&base), screen)));
        });

        let mut status_only = base.clone();
        status_only.put_str(rows - 1, 0, b"app.log  123456/9999999  42%", Style::DEFAULT);
        group.bench_with_input(BenchmarkId::new("status_line", &label), &status_only, |b, screen| {
            b.iter(|| black_box(diff(Some(&base), screen)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff);
criterion_main!(benches);
