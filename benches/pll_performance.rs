//! PLL Performance Benchmarks
//!
//! Validates that the loop meets real-time audio processing requirements.
//! For real-time audio, a buffer must be processed before the next one
//! arrives; the time budget is:
//!
//! ```text
//! time_budget = buffer_size / sample_rate
//! ```
//!
//! | Sample Rate | Buffer 64  | Buffer 128 | Buffer 256 | Buffer 512 |
//! |-------------|------------|------------|------------|------------|
//! | 44.1 kHz    | 1.45 ms    | 2.90 ms    | 5.80 ms    | 11.61 ms   |
//! | 48 kHz      | 1.33 ms    | 2.67 ms    | 5.33 ms    | 10.67 ms   |
//! | 96 kHz      | 0.67 ms    | 1.33 ms    | 2.67 ms    | 5.33 ms    |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use phaselock::prelude::*;

const SAMPLE_RATE: f64 = 44100.0;
const BUFFER_SIZES: [usize; 4] = [64, 128, 256, 512];

/// A loop with enough feedback engaged that the full signal path runs.
fn make_pll(kind: DetectorKind) -> Pll {
    let mut pll = Pll::new(SAMPLE_RATE);
    pll.set_detector(kind);
    pll.set_cutoff(10.0);
    let _ = pll.set_gain(500.0);
    pll
}

fn make_input(len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| (n as f64 * 997.0 / SAMPLE_RATE * std::f64::consts::TAU).sin())
        .collect()
}

fn bench_tick_per_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let input = make_input(1024);

    for kind in DetectorKind::ALL {
        group.bench_with_input(
            BenchmarkId::new("detector", format!("{:?}", kind)),
            &kind,
            |b, &kind| {
                let mut pll = make_pll(kind);
                let mut n = 0;
                b.iter(|| {
                    n = (n + 1) % input.len();
                    black_box(pll.tick(black_box(input[n])))
                });
            },
        );
    }
    group.finish();
}

fn bench_process_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");

    for &size in &BUFFER_SIZES {
        let input = make_input(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            let mut pll = make_pll(DetectorKind::Analog);
            let mut osc = vec![0.0; size];
            let mut phase = vec![0.0; size];
            b.iter(|| {
                pll.process(black_box(&input), &mut osc, &mut phase);
                black_box(osc[size - 1])
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick_per_detector, bench_process_block);
criterion_main!(benches);
