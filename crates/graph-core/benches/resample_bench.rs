use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_core::{AxisParameters, ResampleMode, SignalBuffer};

fn gen_signal(n: usize) -> Vec<f32> {
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        // waveform with a slow envelope sweep
        let s = (i as f32 * 0.05).sin() * 0.4 * (i as f32 * 0.0001).cos() + 0.5;
        v.push(s);
    }
    v
}

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    let axis = AxisParameters::linear(0.0, 1.0).unwrap();
    for &n in &[16_384usize, 65_536usize] {
        let buffer = SignalBuffer::new(n, axis);
        buffer.write(&gen_signal(n)).unwrap();
        for &target in &[800usize, 1_920usize] {
            let mut min_out = vec![0.0f32; target];
            let mut max_out = vec![0.0f32; target];
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("n{n}_t{target}")),
                &target,
                |b, _| {
                    b.iter(|| {
                        buffer
                            .resample_into(
                                black_box(&mut min_out),
                                black_box(&mut max_out),
                                (0.0, 1.0),
                                &axis,
                                ResampleMode::MinMax,
                            )
                            .unwrap();
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_resample);
criterion_main!(benches);
