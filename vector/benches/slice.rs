use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strand_vector::{pack_sequence, Slice};

pub fn slice_ops(c: &mut Criterion) {
    let input = [0u32; 10000];
    let mut group = c.benchmark_group("slice");

    group.bench_function("iterate 100 out of 10k", |b| {
        let arr: Slice<_> = input.iter().copied().collect();
        let arr = arr.slice(5000..5100);
        b.iter(|| black_box(arr.iter().count()));
    });

    group.bench_function("reslice 10k", |b| {
        let arr: Slice<_> = input.iter().copied().collect();
        b.iter(|| black_box(arr.slice(1..9999)));
    });

    group.bench_function("pack 10k from guess 16", |b| {
        b.iter(|| black_box(pack_sequence(16, input.iter().copied())));
    });

    group.bench_function("concat 10 x 1k", |b| {
        let parts: Vec<Slice<u32>> = (0..10)
            .map(|_| input[..1000].iter().copied().collect())
            .collect();
        b.iter(|| black_box(Slice::concat(&parts)));
    });
}

criterion_group!(benches, slice_ops);
criterion_main!(benches);
