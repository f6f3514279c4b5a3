use criterion::{black_box, Criterion, criterion_group, criterion_main};
use blockrelax::matrix::CsrMatrix;
use blockrelax::preconditioner::{
    AdditionalData, BlockPartition, InversionMethod, Relaxation, RelaxationBlockJacobi,
    RelaxationBlockSsor,
};

fn laplace_2d(m: usize) -> CsrMatrix<f64> {
    let mut triplets = Vec::new();
    for i in 0..m {
        for j in 0..m {
            let row = i * m + j;
            triplets.push((row, row, 4.0));
            if i > 0 { triplets.push((row, row - m, -1.0)); }
            if i + 1 < m { triplets.push((row, row + m, -1.0)); }
            if j > 0 { triplets.push((row, row - 1, -1.0)); }
            if j + 1 < m { triplets.push((row, row + 1, -1.0)); }
        }
    }
    CsrMatrix::from_triplets(m * m, m * m, &triplets)
}

fn bench_relaxation(c: &mut Criterion) {
    let m = 64;
    let n = m * m;
    let a = laplace_2d(m);
    let lines = BlockPartition::contiguous(n, m).unwrap();
    let b: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();

    for method in [InversionMethod::GaussJordan, InversionMethod::Householder, InversionMethod::Svd] {
        c.bench_function(&format!("initialize ssor ({method})"), |ben| {
            ben.iter(|| {
                let mut ssor = RelaxationBlockSsor::new();
                ssor.initialize(black_box(&a), AdditionalData::new(lines.clone(), 1.0).with_inversion(method))
                    .unwrap();
                ssor
            })
        });
    }

    let mut ssor = RelaxationBlockSsor::new();
    ssor.initialize(&a, AdditionalData::new(lines.clone(), 1.0)).unwrap();
    let mut x = vec![0.0; n];
    c.bench_function("block ssor step", |ben| {
        ben.iter(|| ssor.step(black_box(&mut x), black_box(&b)).unwrap())
    });

    let mut jacobi = RelaxationBlockJacobi::new();
    jacobi.initialize(&a, AdditionalData::new(lines, 0.8)).unwrap();
    let mut y = vec![0.0; n];
    c.bench_function("block jacobi step", |ben| {
        ben.iter(|| jacobi.step(black_box(&mut y), black_box(&b)).unwrap())
    });
}

criterion_group!(benches, bench_relaxation);
criterion_main!(benches);
