use blockrelax::config::RelaxationOptions;
use blockrelax::context::Smoother;
use blockrelax::matrix::CsrMatrix;
use blockrelax::preconditioner::{AdditionalData, BlockPartition, InversionMethod, RelaxationBlockSsor};
use blockrelax::solver::{LinearSolver, PcgSolver, RelaxationSolver};

/// Five-point Laplacian on an m x m grid, row-major numbering.
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

fn main() {
    let m = 16;
    let n = m * m;
    let a = laplace_2d(m);
    let b = vec![1.0 / ((m + 1) * (m + 1)) as f64; n];
    // one block per grid line
    let lines = BlockPartition::contiguous(n, m).unwrap();

    // stationary iterations with each smoother
    for pc_type in ["jacobi", "sor", "ssor"] {
        let opts = RelaxationOptions { pc_type: pc_type.into(), omega: 1.0, ..Default::default() };
        let smoother = Smoother::from_options(&a, lines.clone(), &opts).unwrap();
        let mut x = vec![0.0; n];
        let mut solver = RelaxationSolver::new(1e-8, 5000);
        let stats = solver.solve(&a, &smoother, &b, &mut x).unwrap();
        println!("{pc_type:>6}: {stats:?}");
    }

    // block SSOR as a CG preconditioner, blocks inverted by SVD
    let mut ssor = RelaxationBlockSsor::new();
    ssor.initialize(&a, AdditionalData::new(lines, 1.0).with_inversion(InversionMethod::Svd))
        .unwrap();
    let mut x = vec![0.0; n];
    let mut pcg = PcgSolver::new(1e-8, 500);
    let stats = pcg.solve(&a, Some(&ssor), &b, &mut x).unwrap();
    println!("pcg+ssor: {stats:?}");
    println!("u(center) = {:.6}", x[(m / 2) * m + m / 2]);
}
