//! Smoothers driven by the iterative solvers on a 2-D Poisson problem.
//!
//! The five-point Laplacian on an `m x m` grid is stored in CSR form and
//! partitioned by grid lines, the usual line-relaxation setup.

use blockrelax::config::RelaxationOptions;
use blockrelax::context::{RelaxationType, Smoother};
use blockrelax::core::traits::MatVec;
use blockrelax::matrix::CsrMatrix;
use blockrelax::preconditioner::{AdditionalData, BlockPartition, RelaxationBlockSsor};
use blockrelax::solver::{LinearSolver, PcgSolver, RelaxationSolver};

fn laplace_2d(m: usize) -> CsrMatrix<f64> {
    let idx = |i: usize, j: usize| i * m + j;
    let mut triplets = Vec::new();
    for i in 0..m {
        for j in 0..m {
            let row = idx(i, j);
            triplets.push((row, row, 4.0));
            if i > 0 {
                triplets.push((row, idx(i - 1, j), -1.0));
            }
            if i + 1 < m {
                triplets.push((row, idx(i + 1, j), -1.0));
            }
            if j > 0 {
                triplets.push((row, idx(i, j - 1), -1.0));
            }
            if j + 1 < m {
                triplets.push((row, idx(i, j + 1), -1.0));
            }
        }
    }
    CsrMatrix::from_triplets(m * m, m * m, &triplets)
}

fn relative_residual(a: &CsrMatrix<f64>, x: &[f64], b: &[f64]) -> f64 {
    let mut ax = vec![0.0; b.len()];
    a.matvec(&x.to_vec(), &mut ax);
    let r: f64 = b.iter().zip(&ax).map(|(bi, axi)| (bi - axi).powi(2)).sum::<f64>().sqrt();
    r / b.iter().map(|bi| bi * bi).sum::<f64>().sqrt()
}

#[test]
fn line_smoothers_converge_as_stationary_iterations() {
    let m = 8;
    let a = laplace_2d(m);
    assert_eq!(a.nnz(), 5 * m * m - 4 * m);
    let lines = BlockPartition::contiguous(m * m, m).unwrap();
    let b = vec![1.0; m * m];

    for pc_type in ["jacobi", "sor", "ssor"] {
        let opts = RelaxationOptions { pc_type: pc_type.into(), ..Default::default() };
        let smoother = Smoother::from_options(&a, lines.clone(), &opts).unwrap();
        let mut x = vec![0.0; m * m];
        let mut solver = RelaxationSolver::new(1e-8, 2000);
        let stats = solver.solve(&a, &smoother, &b, &mut x).unwrap();
        assert!(stats.converged, "{pc_type} did not converge");
        assert!(relative_residual(&a, &x, &b) <= 1e-8);
    }
}

#[test]
fn transposed_sor_iteration_converges() {
    let m = 6;
    let a = laplace_2d(m);
    let mut sor = Smoother::new(RelaxationType::Sor);
    sor.initialize(&a, AdditionalData::new(BlockPartition::contiguous(m * m, m).unwrap(), 1.2)).unwrap();
    let b: Vec<f64> = (0..m * m).map(|k| (k % 3) as f64 - 1.0).collect();
    let mut x = vec![0.0; m * m];
    let mut solver = RelaxationSolver::new(1e-9, 1000).with_transpose(true);
    let stats = solver.solve(&a, &sor, &b, &mut x).unwrap();
    assert!(stats.converged);
    assert!(relative_residual(&a, &x, &b) <= 1e-9);
}

#[test]
fn pcg_with_block_ssor_converges() {
    let m = 10;
    let a = laplace_2d(m);
    let mut ssor = RelaxationBlockSsor::new().with_steps(2);
    ssor.initialize(&a, AdditionalData::new(BlockPartition::contiguous(m * m, m).unwrap(), 1.0)).unwrap();
    let b: Vec<f64> = (0..m * m).map(|k| ((k * 7) % 11) as f64 / 11.0).collect();
    let mut x = vec![0.0; m * m];
    let mut solver = PcgSolver::new(1e-10, 500);
    let stats = solver.solve(&a, Some(&ssor), &b, &mut x).unwrap();
    assert!(stats.converged);
    assert!(relative_residual(&a, &x, &b) <= 1e-8);
}

#[test]
fn steps_must_be_positive() {
    let a = laplace_2d(3);
    let opts = RelaxationOptions { steps: 0, ..Default::default() };
    assert!(Smoother::from_options(&a, BlockPartition::contiguous(9, 3).unwrap(), &opts).is_err());
}
