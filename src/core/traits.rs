//! Core linear-algebra traits for blockrelax.

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}

/// Inner products & norms.
pub trait InnerProduct<V> {
    /// Associated scalar type.
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Compute dot(x, y).
    fn dot(&self, x: &V, y: &V) -> Self::Scalar;
    /// Compute ‖x‖₂.
    fn norm(&self, x: &V) -> Self::Scalar;
}

/// Read-only row access to a (sparse) matrix.
///
/// This is the only view of the system matrix the relaxation engine needs:
/// the dimension, and the stored entries of one row as `(column, value)`
/// pairs. Entries may come in any column order; explicit zeros are allowed.
pub trait RowEntries<T> {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Stored entries of row `row` as `(column, value)` pairs.
    fn row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_;
}
