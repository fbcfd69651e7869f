use crate::assemble::DofIdx;

use itertools::Itertools;
use std::ops::{Add, AddAssign};

pub type Triplet = (usize, usize, f64);

/// Sparse matrix in coordinate (triplet) form.
///
/// Entries at the same position are allowed and are summed on materialization.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<Triplet>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self::new(nrows, ncols, Vec::new())
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<Triplet>) -> Self {
    Self {
      nrows,
      ncols,
      triplets,
    }
  }
  pub fn with_capacity(nrows: usize, ncols: usize, capacity: usize) -> Self {
    Self::new(nrows, ncols, Vec::with_capacity(capacity))
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn ntriplets(&self) -> usize {
    self.triplets.len()
  }
  pub fn triplets(&self) -> &[Triplet] {
    &self.triplets
  }

  /// Zero values are kept, so the number of triplets only depends on the sparsity pattern.
  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    assert!(r < self.nrows && c < self.ncols);
    self.triplets.push((r, c, v));
  }

  /// Accumulates all entries sharing a position into a single entry.
  ///
  /// Entries are sorted column-major and summed in their original order,
  /// so the result is deterministic.
  pub fn summed(&self) -> Self {
    let triplets = self
      .triplets
      .iter()
      .copied()
      .sorted_by_key(|&(r, c, _)| (c, r))
      .coalesce(|(r0, c0, v0), (r1, c1, v1)| {
        if (r0, c0) == (r1, c1) {
          Ok((r0, c0, v0 + v1))
        } else {
          Err(((r0, c0, v0), (r1, c1, v1)))
        }
      })
      .collect();
    Self::new(self.nrows, self.ncols, triplets)
  }

  /// Removes the rows and columns of the given dofs and renumbers the remaining ones.
  pub fn drop_dofs(&self, dofs: &[DofIdx]) -> Self {
    assert!(self.nrows == self.ncols);
    let dofs: Vec<DofIdx> = dofs.iter().copied().sorted_unstable().dedup().collect();
    let ndofs_new = self.nrows - dofs.len();

    let renumber = |i: usize| i - dofs.partition_point(|&idof| idof < i);
    let triplets = self
      .triplets
      .iter()
      .filter(|(r, c, _)| dofs.binary_search(r).is_err() && dofs.binary_search(c).is_err())
      .map(|&(r, c, v)| (renumber(r), renumber(c), v))
      .collect();

    Self::new(ndofs_new, ndofs_new, triplets)
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let summed = self.summed();
    let (rows, cols, vals): (Vec<_>, Vec<_>, Vec<_>) = summed.triplets.into_iter().multiunzip();
    nas::CooMatrix::try_from_triplets(self.nrows, self.ncols, rows, cols, vals)
      .expect("Triplet indices are bounds checked on push.")
  }

  pub fn to_nalgebra_csc(&self) -> nas::CscMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_faer_csc(
    &self,
  ) -> Result<faer::sparse::SparseColMat<usize, f64>, faer::sparse::CreationError> {
    let summed = self.summed();
    faer::sparse::SparseColMat::try_new_from_triplets(self.nrows, self.ncols, &summed.triplets)
  }

  /// Returns `None` if matrix is not diagonal.
  pub fn try_into_diagonal(self) -> Option<na::DVector<f64>> {
    let mut diagonal = na::DVector::zeros(self.nrows.max(self.ncols));
    for (r, c, v) in self.triplets {
      if r == c {
        diagonal[r] += v;
      } else {
        return None;
      }
    }
    Some(diagonal)
  }

  pub fn is_symmetric(&self) -> bool {
    let summed = self.summed();
    let transposed = summed.transpose().summed();
    self.nrows == self.ncols && summed.triplets == transposed.triplets
  }

  pub fn transpose(&self) -> Self {
    let triplets = self.triplets.iter().map(|&(r, c, v)| (c, r, v)).collect();
    Self::new(self.ncols, self.nrows, triplets)
  }
}

impl AddAssign<SparseMatrix> for SparseMatrix {
  fn add_assign(&mut self, other: SparseMatrix) {
    assert!(self.nrows == other.nrows && self.ncols == other.ncols);
    self.triplets.extend(other.triplets);
  }
}

/// Concatenates the triplet lists.
impl Add<SparseMatrix> for SparseMatrix {
  type Output = SparseMatrix;
  fn add(mut self, other: SparseMatrix) -> Self::Output {
    self += other;
    self
  }
}
