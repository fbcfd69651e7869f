//! Sparse direct solvers for the Galerkin systems.

use crate::sparse::SparseMatrix;

use faer::solvers::SpSolver;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorizationError {
  #[error("matrix is not positive definite")]
  NotPositiveDefinite,
  #[error("matrix is singular")]
  Singular,
  #[error("faer failed: {0}")]
  Faer(String),
}

/// Which library performs the sparse Cholesky factorization.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CholeskyBackend {
  #[default]
  Nalgebra,
  Faer,
}

impl std::fmt::Display for CholeskyBackend {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Nalgebra => write!(f, "nalgebra-sparse"),
      Self::Faer => write!(f, "faer"),
    }
  }
}

pub enum Cholesky {
  Nalgebra(nas::factorization::CscCholesky<f64>),
  Faer(faer::sparse::linalg::solvers::Cholesky<usize, f64>),
}

impl Cholesky {
  /// Factorizes the matrix after summing up duplicate triplets.
  pub fn factor(mat: &SparseMatrix, backend: CholeskyBackend) -> Result<Self, FactorizationError> {
    assert!(mat.nrows() == mat.ncols());
    tracing::trace!(%backend, ndofs = mat.nrows(), "cholesky factorization");

    match backend {
      CholeskyBackend::Nalgebra => {
        let csc = mat.to_nalgebra_csc();
        let raw = nas::factorization::CscCholesky::factor(&csc)
          .map_err(|_| FactorizationError::NotPositiveDefinite)?;
        if has_vanishing_pivot(&csc, raw.l()) {
          return Err(FactorizationError::NotPositiveDefinite);
        }
        Ok(Self::Nalgebra(raw))
      }
      CholeskyBackend::Faer => {
        let csc = mat
          .to_faer_csc()
          .map_err(|err| FactorizationError::Faer(format!("{err:?}")))?;
        let raw = csc
          .sp_cholesky(faer::Side::Upper)
          .map_err(|_| FactorizationError::NotPositiveDefinite)?;
        Ok(Self::Faer(raw))
      }
    }
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    match self {
      Self::Nalgebra(raw) => {
        let x = raw.solve(b);
        na::DVector::from_column_slice(x.as_slice())
      }
      Self::Faer(raw) => {
        let b = faer::col::from_slice(b.as_slice());
        na::DVector::from_vec(raw.solve(b).as_slice().to_vec())
      }
    }
  }
}

/// Rounding can leave a tiny positive pivot where a singular matrix has a zero one.
///
/// A pivot counts as vanishing if `l_jj^2 <= n * eps * max_i a_ii`.
fn has_vanishing_pivot(a: &nas::CscMatrix<f64>, l: &nas::CscMatrix<f64>) -> bool {
  let n = a.nrows() as f64;
  let max_diag_a = a
    .diagonal_as_csc()
    .values()
    .iter()
    .fold(0.0f64, |max, v| max.max(v.abs()));
  let min_pivot = l
    .diagonal_as_csc()
    .values()
    .iter()
    .fold(f64::INFINITY, |min, &v| min.min(v));
  min_pivot * min_pivot <= n * f64::EPSILON * max_diag_a
}

/// Sparse LU decomposition, for the indefinite saddle point systems.
pub struct Lu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
}

impl Lu {
  pub fn factor(mat: &SparseMatrix) -> Result<Self, FactorizationError> {
    assert!(mat.nrows() == mat.ncols());
    tracing::trace!(ndofs = mat.nrows(), "lu factorization");

    let csc = mat
      .to_faer_csc()
      .map_err(|err| FactorizationError::Faer(format!("{err:?}")))?;
    let raw = csc.sp_lu().map_err(|_| FactorizationError::Singular)?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}
