//! Linear systems of equations for $-(alpha u')' + gamma u = f$ on an interval,
//! for the different kinds of boundary conditions.
//!
//! Every solve assembles the Galerkin matrix by summing triplet lists,
//! applies its boundary treatment and factorizes the (reduced) matrix with a
//! sparse Cholesky decomposition. A failed factorization aborts the solve.
//! The zero-mean Neumann variant is the exception and needs a sparse LU.

use crate::{
  assemble::{self, DofIdx, GalMat, GalVec},
  linalg::{Cholesky, CholeskyBackend, FactorizationError, Lu},
  mesh::Mesh,
};

use thiserror::Error;

/// The boundary value problem that is being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
  /// $u(a) = u(b) = 0$ with $alpha = 1$.
  HomogeneousDirichlet,
  /// $u(a) = u_0$ and $u(b) = u_1$ without reaction term.
  Dirichlet,
  /// $u'(a) = u'(b) = 0$ with $f = 1$.
  Neumann,
  /// $u'(a) = u'(b) = 0$ without reaction term, regularized by $u(a) = 0$.
  NeumannDropDof,
  /// $u'(a) = u'(b) = 0$ without reaction term, regularized by a zero-mean constraint.
  NeumannAugmented,
}

impl std::fmt::Display for Problem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Self::HomogeneousDirichlet => "homogeneous dirichlet problem",
      Self::Dirichlet => "dirichlet problem",
      Self::Neumann => "neumann problem",
      Self::NeumannDropDof => "neumann problem (dropped dof)",
      Self::NeumannAugmented => "neumann problem (zero mean)",
    };
    write!(f, "{name}")
  }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
  #[error("{problem}: could not decompose the {ndofs}x{ndofs} galerkin matrix")]
  Factorization {
    problem: Problem,
    ndofs: usize,
    #[source]
    source: FactorizationError,
  },
}

/// Configuration of the direct solver used by all problems.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Solver {
  pub backend: CholeskyBackend,
}

impl Solver {
  pub fn new(backend: CholeskyBackend) -> Self {
    Self { backend }
  }

  /// Solves $-u'' + gamma u = f$ with $u(a) = u(b) = 0$.
  pub fn solve_a<G, F>(&self, mesh: &Mesh, gamma: G, f: F) -> Result<GalVec, SolveError>
  where
    G: Fn(f64) -> f64,
    F: Fn(f64) -> f64,
  {
    let galmat = assemble::mat_alpha(mesh, |_| 1.0) + assemble::mat_gamma(mesh, gamma);
    let galvec = assemble::rhs_f(mesh, f);

    let boundary_values = boundary_dof_values(mesh, 0.0, 0.0);
    self.solve_dirichlet_reduced(
      Problem::HomogeneousDirichlet,
      &galmat,
      galvec,
      &boundary_values,
    )
  }

  /// Solves $-(alpha u')' = f$ with $u(a) = u_0$ and $u(b) = u_1$.
  pub fn solve_b<A, F>(
    &self,
    mesh: &Mesh,
    alpha: A,
    f: F,
    u0: f64,
    u1: f64,
  ) -> Result<GalVec, SolveError>
  where
    A: Fn(f64) -> f64,
    F: Fn(f64) -> f64,
  {
    let galmat = assemble::mat_alpha(mesh, alpha);
    let mut galvec = assemble::rhs_f(mesh, f);

    let boundary_values = boundary_dof_values(mesh, u0, u1);
    assemble::lift_dirichlet(&galmat, &mut galvec, &boundary_values);
    self.solve_dirichlet_reduced(Problem::Dirichlet, &galmat, galvec, &boundary_values)
  }

  /// Solves $-(alpha u')' + gamma u = 1$ with $u'(a) = u'(b) = 0$.
  ///
  /// No dofs are removed. For $gamma = 0$ the matrix is singular, the constant
  /// nullspace is not treated. Use [`Solver::solve_neumann_drop_dof`] instead.
  pub fn solve_c<A, G>(&self, mesh: &Mesh, alpha: A, gamma: G) -> Result<GalVec, SolveError>
  where
    A: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
  {
    let galmat_gamma = assemble::mat_gamma(mesh, gamma);
    if galmat_gamma.triplets().iter().all(|&(_, _, v)| v == 0.0) {
      tracing::warn!("neumann problem without reaction term has a singular galerkin matrix");
    }
    let galmat = assemble::mat_alpha(mesh, alpha) + galmat_gamma;
    let galvec = assemble::rhs_constant(mesh);

    tracing::debug!(
      ncells = mesh.ncells(),
      ndofs = galmat.nrows(),
      ntriplets = galmat.ntriplets(),
      "assembled neumann system"
    );
    self.factor_solve(Problem::Neumann, &galmat, &galvec)
  }

  /// Solves $-(alpha u')' = f$ with $u'(a) = u'(b) = 0$.
  ///
  /// The solution is only unique up to a constant, which is fixed by
  /// dropping the first dof, i.e. $u(a) = 0$.
  /// The load must satisfy the compatibility condition $sum_i phi_i = 0$ for
  /// the result to solve the full Neumann system. This is not checked.
  pub fn solve_neumann_drop_dof<A, F>(
    &self,
    mesh: &Mesh,
    alpha: A,
    f: F,
  ) -> Result<GalVec, SolveError>
  where
    A: Fn(f64) -> f64,
    F: Fn(f64) -> f64,
  {
    let galmat = assemble::mat_alpha(mesh, alpha);
    let galvec = assemble::rhs_f(mesh, f);

    let fixed = [(0, 0.0)];
    self.solve_dirichlet_reduced(Problem::NeumannDropDof, &galmat, galvec, &fixed)
  }

  /// Solves $-(alpha u')' = f$ with $u'(a) = u'(b) = 0$ and $integral u = 0$.
  ///
  /// The mean is constrained through a Lagrange multiplier, which borders the
  /// Galerkin matrix with the trapezoidal weights of [`assemble::rhs_constant`].
  /// The bordered matrix is indefinite, so it is always decomposed by the
  /// sparse LU of faer, independent of the configured Cholesky backend.
  pub fn solve_neumann_augmented<A, F>(
    &self,
    mesh: &Mesh,
    alpha: A,
    f: F,
  ) -> Result<GalVec, SolveError>
  where
    A: Fn(f64) -> f64,
    F: Fn(f64) -> f64,
  {
    let ndofs = mesh.nnodes();
    let galmat = assemble::mat_alpha(mesh, alpha);
    let galvec = assemble::rhs_f(mesh, f);
    let weights = assemble::rhs_constant(mesh);

    let capacity = galmat.ntriplets() + 2 * ndofs;
    let mut augmented = GalMat::with_capacity(ndofs + 1, ndofs + 1, capacity);
    for &(r, c, v) in galmat.triplets() {
      augmented.push(r, c, v);
    }
    for (idof, &w) in weights.iter().enumerate() {
      augmented.push(idof, ndofs, w);
      augmented.push(ndofs, idof, w);
    }
    let galvec = galvec.insert_row(ndofs, 0.0);

    tracing::debug!(
      ndofs = augmented.nrows(),
      ntriplets = augmented.ntriplets(),
      "assembled augmented neumann system"
    );

    let lu = Lu::factor(&augmented).map_err(|source| SolveError::Factorization {
      problem: Problem::NeumannAugmented,
      ndofs: augmented.nrows(),
      source,
    })?;
    let galsol = lu.solve(&galvec);
    tracing::trace!(multiplier = galsol[ndofs], "zero-mean constraint");
    Ok(galsol.remove_row(ndofs))
  }

  /// Drops the fixed dofs, solves for the remaining ones and reinserts the fixed values.
  fn solve_dirichlet_reduced(
    &self,
    problem: Problem,
    galmat: &GalMat,
    galvec: GalVec,
    fixed: &[(DofIdx, f64)],
  ) -> Result<GalVec, SolveError> {
    let fixed_dofs: Vec<DofIdx> = fixed.iter().map(|&(idof, _)| idof).collect();
    let galmat = galmat.drop_dofs(&fixed_dofs);
    let galvec = assemble::drop_dofs_galvec(galvec, &fixed_dofs);
    assert_eq!(galmat.nrows(), galvec.len());

    tracing::debug!(
      %problem,
      ndofs = galmat.nrows(),
      ndropped = fixed_dofs.len(),
      ntriplets = galmat.ntriplets(),
      "assembled reduced system"
    );

    let galsol = if galmat.nrows() == 0 {
      GalVec::zeros(0)
    } else {
      self.factor_solve(problem, &galmat, &galvec)?
    };
    Ok(assemble::reintroduce_dofs(galsol, fixed))
  }

  fn factor_solve(
    &self,
    problem: Problem,
    galmat: &GalMat,
    galvec: &GalVec,
  ) -> Result<GalVec, SolveError> {
    let cholesky =
      Cholesky::factor(galmat, self.backend).map_err(|source| SolveError::Factorization {
        problem,
        ndofs: galmat.nrows(),
        source,
      })?;
    Ok(cholesky.solve(galvec))
  }
}

fn boundary_dof_values(mesh: &Mesh, u0: f64, u1: f64) -> [(DofIdx, f64); 2] {
  let [first, last] = mesh.boundary_nodes();
  [(first, u0), (last, u1)]
}

/// Homogeneous Dirichlet problem, see [`Solver::solve_a`].
pub fn solve_a<G, F>(mesh: &Mesh, gamma: G, f: F) -> Result<GalVec, SolveError>
where
  G: Fn(f64) -> f64,
  F: Fn(f64) -> f64,
{
  Solver::default().solve_a(mesh, gamma, f)
}

/// Inhomogeneous Dirichlet problem, see [`Solver::solve_b`].
pub fn solve_b<A, F>(mesh: &Mesh, alpha: A, f: F, u0: f64, u1: f64) -> Result<GalVec, SolveError>
where
  A: Fn(f64) -> f64,
  F: Fn(f64) -> f64,
{
  Solver::default().solve_b(mesh, alpha, f, u0, u1)
}

/// Pure Neumann problem, see [`Solver::solve_c`].
pub fn solve_c<A, G>(mesh: &Mesh, alpha: A, gamma: G) -> Result<GalVec, SolveError>
where
  A: Fn(f64) -> f64,
  G: Fn(f64) -> f64,
{
  Solver::default().solve_c(mesh, alpha, gamma)
}

/// Neumann problem without reaction term, see [`Solver::solve_neumann_drop_dof`].
pub fn solve_neumann_drop_dof<A, F>(mesh: &Mesh, alpha: A, f: F) -> Result<GalVec, SolveError>
where
  A: Fn(f64) -> f64,
  F: Fn(f64) -> f64,
{
  Solver::default().solve_neumann_drop_dof(mesh, alpha, f)
}

/// Neumann problem with zero-mean solution, see [`Solver::solve_neumann_augmented`].
pub fn solve_neumann_augmented<A, F>(mesh: &Mesh, alpha: A, f: F) -> Result<GalVec, SolveError>
where
  A: Fn(f64) -> f64,
  F: Fn(f64) -> f64,
{
  Solver::default().solve_neumann_augmented(mesh, alpha, f)
}
