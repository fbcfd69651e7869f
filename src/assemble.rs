//! Assembly of the Galerkin matrices and vectors for
//! $-(alpha u')' + gamma u = f$ with piecewise-linear Lagrangian finite elements.
//!
//! All coefficient functions are evaluated pointwise by the quadrature rules.
//! The mesh must have at least 2 nodes, which [`Mesh`] guarantees.

use crate::{mesh::Mesh, sparse::SparseMatrix};

pub type DofIdx = usize;
pub type GalMat = SparseMatrix;
pub type GalVec = na::DVector<f64>;

/// Galerkin matrix of $integral alpha u' v' dif x$.
///
/// Uses the midpoint rule on each cell, where $u' v'$ is constant.
/// Gives a tridiagonal matrix with exactly $3M+1$ triplets.
pub fn mat_alpha<F>(mesh: &Mesh, alpha: F) -> GalMat
where
  F: Fn(f64) -> f64,
{
  let m = mesh.ncells();
  let mut galmat = GalMat::with_capacity(m + 1, m + 1, 3 * m + 1);

  // Boundary nodes only touch a single cell.
  galmat.push(0, 0, alpha(mesh.cell_midpoint(0)) / mesh.cell_width(0));
  galmat.push(m, m, alpha(mesh.cell_midpoint(m - 1)) / mesh.cell_width(m - 1));

  for i in 1..m {
    let left = alpha(mesh.cell_midpoint(i - 1)) / mesh.cell_width(i - 1);
    let right = alpha(mesh.cell_midpoint(i)) / mesh.cell_width(i);
    galmat.push(i, i, left + right);
  }

  for icell in 0..m {
    let offdiag = -alpha(mesh.cell_midpoint(icell)) / mesh.cell_width(icell);
    galmat.push(icell + 1, icell, offdiag);
    galmat.push(icell, icell + 1, offdiag);
  }

  galmat
}

/// Galerkin matrix of $integral gamma u v dif x$.
///
/// Uses the trapezoidal rule on each cell, which lumps the mass onto the diagonal.
pub fn mat_gamma<F>(mesh: &Mesh, gamma: F) -> GalMat
where
  F: Fn(f64) -> f64,
{
  let nnodes = mesh.nnodes();
  let mut galmat = GalMat::with_capacity(nnodes, nnodes, nnodes);
  for inode in 0..nnodes {
    galmat.push(
      inode,
      inode,
      gamma(mesh.node(inode)) * mesh.node_patch_weight(inode),
    );
  }
  galmat
}

/// Galerkin vector of $integral f v dif x$ using the trapezoidal rule.
pub fn rhs_f<F>(mesh: &Mesh, f: F) -> GalVec
where
  F: Fn(f64) -> f64,
{
  GalVec::from_fn(mesh.nnodes(), |inode, _| {
    f(mesh.node(inode)) * mesh.node_patch_weight(inode)
  })
}

/// Galerkin vector of $integral v dif x$.
///
/// Identical to [`rhs_f`] with $f = 1$, without evaluating any function.
pub fn rhs_constant(mesh: &Mesh) -> GalVec {
  GalVec::from_fn(mesh.nnodes(), |inode, _| mesh.node_patch_weight(inode))
}

pub fn drop_dofs_galvec(galvec: GalVec, dofs: &[DofIdx]) -> GalVec {
  let mut dofs = dofs.to_vec();
  dofs.sort_unstable();
  dofs.dedup();
  galvec.remove_rows_at(&dofs)
}

/// Inserts the prescribed values of dropped dofs into a reduced solution.
pub fn reintroduce_dofs(galsol: GalVec, dof_values: &[(DofIdx, f64)]) -> GalVec {
  let mut dof_values = dof_values.to_vec();
  dof_values.sort_unstable_by_key(|&(idof, _)| idof);
  dof_values.dedup_by_key(|&mut (idof, _)| idof);

  dof_values
    .into_iter()
    .fold(galsol, |galsol, (idof, value)| galsol.insert_row(idof, value))
}

/// Offset function technique for Dirichlet boundary conditions.
///
/// With $g$ the vector holding the prescribed values on the fixed dofs (zero elsewhere),
/// the load becomes $phi - A g$. The fixed rows and columns still have to be dropped afterwards.
pub fn lift_dirichlet(galmat: &GalMat, galvec: &mut GalVec, dof_values: &[(DofIdx, f64)]) {
  let mut offset = GalVec::zeros(galmat.ncols());
  for &(idof, value) in dof_values {
    offset[idof] = value;
  }

  for &(r, c, v) in galmat.triplets() {
    if offset[c] != 0.0 {
      galvec[r] -= v * offset[c];
    }
  }
}
