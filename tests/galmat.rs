//! Verify the Galerkin matrices and vectors against hand-computed values.

extern crate nalgebra as na;

use approx::assert_relative_eq;
use linear_fe1d::{
  assemble::{self, drop_dofs_galvec, lift_dirichlet, reintroduce_dofs},
  Mesh,
};

use std::cell::RefCell;

fn test_meshes() -> Vec<Mesh> {
  vec![
    Mesh::new(vec![0.0, 1.0]).unwrap(),
    Mesh::new(vec![0.0, 1.0, 3.0]).unwrap(),
    Mesh::uniform(0.0, 4.0, 4).unwrap(),
    Mesh::uniform(-1.0, 2.0, 17).unwrap(),
    Mesh::new(vec![-0.5, -0.45, 0.0, 0.01, 0.3, 1.7, 2.0]).unwrap(),
  ]
}

#[test]
fn mat_alpha_handchecked() {
  let mesh = Mesh::new(vec![0.0, 1.0, 3.0]).unwrap();
  let galmat = assemble::mat_alpha(&mesh, |_| 1.0).to_nalgebra_dense();
  #[rustfmt::skip]
  let expected = na::DMatrix::from_row_slice(3, 3, &[
     1.0, -1.0,  0.0,
    -1.0,  1.5, -0.5,
     0.0, -0.5,  0.5,
  ]);
  assert_relative_eq!(&galmat, &expected);

  // alpha is evaluated at the cell midpoints 1 and 3.
  let mesh = Mesh::new(vec![0.0, 2.0, 4.0]).unwrap();
  let galmat = assemble::mat_alpha(&mesh, |x| x).to_nalgebra_dense();
  #[rustfmt::skip]
  let expected = na::DMatrix::from_row_slice(3, 3, &[
     0.5, -0.5,  0.0,
    -0.5,  2.0, -1.5,
     0.0, -1.5,  1.5,
  ]);
  assert_relative_eq!(&galmat, &expected);
}

#[test]
fn mat_alpha_structure() {
  let alpha = |x: f64| 1.0 + x * x;
  for mesh in test_meshes() {
    let m = mesh.ncells();
    let galmat = assemble::mat_alpha(&mesh, alpha);
    assert_eq!(galmat.nrows(), m + 1);
    assert_eq!(galmat.ncols(), m + 1);
    assert_eq!(galmat.ntriplets(), 3 * m + 1);
    assert!(galmat
      .triplets()
      .iter()
      .all(|&(r, c, _)| r.abs_diff(c) <= 1));

    assert!(galmat.is_symmetric());
    let dense = galmat.to_nalgebra_dense();
    assert_eq!(dense, dense.transpose());

    // Constants are in the kernel of the diffusion operator.
    let row_sums = &dense * na::DVector::from_element(m + 1, 1.0);
    assert!(row_sums.norm() < 1e-12 * dense.norm());
  }
}

#[test]
fn mat_alpha_evaluates_midpoints_only() {
  let mesh = Mesh::new(vec![0.0, 1.0, 3.0, 3.5]).unwrap();
  let points = RefCell::new(Vec::new());
  assemble::mat_alpha(&mesh, |x| {
    points.borrow_mut().push(x);
    1.0
  });
  let midpoints = [0.5, 2.0, 3.25];
  assert!(points.borrow().iter().all(|x| midpoints.contains(x)));
  for midpoint in midpoints {
    assert!(points.borrow().contains(&midpoint));
  }
}

#[test]
fn mat_gamma_handchecked() {
  let mesh = Mesh::new(vec![0.0, 1.0, 3.0]).unwrap();
  let galmat = assemble::mat_gamma(&mesh, |_| 2.0);
  assert_eq!(galmat.ntriplets(), 3);
  let diagonal = galmat.try_into_diagonal().unwrap();
  assert_relative_eq!(diagonal, na::DVector::from_row_slice(&[1.0, 3.0, 2.0]));

  let galmat = assemble::mat_gamma(&mesh, |x| x);
  let diagonal = galmat.try_into_diagonal().unwrap();
  assert_relative_eq!(diagonal, na::DVector::from_row_slice(&[0.0, 1.5, 3.0]));
}

#[test]
fn mat_gamma_zero_reaction() {
  for mesh in test_meshes() {
    let galmat = assemble::mat_gamma(&mesh, |_| 0.0);
    assert_eq!(galmat.ntriplets(), mesh.nnodes());
    assert!(galmat.triplets().iter().all(|&(r, c, v)| r == c && v == 0.0));
  }
}

#[test]
fn rhs_f_handchecked() {
  let mesh = Mesh::new(vec![0.0, 1.0, 3.0]).unwrap();
  let galvec = assemble::rhs_f(&mesh, |x| x);
  assert_relative_eq!(galvec, na::DVector::from_row_slice(&[0.0, 1.5, 3.0]));
}

#[test]
fn rhs_constant_is_rhs_f_of_one() {
  for mesh in test_meshes() {
    let constant = assemble::rhs_constant(&mesh);
    let one = assemble::rhs_f(&mesh, |_| 1.0);
    assert_eq!(constant.len(), mesh.nnodes());
    assert_relative_eq!(constant, one, epsilon = 1e-15);

    let (a, b) = mesh.domain();
    assert_relative_eq!(constant.sum(), b - a, epsilon = 1e-12);
  }
}

#[test]
fn galmat_sum_accumulates_diagonal() {
  let mesh = Mesh::uniform(0.0, 1.0, 5).unwrap();
  let galmat_alpha = assemble::mat_alpha(&mesh, |_| 1.0);
  let galmat_gamma = assemble::mat_gamma(&mesh, |_| 3.0);
  let expected = galmat_alpha.to_nalgebra_dense() + galmat_gamma.to_nalgebra_dense();

  let galmat = galmat_alpha + galmat_gamma;
  assert_eq!(galmat.ntriplets(), 3 * 5 + 1 + 6);
  assert_eq!(galmat.summed().ntriplets(), 3 * 5 + 1);
  assert_relative_eq!(galmat.to_nalgebra_dense(), expected, epsilon = 1e-12);
}

#[test]
fn lift_dirichlet_offset() {
  let mesh = Mesh::new(vec![0.0, 0.5, 1.5, 2.0]).unwrap();
  let alpha = |x: f64| 2.0 + x;
  let (u0, u1) = (3.0, -2.0);

  let galmat = assemble::mat_alpha(&mesh, alpha);
  let mut galvec = assemble::rhs_f(&mesh, |_| 1.0);
  let original = galvec.clone();
  lift_dirichlet(&galmat, &mut galvec, &[(0, u0), (3, u1)]);

  let interior = drop_dofs_galvec(galvec, &[0, 3]);
  let first = original[1] + u0 * alpha(0.25) / 0.5;
  let last = original[2] + u1 * alpha(1.75) / 0.5;
  assert_relative_eq!(interior, na::DVector::from_row_slice(&[first, last]), epsilon = 1e-12);
}

#[test]
fn drop_and_reintroduce_dofs() {
  let galvec = na::DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
  let reduced = drop_dofs_galvec(galvec, &[4, 0]);
  assert_eq!(reduced, na::DVector::from_row_slice(&[2.0, 3.0, 4.0]));

  let full = reintroduce_dofs(reduced, &[(4, -5.0), (0, -1.0)]);
  assert_eq!(full, na::DVector::from_row_slice(&[-1.0, 2.0, 3.0, 4.0, -5.0]));
}
