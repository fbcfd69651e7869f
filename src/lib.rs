//! Piecewise-linear finite elements for second-order elliptic
//! boundary value problems $-(alpha u')' + gamma u = f$ on an interval.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod linalg;
pub mod lse;
pub mod mesh;
pub mod sparse;

pub use lse::{
  solve_a, solve_b, solve_c, solve_neumann_augmented, solve_neumann_drop_dof, SolveError, Solver,
};
pub use mesh::{Mesh, MeshError};
