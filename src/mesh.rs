//! One-dimensional meshes of an interval $[a, b]$.
//!
//! A mesh is nothing more than the sorted node coordinates $x_0 < x_1 < ... < x_M$.
//! Cell $i$ is the element $[x_i, x_(i+1)]$.
//! The invariant is checked once at construction, assemblers rely on it afterwards.

use thiserror::Error;

pub type NodeIdx = usize;
pub type CellIdx = usize;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
  #[error("mesh needs at least 2 nodes, but got {0}")]
  TooFewNodes(usize),
  #[error("mesh node x[{idx}] = {coord} is not finite")]
  NonFinite { idx: NodeIdx, coord: f64 },
  #[error("mesh nodes are not strictly increasing: x[{idx}] = {left} >= x[{}] = {right}", .idx + 1)]
  NotIncreasing { idx: NodeIdx, left: f64, right: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
  nodes: na::DVector<f64>,
}

impl Mesh {
  pub fn new(nodes: Vec<f64>) -> Result<Self, MeshError> {
    if nodes.len() < 2 {
      return Err(MeshError::TooFewNodes(nodes.len()));
    }
    if let Some((idx, &coord)) = nodes.iter().enumerate().find(|(_, x)| !x.is_finite()) {
      return Err(MeshError::NonFinite { idx, coord });
    }
    if let Some(idx) = nodes.windows(2).position(|w| w[0] >= w[1]) {
      return Err(MeshError::NotIncreasing {
        idx,
        left: nodes[idx],
        right: nodes[idx + 1],
      });
    }

    let nodes = na::DVector::from_vec(nodes);
    Ok(Self { nodes })
  }

  /// Equidistant mesh of $[a, b]$ with `ncells` cells.
  pub fn uniform(a: f64, b: f64, ncells: usize) -> Result<Self, MeshError> {
    let nodes = (0..=ncells)
      .map(|i| a + (b - a) * i as f64 / ncells as f64)
      .collect();
    Self::new(nodes)
  }

  pub fn nodes(&self) -> &na::DVector<f64> {
    &self.nodes
  }
  pub fn node(&self, inode: NodeIdx) -> f64 {
    self.nodes[inode]
  }
  pub fn nnodes(&self) -> usize {
    self.nodes.len()
  }
  pub fn ncells(&self) -> usize {
    self.nnodes() - 1
  }
  pub fn domain(&self) -> (f64, f64) {
    (self.nodes[0], self.nodes[self.ncells()])
  }

  pub fn cell_width(&self, icell: CellIdx) -> f64 {
    self.nodes[icell + 1] - self.nodes[icell]
  }
  pub fn cell_midpoint(&self, icell: CellIdx) -> f64 {
    (self.nodes[icell] + self.nodes[icell + 1]) / 2.0
  }

  /// Half of the summed widths of the cells adjacent to the node.
  ///
  /// This is the trapezoidal weight of the node.
  pub fn node_patch_weight(&self, inode: NodeIdx) -> f64 {
    let m = self.ncells();
    if inode == 0 {
      0.5 * self.cell_width(0)
    } else if inode == m {
      0.5 * self.cell_width(m - 1)
    } else {
      0.5 * (self.nodes[inode + 1] - self.nodes[inode - 1])
    }
  }

  pub fn boundary_nodes(&self) -> [NodeIdx; 2] {
    [0, self.ncells()]
  }
}
