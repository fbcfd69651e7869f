use linear_fe1d::{linalg::CholeskyBackend, Mesh, Solver};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt::init();

  // Non-uniform mesh of [0, 1], refined towards the left end.
  let ncells = 20;
  let nodes = (0..=ncells)
    .map(|i| (i as f64 / ncells as f64).powi(2))
    .collect();
  let mesh = Mesh::new(nodes)?;

  let solver = Solver::new(CholeskyBackend::Faer);

  let u_a = solver.solve_a(&mesh, |_| 0.0, |_| 1.0)?;
  let exact_a = mesh.nodes().map(|x| 0.5 * x * (1.0 - x));
  println!("(A) error = {:e}", (&u_a - exact_a).amax());

  let u_b = solver.solve_b(&mesh, |x| 1.0 + x, |_| 0.0, 0.0, 1.0)?;
  let exact_b = mesh.nodes().map(|x| (1.0 + x).ln() / 2f64.ln());
  println!("(B) error = {:e}", (&u_b - exact_b).amax());

  let u_c = solver.solve_c(&mesh, |x| 1.0 + x, |_| 2.0)?;
  let exact_c = mesh.nodes().map(|_| 0.5);
  println!("(C) error = {:e}", (&u_c - exact_c).amax());

  println!("{:>8} {:>12} {:>12} {:>12}", "x", "u_a", "u_b", "u_c");
  for (i, x) in mesh.nodes().iter().enumerate() {
    println!("{x:>8.4} {:>12.6} {:>12.6} {:>12.6}", u_a[i], u_b[i], u_c[i]);
  }

  Ok(())
}
