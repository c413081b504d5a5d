//! Nonlinear conjugate gradient minimization with a strong Wolfe line search.
//!
//! ```rust
//! use wolfe_ncg::{Lin, NonlinearCG, NonlinearCGMethod, Rn};
//!
//! let mut m = NonlinearCG::new();
//! m.method = NonlinearCGMethod::PolakRibiere;
//!
//! let f = |x: &Rn<f64>| x[0].powi(2) + 10. * x[1].powi(2);
//! let grad = |x: &Rn<f64>, g: &mut Rn<f64>| {
//!     g[0] = 2. * x[0];
//!     g[1] = 20. * x[1];
//! };
//! let r = m.minimize(&Rn::new(vec![1., 1.]), f, grad).unwrap();
//!
//! assert!(r.is_converged());
//! assert!(r.x.norm() < 1e-5);
//! ```

mod interp;
mod lin;
mod ncg;
mod objective;
mod wolfe;

pub use interp::{cubicmin, quadmin};
pub use lin::{Lin, Rn};
pub use ncg::{IterationWarning, NonlinearCGSolution, Termination};
pub use ncg::{NonlinearCG, NonlinearCGError, NonlinearCGIteration, NonlinearCGMethod};
pub use objective::{GradientFunction, LineFunction, Ray, ScalarFunction};
pub use wolfe::{LineSearchResult, LineSearchWarning, WolfeLineSearch};
