//! Implementation of a nonlinear conjugate gradient method.
//!
//! Starting from the steepest descent direction, every iteration takes a
//! strong Wolfe step along the current direction and forms the next one as
//! `p_{k+1} = -g_{k+1} + β_k p_k`, with `β_k` given by the selected
//! `NonlinearCGMethod`.

use log::{log, warn, Level};
use num_traits::{Float, One, Zero};
use std::fmt;
use std::str::FromStr;

use crate::lin::Lin;
use crate::objective::{GradientFunction, Ray, ScalarFunction};
use crate::wolfe::{LineSearchWarning, WolfeLineSearch};

/// Implementation of a nonlinear conjugate gradient method.
#[derive(Debug, Clone)]
pub struct NonlinearCG<S: Float> {
    /// Nonlinear CG method
    pub method: NonlinearCGMethod,
    /// Parameters for the strong Wolfe line search
    pub line_method: WolfeLineSearch<S>,
    /// Desired norm of the gradient.
    /// Defaults to `1e-5` for `f64` and `1e-4` for `f32`: single precision
    /// gradients of well scaled problems rarely get below `1e-5`.
    pub grad_norm_tol: S,
    /// Maximum number of iterations to take
    pub max_iter: i32,
    /// Step taken when the line search finds no step at all
    pub fallback_alpha: S,
    /// Reset the direction to `-g` when the update does not give a descent direction.
    /// Off by default, so that the direction update is exactly `p = -g + β p`.
    pub restart_on_ascent: bool,
    /// Report every iteration at `info` level instead of `debug`
    pub verbose: bool,
}

/// Formula for the `beta` coefficient, with `y = g_{k+1} - g_k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonlinearCGMethod {
    /// Naive method of steepest descent: `β = 0`
    SteepestDescent,
    /// `β = g_{k+1}·g_{k+1} / g_k·g_k`
    FletcherReeves,
    /// `β = g_{k+1}·y / g_k·g_k`
    PolakRibiere,
    /// `β = y·g_{k+1} / y·p_k`
    HestenesStiefel,
    /// `β = g_{k+1}·g_{k+1} / y·p_k`
    DaiYuan,
    /// `β = (y·g_{k+1} - 2 (y·y) (p_k·g_{k+1}) / y·p_k) / y·p_k`, without truncation
    HagerZhang,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NonlinearCGError {
    #[error("method `{0}` is unrecognizable; try one of FR, PR, HS, DY, HZ, SD")]
    InvalidMethod(String),
    /// The objective value or the gradient stopped being finite.
    #[error("the objective is not finite at iteration {iteration}")]
    NonFinite { iteration: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The gradient norm dropped to `grad_norm_tol`
    Converged,
    /// `max_iter` iterations were taken
    MaxIterReached,
}

/// A line search warning raised during iteration `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationWarning {
    pub k: i32,
    pub warning: LineSearchWarning,
}

/// Information about a performed iteration of the nonlinear CG method
#[derive(Debug, Clone)]
pub struct NonlinearCGIteration<S> {
    /// Iteration number (indexed from 0)
    pub k: i32,
    /// Gradient norm at the new point
    pub grad_norm: S,
    /// Function value at the new point
    pub value: S,
    /// `beta` coefficient for the nonlinear CG search direction update
    pub beta: S,
    /// Step taken along the search direction
    pub alpha: S,
    /// Number of function and gradient evaluations by the line search
    pub line_eval_count: i32,
    /// The line search failed and `fallback_alpha` was used
    pub fallback: bool,
}

/// Result of a run of the nonlinear CG method.
#[derive(Debug, Clone)]
pub struct NonlinearCGSolution<V, S> {
    pub x: V,
    pub value: S,
    pub grad_norm: S,
    pub iterations: i32,
    pub termination: Termination,
    /// Every point visited, starting with `x0`
    pub points: Vec<V>,
    /// Function values recorded for `points`
    pub values: Vec<S>,
    pub warnings: Vec<IterationWarning>,
    /// Number of iterations that fell back to `fallback_alpha`
    pub fallback_steps: i32,
    /// Number of times the direction was reset to steepest descent
    pub restarts: i32,
}

impl<V, S> NonlinearCGSolution<V, S> {
    pub fn is_converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

impl FromStr for NonlinearCGMethod {
    type Err = NonlinearCGError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SD" => Ok(NonlinearCGMethod::SteepestDescent),
            "FR" => Ok(NonlinearCGMethod::FletcherReeves),
            "PR" => Ok(NonlinearCGMethod::PolakRibiere),
            "HS" => Ok(NonlinearCGMethod::HestenesStiefel),
            "DY" => Ok(NonlinearCGMethod::DaiYuan),
            "HZ" => Ok(NonlinearCGMethod::HagerZhang),
            _ => Err(NonlinearCGError::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for NonlinearCGMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            NonlinearCGMethod::SteepestDescent => "SD",
            NonlinearCGMethod::FletcherReeves => "FR",
            NonlinearCGMethod::PolakRibiere => "PR",
            NonlinearCGMethod::HestenesStiefel => "HS",
            NonlinearCGMethod::DaiYuan => "DY",
            NonlinearCGMethod::HagerZhang => "HZ",
        };
        f.write_str(tag)
    }
}

impl NonlinearCGMethod {
    /// The `beta` coefficient given the old gradient `g`, the new gradient `g_new`,
    /// their difference `y = g_new - g` and the old direction `p`.
    pub fn beta<V: Lin>(self, g: &V, g_new: &V, y: &V, p: &V) -> V::F {
        match self {
            NonlinearCGMethod::SteepestDescent => V::F::zero(),
            NonlinearCGMethod::FletcherReeves => g_new.norm_squared() / g.norm_squared(),
            NonlinearCGMethod::PolakRibiere => g_new.dot(y) / g.norm_squared(),
            NonlinearCGMethod::HestenesStiefel => y.dot(g_new) / y.dot(p),
            NonlinearCGMethod::DaiYuan => g_new.norm_squared() / y.dot(p),
            NonlinearCGMethod::HagerZhang => {
                let yp = y.dot(p);
                let two = V::F::one() + V::F::one();
                (y.dot(g_new) - two * y.norm_squared() * p.dot(g_new) / yp) / yp
            }
        }
    }
}

impl Default for NonlinearCG<f32> {
    fn default() -> Self {
        NonlinearCG {
            method: NonlinearCGMethod::FletcherReeves,
            line_method: WolfeLineSearch { c2: 0.1, ..Default::default() },
            grad_norm_tol: 1e-4,
            max_iter: 1000,
            fallback_alpha: 1e-4,
            restart_on_ascent: false,
            verbose: false,
        }
    }
}

impl Default for NonlinearCG<f64> {
    fn default() -> Self {
        NonlinearCG {
            method: NonlinearCGMethod::FletcherReeves,
            line_method: WolfeLineSearch { c2: 0.1, ..Default::default() },
            grad_norm_tol: 1e-5,
            max_iter: 1000,
            fallback_alpha: 1e-4,
            restart_on_ascent: false,
            verbose: false,
        }
    }
}

impl<S: Float> NonlinearCG<S> where Self: Default {
    /// Defaults for `f32` and `f64`: the Fletcher-Reeves method with `c2 = 0.1`
    pub fn new() -> Self {
        Default::default()
    }
}

impl<S: Float> NonlinearCG<S> {
    /// Mininimize the given nonlinear function over a linear space.
    ///
    /// `f` provides the function value and `grad` its gradient, returned in the
    /// provided `&mut V` (to avoid allocation).
    /// `x0` is used as the initial guess.
    ///
    /// Running out of iterations is not an error: check `termination` of the
    /// returned solution.
    pub fn minimize<V, Func, Grad>(&self, x0: &V, f: Func, grad: Grad)
                                   -> Result<NonlinearCGSolution<V, S>, NonlinearCGError>
        where V: Lin<F = S> + Clone,
              Func: ScalarFunction<V>,
              Grad: GradientFunction<V> {
        self.minimize_with_trace(x0, f, grad, |_, _| {})
    }

    /// The same as `minimize`, but allows to pass in a callback function that
    /// is called after every iteration.
    /// It is provided with the new point after the iteration is finished,
    /// and with additional information about the performed iteration.
    pub fn minimize_with_trace<V, Func, Grad, Callback>(&self,
                                                        x0: &V,
                                                        mut f: Func,
                                                        mut grad: Grad,
                                                        mut callback: Callback)
                                                        -> Result<NonlinearCGSolution<V, S>,
                                                                  NonlinearCGError>
        where V: Lin<F = S> + Clone,
              Func: ScalarFunction<V>,
              Grad: GradientFunction<V>,
              Callback: FnMut(&V, &NonlinearCGIteration<S>) {
        let level = if self.verbose { Level::Info } else { Level::Debug };

        // allocate storage
        let mut x = x0.clone();
        let mut g = x0.origin();
        let mut y = x0.origin();

        let mut fx = f.value(&x);
        grad.gradient(&x, &mut g);
        let mut grad_norm = g.norm();
        if !fx.is_finite() || !grad_norm.is_finite() {
            return Err(NonlinearCGError::NonFinite { iteration: 0 });
        }

        // steepest descent to start
        let mut p = g.clone();
        p.scale(-S::one());

        let mut points = vec![x.clone()];
        let mut values = vec![fx];
        let mut warnings = vec![];
        let mut fallback_steps = 0;
        let mut restarts = 0;
        let mut k = 0;

        log!(level, "[NCG {}] initial value {:?}, gradient norm {:?}",
             self.method, fx.to_f64(), grad_norm.to_f64());

        while grad_norm > self.grad_norm_tol && k < self.max_iter {
            // minimize along the ray
            let (r, line_eval_count, g_line) = {
                let mut ray = Ray::new(&x, &p, &mut f, &mut grad);
                let r = self.line_method.search_line(&mut ray, Some((fx, g.dot(&p))));
                let count = ray.eval_count();
                let g_line = r.alpha.and_then(|a| ray.take_gradient_at(a));
                (r, count, g_line)
            };
            if let Some(warning) = r.warning {
                warnings.push(IterationWarning { k, warning });
            }

            let (alpha, f_new, fallback) = match r.alpha {
                Some(alpha) => (alpha, r.phi, false),
                None => {
                    // the value is carried over without evaluating f at the new point
                    fallback_steps += 1;
                    warn!("[NCG {}] line search failed at iteration {}, taking step {:?}",
                          self.method, k, self.fallback_alpha.to_f64());
                    (self.fallback_alpha, fx, true)
                }
            };

            // update position
            x.ray_to(&p, alpha);
            let g_new = match g_line {
                Some(g_new) => g_new,
                None => {
                    let mut g_new = x.origin();
                    grad.gradient(&x, &mut g_new);
                    g_new
                }
            };
            let grad_norm_new = g_new.norm();

            // compute new direction
            y.clone_from(&g_new);
            y.ray_to(&g, -S::one());
            let mut beta = self.method.beta(&g, &g_new, &y, &p);
            p.combine(beta, &g_new, -S::one());

            if self.restart_on_ascent && grad_norm_new > self.grad_norm_tol
                && !(beta.is_finite() && p.dot(&g_new) < S::zero()) {
                warn!("[NCG {}] no descent direction at iteration {} (beta {:?}), restarting",
                      self.method, k, beta.to_f64());
                restarts += 1;
                beta = S::zero();
                p.clone_from(&g_new);
                p.scale(-S::one());
            }

            g = g_new;
            fx = f_new;
            grad_norm = grad_norm_new;
            k += 1;

            if !fx.is_finite() || !grad_norm.is_finite() {
                return Err(NonlinearCGError::NonFinite { iteration: k });
            }

            points.push(x.clone());
            values.push(fx);

            let info = NonlinearCGIteration {
                k: k - 1,
                grad_norm,
                value: fx,
                beta,
                alpha,
                line_eval_count,
                fallback,
            };
            log!(level, "[NCG {}] {:?}", self.method, info.to_f64());
            callback(&x, &info);
        }

        let termination = if grad_norm <= self.grad_norm_tol {
            log!(level, "[NCG {}] converged after {} iterations: value {:?}",
                 self.method, k, fx.to_f64());
            Termination::Converged
        } else {
            log!(level, "[NCG {}] no convergence after {} iterations: gradient norm {:?}",
                 self.method, k, grad_norm.to_f64());
            Termination::MaxIterReached
        };

        Ok(NonlinearCGSolution {
            x,
            value: fx,
            grad_norm,
            iterations: k,
            termination,
            points,
            values,
            warnings,
            fallback_steps,
            restarts,
        })
    }
}

impl<S: Float> NonlinearCGIteration<S> {
    // scalars as `f64` for logging: `Float` does not imply `Debug`
    fn to_f64(&self) -> NonlinearCGIteration<Option<f64>> {
        NonlinearCGIteration {
            k: self.k,
            grad_norm: self.grad_norm.to_f64(),
            value: self.value.to_f64(),
            beta: self.beta.to_f64(),
            alpha: self.alpha.to_f64(),
            line_eval_count: self.line_eval_count,
            fallback: self.fallback,
        }
    }
}
