//! Line search for a step satisfying the strong Wolfe conditions.
//!
//! The search expands the trial step from `1` (doubling it) until it
//! brackets an acceptable step, and then narrows the bracket in `zoom` by
//! cubic and quadratic interpolation with a bisection fallback
//! (Nocedal & Wright, _Numerical Optimization_, Algorithms 3.5 and 3.6).
//!
//! A step `α` is accepted when
//!
//!   - `ϕ(α) ≤ ϕ(0) + c1 α ϕ'(0)` (sufficient decrease), and
//!   - `|ϕ'(α)| ≤ -c2 ϕ'(0)` (curvature).

use log::{debug, warn};
use num_traits::Float;

use crate::interp::{cubicmin, quadmin};
use crate::lin::Lin;
use crate::objective::{GradientFunction, LineFunction, Ray, ScalarFunction};

/// Parameters of the strong Wolfe line search.
#[derive(Debug, Clone)]
pub struct WolfeLineSearch<S: Float> {
    /// Sufficient decrease (Armijo) constant `c1`
    pub c1: S,
    /// Curvature constant `c2`; `c1 < c2 < 1`
    pub c2: S,
    /// Largest step the search may try
    pub amax: Option<S>,
    /// Maximum number of bracket expansions
    pub max_iter: i32,
    /// Maximum number of zoom rounds
    pub zoom_max_iter: i32,
    /// Cubic interpolant is rejected within `delta1 * |hi - lo|` of the bracket ends
    pub delta1: S,
    /// Quadratic interpolant is rejected within `delta2 * |hi - lo|` of the bracket ends
    pub delta2: S,
}

/// Reasons for a line search to stop without an acceptable step.
///
/// These are reported alongside the result, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LineSearchWarning {
    #[error("rounding errors prevent the line search from converging")]
    ZeroStep,
    #[error("the line search could not find a solution less than or equal to amax")]
    StepLimit,
    #[error("zoom did not find a conforming step in {0} iterations")]
    ZoomMaxIterReached(i32),
    #[error("the line search did not converge in {0} iterations")]
    MaxIterReached(i32),
}

/// Outcome of a line search.
///
/// `alpha` is `None` if no step was found; `phi` is then `ϕ(0)`.
/// `derphi` is `None` whenever the step does not satisfy the strong Wolfe
/// conditions, which includes the best-effort step returned when the
/// bracket expansion runs out of iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearchResult<S> {
    pub alpha: Option<S>,
    pub phi: S,
    pub derphi: Option<S>,
    pub warning: Option<LineSearchWarning>,
}

impl<S> LineSearchResult<S> {
    fn converged(alpha: S, phi: S, derphi: S) -> Self {
        LineSearchResult {
            alpha: Some(alpha),
            phi,
            derphi: Some(derphi),
            warning: None,
        }
    }

    fn failed(phi0: S, warning: LineSearchWarning) -> Self {
        warn!("{}", warning);
        LineSearchResult {
            alpha: None,
            phi: phi0,
            derphi: None,
            warning: Some(warning),
        }
    }

    /// The step satisfies the strong Wolfe conditions.
    pub fn is_converged(&self) -> bool {
        self.alpha.is_some() && self.derphi.is_some()
    }
}

impl Default for WolfeLineSearch<f32> {
    fn default() -> Self {
        WolfeLineSearch {
            c1: 1e-4,
            c2: 0.9,
            amax: None,
            max_iter: 10,
            zoom_max_iter: 10,
            delta1: 0.2,
            delta2: 0.1,
        }
    }
}

impl Default for WolfeLineSearch<f64> {
    fn default() -> Self {
        WolfeLineSearch {
            c1: 1e-4,
            c2: 0.9,
            amax: None,
            max_iter: 10,
            zoom_max_iter: 10,
            delta1: 0.2,
            delta2: 0.1,
        }
    }
}

impl<S: Float> WolfeLineSearch<S> where Self: Default {
    /// Defaults: `c1 = 1e-4`, `c2 = 0.9`, no step limit, 10 iterations each stage
    pub fn new() -> Self {
        Default::default()
    }
}

/// Interval in step space containing a strong Wolfe point.
///
/// `lo` satisfies sufficient decrease and has the lowest `ϕ` seen so far
/// among such points, and `ϕ'(lo) (hi - lo) < 0`. `lo > hi` is allowed.
/// `rec` is the most recently discarded end point, used as the third point
/// of the cubic interpolant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bracket<S> {
    pub lo: S,
    pub hi: S,
    pub phi_lo: S,
    pub phi_hi: S,
    pub derphi_lo: S,
    pub rec: S,
    pub phi_rec: S,
}

impl<S: Float> Bracket<S> {
    fn new(lo: S, hi: S, phi_lo: S, phi_hi: S, derphi_lo: S, phi0: S) -> Self {
        Bracket {
            lo,
            hi,
            phi_lo,
            phi_hi,
            derphi_lo,
            rec: S::zero(),
            phi_rec: phi0,
        }
    }

    // Trial step: cubic interpolant (after the first round), then quadratic,
    // then the midpoint, taking the first one far enough from the ends.
    fn trial(&self, round: i32, delta1: S, delta2: S) -> S {
        let dalpha = self.hi - self.lo;
        let (a, b) = if dalpha < S::zero() {
            (self.hi, self.lo)
        } else {
            (self.lo, self.hi)
        };
        let width = dalpha.abs();
        let inside = |x: S, margin: S| a + margin <= x && x <= b - margin;

        if round > 0 {
            let c = cubicmin(self.lo, self.phi_lo, self.derphi_lo,
                             self.hi, self.phi_hi, self.rec, self.phi_rec);
            match c {
                Some(x) if inside(x, delta1 * width) => return x,
                _ => (),
            }
        }

        match quadmin(self.lo, self.phi_lo, self.derphi_lo, self.hi, self.phi_hi) {
            Some(x) if inside(x, delta2 * width) => x,
            _ => {
                debug!("[zoom] interpolation rejected, bisecting");
                self.lo + (S::one() / (S::one() + S::one())) * dalpha
            }
        }
    }

    // `aj` is no better than `lo`: it becomes the new `hi`.
    fn shrink(&mut self, aj: S, phi_aj: S) {
        self.rec = self.hi;
        self.phi_rec = self.phi_hi;
        self.hi = aj;
        self.phi_hi = phi_aj;
    }

    // `aj` is the new `lo`; `hi` flips to the old `lo` if the slope at `aj`
    // points towards `hi`.
    fn advance(&mut self, aj: S, phi_aj: S, derphi_aj: S) {
        if derphi_aj * (self.hi - self.lo) >= S::zero() {
            self.rec = self.hi;
            self.phi_rec = self.phi_hi;
            self.hi = self.lo;
            self.phi_hi = self.phi_lo;
        } else {
            self.rec = self.lo;
            self.phi_rec = self.phi_lo;
        }
        self.lo = aj;
        self.phi_lo = phi_aj;
        self.derphi_lo = derphi_aj;
    }
}

impl<S: Float> WolfeLineSearch<S> {
    /// Find a step along the direction `p` from `x` satisfying the strong Wolfe conditions
    /// for the objective `f` with gradient `grad`.
    ///
    /// `p` should be a descent direction.
    pub fn search<V, Func, Grad>(&self, f: &mut Func, grad: &mut Grad, x: &V, p: &V)
                                 -> LineSearchResult<S>
        where V: Lin<F = S> + Clone,
              Func: ScalarFunction<V>,
              Grad: GradientFunction<V> {
        let mut ray = Ray::new(x, p, f, grad);
        self.search_line(&mut ray, None)
    }

    /// Find a step satisfying the strong Wolfe conditions for the function of one
    /// variable `line`.
    ///
    ///   - `ϕ'(0)` should be negative.
    ///   - `hint` may contain the value `(ϕ(0), ϕ'(0))` to avoid unnecessary evaluation if
    ///     this value is already known (as is the case of the `NonlinearCG` minimization method).
    pub fn search_line<L>(&self, line: &mut L, hint: Option<(S, S)>) -> LineSearchResult<S>
        where L: LineFunction<S> {
        let zero = S::zero();
        let one = S::one();

        let (phi0, derphi0) = match hint {
            Some(h) => h,
            None => (line.phi(zero), line.derphi(zero)),
        };
        let armijo = |alpha: S| phi0 + self.c1 * alpha * derphi0;

        let mut alpha0 = zero;
        let mut alpha1 = self.amax.map_or(one, |m| m.min(one));
        let mut phi_a0 = phi0;
        let mut phi_a1 = line.phi(alpha1);
        let mut derphi_a0 = derphi0;

        for i in 0..self.max_iter {
            if alpha1 == zero {
                return LineSearchResult::failed(phi0, LineSearchWarning::ZeroStep);
            }
            if self.amax == Some(alpha0) {
                return LineSearchResult::failed(phi0, LineSearchWarning::StepLimit);
            }

            // written so that a NaN value also counts as a violation
            if !(phi_a1 <= armijo(alpha1)) || (phi_a1 >= phi_a0 && i > 0) {
                debug!("[Wolfe] bracketed in ({:?}, {:?})", alpha0.to_f64(), alpha1.to_f64());
                let bracket = Bracket::new(alpha0, alpha1, phi_a0, phi_a1, derphi_a0, phi0);
                return self.zoom(bracket, line, phi0, derphi0, &mut |_: &Bracket<S>| {});
            }

            let derphi_a1 = line.derphi(alpha1);
            if derphi_a1.abs() <= -self.c2 * derphi0 {
                return LineSearchResult::converged(alpha1, phi_a1, derphi_a1);
            }

            if derphi_a1 >= zero {
                debug!("[Wolfe] overshot, bracketed in ({:?}, {:?})",
                       alpha1.to_f64(), alpha0.to_f64());
                let bracket = Bracket::new(alpha1, alpha0, phi_a1, phi_a0, derphi_a1, phi0);
                return self.zoom(bracket, line, phi0, derphi0, &mut |_: &Bracket<S>| {});
            }

            let mut alpha2 = (one + one) * alpha1;
            if let Some(m) = self.amax {
                alpha2 = alpha2.min(m);
            }
            alpha0 = alpha1;
            alpha1 = alpha2;
            phi_a0 = phi_a1;
            phi_a1 = line.phi(alpha1);
            derphi_a0 = derphi_a1;
        }

        let warning = LineSearchWarning::MaxIterReached(self.max_iter);
        warn!("{}", warning);
        LineSearchResult {
            alpha: Some(alpha1),
            phi: phi_a1,
            derphi: None,
            warning: Some(warning),
        }
    }

    // Zoom stage: narrow `bracket` until a strong Wolfe point is found.
    //
    // `trace` sees the bracket at the start of every round.
    pub(crate) fn zoom<L, Trace>(&self,
                                 mut bracket: Bracket<S>,
                                 line: &mut L,
                                 phi0: S,
                                 derphi0: S,
                                 trace: &mut Trace) -> LineSearchResult<S>
        where L: LineFunction<S>,
              Trace: FnMut(&Bracket<S>) {
        for round in 0..self.zoom_max_iter {
            trace(&bracket);

            let aj = bracket.trial(round, self.delta1, self.delta2);
            let phi_aj = line.phi(aj);

            if !(phi_aj <= phi0 + self.c1 * aj * derphi0) || phi_aj >= bracket.phi_lo {
                bracket.shrink(aj, phi_aj);
                continue;
            }

            let derphi_aj = line.derphi(aj);
            if derphi_aj.abs() <= -self.c2 * derphi0 {
                debug!("[zoom] accepted step {:?} after {} rounds", aj.to_f64(), round + 1);
                return LineSearchResult::converged(aj, phi_aj, derphi_aj);
            }
            bracket.advance(aj, phi_aj, derphi_aj);
        }

        LineSearchResult::failed(phi0, LineSearchWarning::ZoomMaxIterReached(self.zoom_max_iter))
    }
}
