//! Polynomial interpolants used to pick trial steps inside a bracket.
//!
//! Both functions return `None` when the interpolant has no usable
//! minimizer: coincident abscissas, vanishing leading coefficient, negative
//! discriminant, or any non-finite intermediate. Nothing non-finite ever
//! leaves this module.

use num_traits::Float;

fn finite<S: Float>(v: &[S]) -> bool {
    v.iter().all(|x| x.is_finite())
}

// `b` and `c` are numerically the same abscissa
fn coincident<S: Float>(b: S, c: S) -> bool {
    (b - c).abs() <= S::epsilon() * b.abs().max(c.abs())
}

/// Minimizer of the cubic through `(a, fa)`, `(b, fb)`, `(c, fc)` with slope `fpa` at `a`.
///
/// The cubic is `A (x-a)^3 + B (x-a)^2 + C (x-a) + D` with `C = fpa`, `D = fa`.
pub fn cubicmin<S: Float>(a: S, fa: S, fpa: S, b: S, fb: S, c: S, fc: S) -> Option<S> {
    let cc = fpa;
    let db = b - a;
    let dc = c - a;
    if db == S::zero() || dc == S::zero() || coincident(db, dc) {
        return None;
    }

    let denom = (db * dc).powi(2) * (db - dc);
    if denom == S::zero() || !finite(&[denom]) {
        return None;
    }

    let rb = fb - fa - cc * db;
    let rc = fc - fa - cc * dc;
    let aa = (dc.powi(2) * rb - db.powi(2) * rc) / denom;
    let bb = (-dc.powi(3) * rb + db.powi(3) * rc) / denom;
    if !finite(&[aa, bb]) || aa == S::zero() {
        return None;
    }

    let three = S::one() + S::one() + S::one();
    let radical = bb * bb - three * aa * cc;
    if !finite(&[radical]) || radical < S::zero() {
        return None;
    }

    let xmin = a + (-bb + radical.sqrt()) / (three * aa);
    if finite(&[xmin]) {
        Some(xmin)
    } else {
        None
    }
}

/// Minimizer of the quadratic through `(a, fa)`, `(b, fb)` with slope `fpa` at `a`.
pub fn quadmin<S: Float>(a: S, fa: S, fpa: S, b: S, fb: S) -> Option<S> {
    let db = b - a;
    if db == S::zero() {
        return None;
    }

    let bb = (fb - fa - fpa * db) / (db * db);
    if !finite(&[bb]) || bb == S::zero() {
        return None;
    }

    let two = S::one() + S::one();
    let xmin = a - fpa / (two * bb);
    if finite(&[xmin]) {
        Some(xmin)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn quadratic_is_exact() {
        // f(x) = 2 (x - 0.7)^2 - 1
        let f = |x: f64| 2. * (x - 0.7).powi(2) - 1.;
        let fp = |x: f64| 4. * (x - 0.7);
        let m = quadmin(0., f(0.), fp(0.), 2., f(2.)).unwrap();
        assert_relative_eq!(m, 0.7, epsilon = 1e-12);

        // the slope can be given at either end
        let m = quadmin(2., f(2.), fp(2.), -1., f(-1.)).unwrap();
        assert_relative_eq!(m, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn cubic_is_exact() {
        // f(x) = x^3 - 3 x has a local minimum at x = 1
        let f = |x: f64| x.powi(3) - 3. * x;
        let fp = |x: f64| 3. * x * x - 3.;
        let m = cubicmin(0.2, f(0.2), fp(0.2), 1.5, f(1.5), 3., f(3.)).unwrap();
        assert_relative_eq!(m, 1., epsilon = 1e-10);
    }

    #[test]
    fn degenerate_points() {
        // colinear data: no curvature, no minimizer
        assert_eq!(quadmin(0., 0., 1., 1., 1.), None);
        assert_eq!(cubicmin(0., 0., 1., 1., 1., 2., 2.), None);
        // coincident abscissas
        assert_eq!(quadmin(1., 0., 1., 1., 3.), None);
        assert_eq!(cubicmin(0., 0., -1., 1., 1., 1., 2.), None);
        assert_eq!(cubicmin(0., 0., -1., 0., 1., 1., 2.), None);
        // a concave quadratic has a maximum only (quadmin still returns the
        // stationary point), but a cubic with negative discriminant has none
        assert_eq!(cubicmin(0., 0., 1., 1., 2., -1., -2. / 3.), None);
    }

    #[test]
    fn overflow_is_trapped() {
        let big = f64::MAX / 4.;
        assert_eq!(quadmin(0., 0., -1., 1e-300, big), None);
        assert_eq!(cubicmin(0., 0., -1., 1e200, 1., 2e200, 3.), None);
        assert_eq!(quadmin(0., f64::NAN, -1., 1., 0.), None);
    }

    #[test]
    fn never_non_finite() {
        fn prop(a: f64, fa: f64, fpa: f64, b: f64, fb: f64, c: f64, fc: f64) -> bool {
            cubicmin(a, fa, fpa, b, fb, c, fc).map_or(true, |x| x.is_finite())
                && quadmin(a, fa, fpa, b, fb).map_or(true, |x| x.is_finite())
        }
        quickcheck(prop as fn(f64, f64, f64, f64, f64, f64, f64) -> bool);
    }

    #[test]
    fn quadmin_matches_vertex() {
        fn prop(a: i16, fpa: i16, b: i16) -> TestResult {
            let (a, fpa, b) = (a as f64 / 100., fpa as f64 / 100., b as f64 / 100.);
            if (a - b).abs() < 1. {
                return TestResult::discard();
            }
            // parabola with curvature 1 through (a, 0) with slope fpa
            let fb = 0.5 * (b - a).powi(2) + fpa * (b - a);
            match quadmin(a, 0., fpa, b, fb) {
                Some(x) => TestResult::from_bool((x - (a - fpa)).abs() <= 1e-6 * (1. + fpa.abs())),
                None => TestResult::failed(),
            }
        }
        quickcheck(prop as fn(i16, i16, i16) -> TestResult);
    }
}
