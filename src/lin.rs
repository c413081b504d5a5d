//! Implementation of a basic linear space trait.
//!
//! The optimizer only needs a handful of vector operations, all of which are
//! provided by `Lin`. Implementations are given for the scalars `f32`/`f64`
//! (one-dimensional problems), for `Rn<F>` and for `ndarray::Array1<F>`.
//!
//! ```rust
//! use wolfe_ncg::{Lin, Rn};
//!
//! let x = Rn::new(vec![1.,2.]);
//! let y = Rn::new(vec![2.,-3.]);
//!
//! assert_eq!(x.dot(&y), -4.);
//! assert_eq!(Rn::new(vec![3., -1.]), x.clone() + y);
//! assert_eq!(Rn::new(vec![2., 4.]), x * 2.);
//! ```
use ndarray::Array1;
use num_traits::{Float, One, Zero};
use std::iter::repeat;
use std::ops::{Add, Deref, DerefMut, Mul};

/// Trait defining basic operations for an element of a linear space.
///
/// The focus is on operations _in place_: methods that return a `Lin` object
/// modify the object in place.
pub trait Lin {
    /// Scalars for this linear space.
    type F: Float;

    /// Dot product (inner product).
    fn dot(&self, other: &Self) -> Self::F;

    /// Multiplication by a constant.
    fn scale(&mut self, a: Self::F) -> &mut Self;

    /// Adds a vector multiplied by a constant to this vector: `self += t * other`.
    fn ray_to(&mut self, other: &Self, t: Self::F) -> &mut Self;

    /// Return the origin of the vector space to which self belongs too.
    fn origin(&self) -> Self;

    /// Euclidean norm of the vector.
    fn norm(&self) -> Self::F {
        self.norm_squared().sqrt()
    }

    /// Square of the norm.
    fn norm_squared(&self) -> Self::F {
        self.dot(self)
    }

    /// Distance between two vectors.
    ///
    /// Default implementation uses
    /// `|x - v| = sqrt(x.x - 2 x.y + y.y)`
    /// to avoid copying.
    /// Therefore it is recommended to reimplement this method.
    fn dist(&self, other: &Self) -> Self::F {
        (self.norm_squared() + other.norm_squared()
            - (Self::F::one() + Self::F::one()) * self.dot(other))
        .max(Self::F::zero())
        .sqrt()
    }

    /// Adds a vector to this vector.
    fn add_mut(&mut self, other: &Self) -> &mut Self {
        self.ray_to(other, Self::F::one())
    }

    /// Creates a linear combination `self = a * self + b * other`.
    fn combine(&mut self, a: Self::F, other: &Self, b: Self::F) -> &mut Self {
        self.scale(a).ray_to(other, b)
    }
}

/// An implementation of the Lin trait: an n-dimensional real vector.
///
/// Backed by a `Vec<F>`, where `F` is `Float`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rn<F: Float> {
    vec: Vec<F>,
}

impl<F: Float> Rn<F> {
    pub fn new(v: Vec<F>) -> Self {
        Rn { vec: v }
    }
}

impl<F: Float> Deref for Rn<F> {
    type Target = Vec<F>;

    fn deref(&self) -> &Vec<F> {
        &self.vec
    }
}

impl<F: Float> DerefMut for Rn<F> {
    fn deref_mut(&mut self) -> &mut Vec<F> {
        &mut self.vec
    }
}

impl<F: Float> Mul<F> for Rn<F> {
    type Output = Rn<F>;

    fn mul(mut self, other: F) -> Self {
        self.scale(other);
        self
    }
}

impl<F: Float> Add for Rn<F> {
    type Output = Rn<F>;

    fn add(mut self, other: Self) -> Self {
        self.add_mut(&other);
        self
    }
}

impl<F: Float> Lin for Rn<F> {
    type F = F;

    fn dist(&self, other: &Self) -> F {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(F::zero(), |sum, (&x, &y)| sum + (x - y).powi(2))
            .sqrt()
    }

    fn dot(&self, other: &Self) -> F {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(F::zero(), |sum, (&x, &y)| sum + x * y)
    }

    fn scale(&mut self, a: F) -> &mut Self {
        for x in self.iter_mut() {
            *x = *x * a;
        }
        self
    }

    fn combine(&mut self, a: F, other: &Self, b: F) -> &mut Self {
        assert_eq!(self.len(), other.len());
        for (x, y) in self.iter_mut().zip(other.iter()) {
            *x = *x * a + *y * b;
        }
        self
    }

    fn ray_to(&mut self, other: &Self, b: F) -> &mut Self {
        assert_eq!(self.len(), other.len());
        for (x, y) in self.iter_mut().zip(other.iter()) {
            *x = *x + *y * b;
        }
        self
    }

    fn origin(&self) -> Self {
        Rn::new(repeat(F::zero()).take(self.len()).collect())
    }
}

impl<F: Float> Lin for Array1<F> {
    type F = F;

    fn dot(&self, other: &Self) -> F {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(F::zero(), |sum, (&x, &y)| sum + x * y)
    }

    fn dist(&self, other: &Self) -> F {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(F::zero(), |sum, (&x, &y)| sum + (x - y).powi(2))
            .sqrt()
    }

    fn scale(&mut self, a: F) -> &mut Self {
        self.mapv_inplace(|x| x * a);
        self
    }

    fn combine(&mut self, a: F, other: &Self, b: F) -> &mut Self {
        assert_eq!(self.len(), other.len());
        self.zip_mut_with(other, |x, &y| *x = *x * a + y * b);
        self
    }

    fn ray_to(&mut self, other: &Self, b: F) -> &mut Self {
        assert_eq!(self.len(), other.len());
        self.zip_mut_with(other, |x, &y| *x = *x + y * b);
        self
    }

    fn origin(&self) -> Self {
        Array1::zeros(self.len())
    }
}

// Scalars as elements of a one-dimensional linear space over themselves.
macro_rules! impl_lin_for_scalar {
    ($($t:ty),*) => {$(
        impl Lin for $t {
            type F = $t;

            fn dot(&self, other: &Self) -> $t {
                *self * *other
            }

            fn scale(&mut self, a: $t) -> &mut Self {
                *self *= a;
                self
            }

            fn combine(&mut self, a: $t, other: &Self, b: $t) -> &mut Self {
                *self = *self * a + *other * b;
                self
            }

            fn ray_to(&mut self, other: &Self, b: $t) -> &mut Self {
                *self += *other * b;
                self
            }

            fn origin(&self) -> Self {
                0.
            }

            fn dist(&self, other: &Self) -> $t {
                (*self - *other).abs()
            }

            fn norm(&self) -> $t {
                self.abs()
            }
        }
    )*};
}

impl_lin_for_scalar!(f32, f64);

#[cfg(test)]
mod test {
    use super::Lin;
    use super::Rn;
    use ndarray::{array, Array1};
    use quickcheck::quickcheck;
    use std::cmp::min;

    // relative error: this shouldn't be to small
    const EPS: f64 = 1e-10;

    fn eps_eq(a: f64, b: f64) -> bool {
        let m = a.abs() + b.abs();
        (a - b).abs() <= EPS * m
    }

    // quickcheck generates NaN, infinities and values whose squares overflow
    fn tame(x: f64) -> f64 {
        if x.is_finite() { x % 1e6 } else { 0. }
    }

    fn trunc(v: Vec<f64>, w: Vec<f64>) -> (Rn<f64>, Rn<f64>) {
        let mut v = Rn::new(v.into_iter().map(tame).collect());
        let mut w = Rn::new(w.into_iter().map(tame).collect());
        let l = min(v.len(), w.len());
        v.truncate(l);
        w.truncate(l);
        (v, w)
    }

    #[test]
    fn test_lin_f64() {
        fn prop(a: f64, b: f64, c: f64) -> bool {
            let (a, b, c) = (tame(a), tame(b), tame(c));
            let mut d = a;
            d.ray_to(&b, c);
            eps_eq(a.norm(), a.dist(&a.origin()))
                && eps_eq(d.dot(&a), a.norm_squared() + c * a * b)
        }

        quickcheck(prop as fn(f64, f64, f64) -> bool);
        let mut a = 1.;
        a.combine(2., &3., 4.);
        assert_eq!(a.norm(), 1. * 2. + 3. * 4.);
    }

    #[test]
    fn scale_norm_zero() {
        fn prop(v: Vec<f64>) -> bool {
            let mut v = Rn::new(v.into_iter().map(tame).collect());
            eps_eq(0., v.scale(0.).norm())
        }
        quickcheck(prop as fn(Vec<f64>) -> bool);
    }

    #[test]
    fn dot_equal_norm_squared() {
        fn prop(v: Vec<f64>) -> bool {
            let v = Rn::new(v.into_iter().map(tame).collect());
            eps_eq(v.dot(&v), v.norm().powi(2))
        }
        quickcheck(prop as fn(Vec<f64>) -> bool);
    }

    #[test]
    fn dist_norm() {
        fn prop(v: Vec<f64>, w: Vec<f64>) -> bool {
            let (mut v, w) = trunc(v, w);

            let d = v.dist(&w);
            v.ray_to(&w, -1.);

            eps_eq(d, v.norm())
        }
        quickcheck(prop as fn(Vec<f64>, Vec<f64>) -> bool);
    }

    #[test]
    fn array_matches_rn() {
        fn prop(v: Vec<f64>, w: Vec<f64>, a: f64) -> bool {
            let (mut v, w) = trunc(v, w);
            let a = tame(a);
            let mut av = Array1::from(v.to_vec());
            let aw = Array1::from(w.to_vec());

            v.combine(a, &w, 2.5);
            av.combine(a, &aw, 2.5);

            v.iter().zip(av.iter()).all(|(x, y)| x == y)
                && eps_eq(v.norm_squared(), av.norm_squared())
        }
        quickcheck(prop as fn(Vec<f64>, Vec<f64>, f64) -> bool);
    }

    #[test]
    fn array_origin_and_dist() {
        let x = array![3., 4.];
        let o = x.origin();
        assert_eq!(o, array![0., 0.]);
        assert_eq!(x.dist(&o), 5.);
        assert_eq!(x.norm(), 5.);
    }

    #[test]
    fn default_dist_never_nan() {
        // the in-place formula can round to a tiny negative number
        struct Pt(f64);
        impl Lin for Pt {
            type F = f64;
            fn dot(&self, other: &Self) -> f64 {
                self.0 * other.0
            }
            fn scale(&mut self, a: f64) -> &mut Self {
                self.0 *= a;
                self
            }
            fn ray_to(&mut self, other: &Self, t: f64) -> &mut Self {
                self.0 += t * other.0;
                self
            }
            fn origin(&self) -> Self {
                Pt(0.)
            }
        }
        let d = Pt(0.1 + 0.2).dist(&Pt(0.3));
        assert!(!d.is_nan());
        assert!(d < 1e-7);
    }
}
