//! Objective function capabilities and their restriction to a ray.

use crate::lin::Lin;

/// A scalar function on a linear space.
///
/// Implemented for every closure `FnMut(&V) -> V::F`.
pub trait ScalarFunction<V: Lin> {
    fn value(&mut self, x: &V) -> V::F;
}

/// The gradient of a `ScalarFunction`, written into `grad` to avoid allocation.
///
/// Implemented for every closure `FnMut(&V, &mut V)`.
/// Nothing checks that this really is the gradient of the objective.
pub trait GradientFunction<V: Lin> {
    fn gradient(&mut self, x: &V, grad: &mut V);
}

impl<V: Lin, Func> ScalarFunction<V> for Func
where
    Func: FnMut(&V) -> V::F,
{
    fn value(&mut self, x: &V) -> V::F {
        self(x)
    }
}

impl<V: Lin, Func> GradientFunction<V> for Func
where
    Func: FnMut(&V, &mut V),
{
    fn gradient(&mut self, x: &V, grad: &mut V) {
        self(x, grad)
    }
}

/// A function of one variable `ϕ` together with its derivative `ϕ'`.
///
/// A pair of closures `(ϕ, ϕ')` is a `LineFunction`.
pub trait LineFunction<S> {
    fn phi(&mut self, t: S) -> S;
    fn derphi(&mut self, t: S) -> S;
}

impl<S, P, D> LineFunction<S> for (P, D)
where
    P: FnMut(S) -> S,
    D: FnMut(S) -> S,
{
    fn phi(&mut self, t: S) -> S {
        (self.0)(t)
    }

    fn derphi(&mut self, t: S) -> S {
        (self.1)(t)
    }
}

/// Restriction of an objective to the ray `x + t p`:
/// `ϕ(t) = f(x + t p)` and `ϕ'(t) = ∇f(x + t p) · p`.
///
/// The last gradient evaluation is kept so that a caller who accepts the
/// step `t` can take the gradient at `x + t p` without evaluating it again.
pub struct Ray<'a, V: Lin, Func, Grad> {
    x: &'a V,
    p: &'a V,
    f: &'a mut Func,
    grad: &'a mut Grad,
    x_temp: V,
    grad_temp: V,
    grad_at: Option<V::F>,
    eval_count: i32,
}

impl<'a, V, Func, Grad> Ray<'a, V, Func, Grad>
where
    V: Lin + Clone,
    Func: ScalarFunction<V>,
    Grad: GradientFunction<V>,
{
    pub fn new(x: &'a V, p: &'a V, f: &'a mut Func, grad: &'a mut Grad) -> Self {
        Ray {
            x,
            p,
            f,
            grad,
            x_temp: x.clone(),
            grad_temp: x.origin(),
            grad_at: None,
            eval_count: 0,
        }
    }

    /// Number of evaluations of `f` and of its gradient so far.
    pub fn eval_count(&self) -> i32 {
        self.eval_count
    }

    /// Gradient at `x + t p` if it was the last gradient evaluated.
    pub fn take_gradient_at(self, t: V::F) -> Option<V> {
        match self.grad_at {
            Some(s) if s == t => Some(self.grad_temp),
            _ => None,
        }
    }

    fn move_to(&mut self, t: V::F) {
        self.x_temp.clone_from(self.x);
        self.x_temp.ray_to(self.p, t);
    }
}

impl<'a, V, Func, Grad> LineFunction<V::F> for Ray<'a, V, Func, Grad>
where
    V: Lin + Clone,
    Func: ScalarFunction<V>,
    Grad: GradientFunction<V>,
{
    fn phi(&mut self, t: V::F) -> V::F {
        self.eval_count += 1;
        self.move_to(t);
        self.f.value(&self.x_temp)
    }

    fn derphi(&mut self, t: V::F) -> V::F {
        self.eval_count += 1;
        self.move_to(t);
        self.grad.gradient(&self.x_temp, &mut self.grad_temp);
        self.grad_at = Some(t);
        self.grad_temp.dot(self.p)
    }
}
