use wolfe_ncg::WolfeLineSearch;

fn wolfe_with_tracking<P, D>(m: &WolfeLineSearch<f64>, phi: P, derphi: D)
where
    P: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut ev = vec![];

    let r = {
        let mut line = (|x: f64| { ev.push(x); phi(x) }, |x: f64| derphi(x));
        m.search_line(&mut line, None)
    };

    println!("Found step {:?}", r);
    println!("Function evaluations: {:?}", ev);
}

fn main() {
    env_logger::init();

    let m = WolfeLineSearch::new();
    // the unit step overshoots the minimum at 0.5
    println!("f(x) = x (x - 1)");
    wolfe_with_tracking(&m, |x| x * (x - 1.), |x| 2. * x - 1.);

    // the minimum is far away: the step is doubled until it is bracketed
    println!("f(x) = (x - 20)^2");
    wolfe_with_tracking(&m, |x| (x - 20.).powi(2), |x| 2. * (x - 20.));

    // local minima at 0.1 and 1.02
    let mut m = WolfeLineSearch::new();
    m.c2 = 0.01;
    println!("f'(x) = (x - 0.1) (x - 1) (x - 1.02)");
    wolfe_with_tracking(
        &m,
        |x| 0.25 * x.powi(4) - 0.7066666 * x.powi(3) + 0.611 * x * x - 0.102 * x,
        |x| (x - 0.1) * (x - 1.) * (x - 1.02),
    );

    // unbounded below: gives up after doubling the step `max_iter` times
    println!("f(x) = -x");
    wolfe_with_tracking(&m, |x| -x, |_| -1.);
}
