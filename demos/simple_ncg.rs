use wolfe_ncg::{NonlinearCG, NonlinearCGMethod, Rn};

fn quad2d(x: &Rn<f64>) -> f64 {
    assert_eq!(x.len(), 2);
    x[0].powi(2) + 10. * x[1].powi(2)
}

fn quad2d_grad(x: &Rn<f64>, grad: &mut Rn<f64>) {
    assert_eq!(x.len(), 2);
    assert_eq!(grad.len(), 2);

    grad[0] = 2. * x[0];
    grad[1] = 20. * x[1];
}

fn main() {
    env_logger::init();

    let m = NonlinearCG::new();

    let mut ev: Vec<f64> = vec![];

    let r = {
        let f = |x: &f64| { ev.push(*x); (x - 3.).powi(2) };
        m.minimize(&0f64, f, |x: &f64, grad: &mut f64| *grad = 2. * (x - 3.))
    };

    println!("f(x) = (x - 3)^2");
    match r {
        Ok(s) => println!("\tNCG result: x = {}, f(x) = {} ({:?})", s.x, s.value, s.termination),
        Err(e) => println!("\tNCG failed: {}", e),
    }
    println!("\tEvaluations: x = {:?}", ev);

    println!("f(x) = x1^2 + 10 x2^2");

    for method in &["FR", "PR", "HS", "DY", "HZ", "SD"] {
        let mut m = NonlinearCG::new();
        m.method = match method.parse::<NonlinearCGMethod>() {
            Ok(method) => method,
            Err(e) => {
                println!("{}", e);
                return;
            }
        };
        let x0 = Rn::new(vec![1., 1.]);
        let r = m.minimize_with_trace(&x0, quad2d, quad2d_grad, |x, info| {
            println!("\t{:?}, {:?}", x, info);
        });
        match r {
            Ok(s) => println!("{}: {} iterations, x = {:?}", method, s.iterations, s.x),
            Err(e) => println!("{}: {}", method, e),
        }
    }
}
