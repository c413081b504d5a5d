//! Plots the points visited while minimizing the Rosenbrock function.
use gnuplot::{AxesCommon, Caption, Figure, PointSymbol};
use ndarray::{array, Array1};
use wolfe_ncg::{NonlinearCG, NonlinearCGMethod};

fn rosenbrock(x: &Array1<f64>) -> f64 {
    (1. - x[0]).powi(2) + 100. * (x[1] - x[0].powi(2)).powi(2)
}

fn rosenbrock_grad(x: &Array1<f64>, grad: &mut Array1<f64>) {
    grad[0] = -2. * (1. - x[0]) - 400. * x[0] * (x[1] - x[0].powi(2));
    grad[1] = 200. * (x[1] - x[0].powi(2));
}

fn main() {
    env_logger::init();

    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title("Rosenbrock function", &[])
            .set_x_label("x_1", &[])
            .set_y_label("x_2", &[]);

        let methods = [
            NonlinearCGMethod::FletcherReeves,
            NonlinearCGMethod::PolakRibiere,
            NonlinearCGMethod::HagerZhang,
        ];
        for &method in methods.iter() {
            let mut m = NonlinearCG::new();
            m.method = method;
            let s = match m.minimize(&array![-1.2, 1.0], rosenbrock, rosenbrock_grad) {
                Ok(s) => s,
                Err(e) => {
                    println!("{}: {}", method, e);
                    continue;
                }
            };
            println!("{}: {:?} after {} iterations, f = {:e}, {} fallback steps",
                     method, s.termination, s.iterations, s.value, s.fallback_steps);

            let caption = method.to_string();
            axes.lines_points(s.points.iter().map(|x| x[0]),
                              s.points.iter().map(|x| x[1]),
                              &[Caption(caption.as_str()), PointSymbol('O')]);
        }
    }
    if let Err(e) = fg.show() {
        println!("Error: {:?}", e);
    }
}
