use eqsolve::prelude::{dsolve, separate};

fn main() {
    let wave = "Derivative(u(x, t), x, 2) = Derivative(u(x, t), t, 2)";
    match separate(wave, "u(x, t)", &["X(x)", "T(t)"], "mul") {
        Ok(Some((lhs, rhs))) => println!("{wave}\n  {lhs} = {rhs}"),
        Ok(None) => println!("{wave} does not separate"),
        Err(err) => eprintln!("error: {err}"),
    }

    let coupled = "Derivative(u(x, t), x) = exp(u(x, t))*Derivative(u(x, t), t)";
    match separate(coupled, "u(x, t)", &["X(x)", "T(t)"], "add") {
        Ok(Some((lhs, rhs))) => println!("{coupled}\n  {lhs} = {rhs}"),
        Ok(None) => println!("{coupled} does not separate"),
        Err(err) => eprintln!("error: {err}"),
    }

    let ode = "Derivative(f(x), x, 2) + 2*Derivative(f(x), x) + 5*f(x) = 0";
    match dsolve(ode, "f(x)") {
        Ok(solution) => println!("{ode}\n  {solution}"),
        Err(err) => eprintln!("error: {err}"),
    }
}
