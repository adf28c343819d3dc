use eqsolve::prelude::solve;

fn main() {
    let equations = ["x**2 - 1", "x^3 - 2", "exp(2*x) - 3*exp(x) + 2", "sin(x) = 1/2"];
    let var = "x";

    for equation in equations {
        match solve(equation, var) {
            Ok(lines) => println!("{equation}:\n  {}", lines.join("\n  ")),
            Err(err) => eprintln!("cannot solve {equation}: {err}"),
        }
    }
}
