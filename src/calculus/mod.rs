//! Differentiation, including applied undefined functions and unevaluated derivatives.

pub mod derivative;
pub mod differentiate;

pub use derivative::{diff, doit};
pub use differentiate::differentiate;
