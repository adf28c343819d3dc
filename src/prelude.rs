//! String-based convenience API for quick experimentation.

pub use crate::ui::{
    diff, differentiate, dsolve, parse, roots, separate, simp, simplify, solve, solve_eqs,
    solve_system, solve_system_eqs,
};
