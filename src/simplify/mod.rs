//! Symbolic simplification, expansion, substitution and rational-form utilities.

mod expand;
mod numer_denom;
mod rules;
mod substitute;

pub use expand::{
    ExpandHints, count_ops, expand, expand_complex, expand_log, expand_mul, expand_multinomial,
    expand_power_exp, expand_trig, expand_with,
};
pub use numer_denom::{as_numer_denom, together};
pub use rules::{
    simplify, simplify_add, simplify_div, simplify_fully, simplify_mul, simplify_neg, simplify_pow,
    simplify_product, simplify_sub, simplify_sum, simplify_with_limit,
};
pub use substitute::{substitute, substitute_expr, substitute_function};

pub(crate) use rules::{flatten_mul, flatten_sum, simplify_exp, split_coeff};
