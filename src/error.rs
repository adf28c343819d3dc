use thiserror::Error;

pub type Result<T> = std::result::Result<T, CasError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CasError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("equation is identically zero; every value of {symbol} is a solution")]
    Indeterminate { symbol: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("variable counts do not match: function has {expected}, separation has {found}")]
    VariableCountMismatch { expected: usize, found: usize },
    #[error("duplicate substitution arguments detected: {0}")]
    DuplicateArguments(String),
    #[error("separation arguments do not match the function arguments")]
    ArgumentMismatch,
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}
