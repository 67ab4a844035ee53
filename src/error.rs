use thiserror::Error;

use crate::smt::SolverError;

/// Outcomes of a decision procedure that are neither "yes" nor "no".
#[derive(Debug, Error)]
pub enum Error {
    /// The solver could not decide the query.
    #[error("solver could not decide the query: {0}")]
    Unknown(String),

    /// The solver failed before producing an answer.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The requested encoding cannot express the input.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, Error>;
