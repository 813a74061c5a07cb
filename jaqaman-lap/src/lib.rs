//! # Jaqaman LAP
//!
//! Frame to frame linking as a linear assignment problem, following Jaqaman et al. (2008).
//!
//! Linking `n` sources to `m` targets is not a plain assignment: some sources have no
//! counterpart and some targets appear from nowhere. The problem is therefore expanded to an
//! `(n + m) x (n + m)` matrix where every object may alternatively be linked to "nothing":
//!
//! ```text
//!              m targets        n no-link
//!          +---------------+---------------+
//! n        |  link costs   |  alternative  |
//! sources  |  (sparse)     |  (diagonal)   |
//!          +---------------+---------------+
//! m        |  alternative  |  link costs^T |
//! no-link  |  (diagonal)   |  (min cost)   |
//!          +---------------+---------------+
//! ```
//!
//! Only link costs below a threshold are kept, so only sources and targets that have at least
//! one possible link take part. The alternative cost is a multiple of the largest kept cost
//! (or of a percentile of them), which makes "no link" worse than any plausible link. The
//! bottom right block makes the problem symmetric so an optimal solution always exists.
//!
//! [`LinkingCostMatrix`] builds the matrix from a cost function, [`JaqamanLinker`] solves it
//! with [`solve_lap`] and reports the accepted links.

mod cost_matrix;
mod lap;
mod linker;

pub use cost_matrix::*;
pub use lap::*;
pub use linker::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("there are no costs to link")]
    EmptyCosts,
    #[error("expected {expected} entries but got {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("cost {0} is not a finite non-negative number")]
    InvalidCost(f64),
    #[error("alternative cost factor {0} must be finite and positive")]
    InvalidAlternativeFactor(f64),
    #[error("percentile {0} must lie in (0, 1]")]
    InvalidPercentile(f64),
    #[error("assignment matrix must be square but is {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("no complete assignment exists for the given costs")]
    Infeasible,
    #[error("input must be checked before processing")]
    NotValidated,
}
