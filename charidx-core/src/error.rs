use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpError>;

/// Failure vocabulary shared by every operation. Failures are always local
/// to a single call; the engine holds no state that could be poisoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    /// Malformed or out-of-domain parameter (empty needle, `n < 1`, ...).
    #[error("{0}")]
    InvalidArgument(String),
    /// A normalized index falls outside the valid bound.
    #[error("{0}")]
    IndexOutOfRange(String),
    /// Range start exceeds range end after normalization.
    #[error("start {start} exceeds end {end} after normalization")]
    InvalidRange { start: usize, end: usize },
    /// The requested occurrence ordinal exceeds the available matches.
    #[error("{0}")]
    NotFound(String),
    /// The regex pattern failed to compile.
    #[error("invalid regex pattern: {0}")]
    InvalidPattern(String),
}

impl OpError {
    /// Stable kind tag, prefixed onto rendered failures by the tool layer.
    pub fn kind(&self) -> &'static str {
        match self {
            OpError::InvalidArgument(_) => "InvalidArgument",
            OpError::IndexOutOfRange(_) => "IndexOutOfRange",
            OpError::InvalidRange { .. } => "InvalidRange",
            OpError::NotFound(_) => "NotFound",
            OpError::InvalidPattern(_) => "InvalidPattern",
        }
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        OpError::InvalidArgument(msg.into())
    }

    pub(crate) fn out_of_bounds(index: i64, len: usize) -> Self {
        OpError::IndexOutOfRange(format!("index {} out of bounds [0, {}]", index, len))
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        OpError::NotFound(msg.into())
    }
}
