pub type StackdiagResult<T> = Result<T, StackdiagError>;

#[derive(thiserror::Error, Debug)]
pub enum StackdiagError {
    #[error("invalid count: {0} (must be within 1..={max})", max = crate::layout::stack::MAX_STACK_LEN)]
    InvalidCount(i64),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StackdiagError {
    /// Counts that do not fit in `i64` are reported as `i64::MAX`.
    pub fn invalid_count(count: impl TryInto<i64>) -> Self {
        Self::InvalidCount(count.try_into().unwrap_or(i64::MAX))
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
