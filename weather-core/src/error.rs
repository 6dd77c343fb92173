use thiserror::Error;

/// Caller-facing outcome of a failed lookup.
///
/// `Upstream` renders a generic message; the underlying cause is only
/// reachable through [`std::error::Error::source`] and the service logs.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("City is required")]
    InvalidInput,

    #[error("upstream weather provider failed")]
    Upstream(#[source] anyhow::Error),
}

impl LookupError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput)
    }
}
