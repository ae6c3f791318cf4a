/// Failure reported by any backing store.
///
/// Store messages are passed through to API callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("{0}")]
    Unavailable(String),
}
