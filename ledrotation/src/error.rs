//! Types d'erreurs pour ledrotation

/// Erreurs de navigation et de configuration de la rotation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("No dashboard available in the rotation")]
    EmptyRegistry,

    #[error("Dashboard index {index} out of range (0..{len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Dashboard not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration patch: {0}")]
    InvalidPatch(String),
}

/// Type Result spécialisé pour ledrotation
pub type Result<T> = std::result::Result<T, Error>;
