use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Malformed input: missing required field, out-of-range coordinate,
    /// empty line-item list. Rejected before any write.
    #[error("{0}")]
    Validation(String),

    /// Unknown order/location/courier id, or no live tracking available.
    #[error("{0}")]
    NotFound(String),

    /// Reserved for concurrent-modification conflicts.
    #[error("{0}")]
    Conflict(String),

    /// Underlying database failure, connection exhaustion, or a rolled
    /// back transaction.
    #[error("error de almacenamiento: {0}")]
    Storage(String),
}

impl DeliveryError {
    /// HTTP status code this error maps to at the boundary.
    pub fn status(&self) -> u16 {
        match self {
            DeliveryError::Validation(_) => 400,
            DeliveryError::NotFound(_) => 404,
            DeliveryError::Conflict(_) => 409,
            DeliveryError::Storage(_) => 500,
        }
    }
}

impl From<sqlx::Error> for DeliveryError {
    fn from(err: sqlx::Error) -> Self {
        DeliveryError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeliveryError>;
