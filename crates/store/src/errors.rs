use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("{message}")]
    Http { status: u16, message: String },
}

impl StoreError {
    /// Whether the upstream rejected a write for violating a unique
    /// constraint on a `code` column.
    pub fn is_duplicate_code(&self) -> bool {
        match self {
            StoreError::Http { message, .. } => {
                let lower = message.to_lowercase();
                lower.contains("duplicate") && lower.contains("code")
            }
            _ => false,
        }
    }
}
