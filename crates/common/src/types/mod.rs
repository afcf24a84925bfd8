use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health probe body returned by `GET /health`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl Health {
    pub fn now() -> Self {
        Self { status: "healthy check is success", timestamp: Utc::now() }
    }
}
