pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Gateway error ({operation}): {message}")]
    Gateway { operation: String, message: String },

    #[error("Malformed mind-map document: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Unknown case: {case_id}")]
    UnknownCase { case_id: String },
}

impl Error {
    /// Wraps a transport/backend failure reported by a gateway implementation.
    pub fn gateway(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
