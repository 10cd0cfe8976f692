//! Error types shared by the gateway, stores, and resource wrappers.

// =============================================================================
// STORE
// =============================================================================

/// Errors produced while persisting credentials.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The session file or its directory could not be written or removed.
    #[error("session store io failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored session could not be serialized.
    #[error("session store serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// API
// =============================================================================

/// Errors produced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network failure: {0}")]
    Network(String),

    /// The server rejected the credentials (HTTP 401).
    #[error("not authorized: {message}")]
    Unauthorized { message: String },

    /// The refresh endpoint refused to rotate the token pair.
    #[error("token refresh rejected: {0}")]
    RefreshRejected(String),

    /// Input was rejected locally before any request was sent.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The server returned a non-success status other than 401.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Credentials could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// `true` for errors that mean the server no longer accepts the session.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::RefreshRejected(_))
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
