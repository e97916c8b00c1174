//! Solver error types with transient/permanent classification.
//!
//! The gateway never retries; the classification is surfaced so the caller of the
//! whole pipeline can decide.

/// Error from a solver call.
#[derive(Debug, Clone)]
pub struct SolverError {
    /// The kind of error
    pub kind: SolverErrorKind,
    /// HTTP status code, if applicable
    pub status_code: Option<u16>,
    /// Error message
    pub message: String,
}

impl SolverError {
    /// Create a timeout error (the bounded wait expired).
    pub fn timeout(message: String) -> Self {
        Self {
            kind: SolverErrorKind::Timeout,
            status_code: None,
            message,
        }
    }

    /// Create a network error.
    pub fn network_error(message: String) -> Self {
        Self {
            kind: SolverErrorKind::NetworkError,
            status_code: None,
            message,
        }
    }

    /// Create a server error.
    pub fn server_error(status_code: u16, message: String) -> Self {
        Self {
            kind: SolverErrorKind::ServerError,
            status_code: Some(status_code),
            message,
        }
    }

    /// Create a client error (the solver rejected the task list).
    pub fn client_error(status_code: u16, message: String) -> Self {
        Self {
            kind: SolverErrorKind::ClientError,
            status_code: Some(status_code),
            message,
        }
    }

    /// Create an error for a reply that does not match the assignment schema.
    pub fn invalid_response(message: String) -> Self {
        Self {
            kind: SolverErrorKind::InvalidResponse,
            status_code: None,
            message,
        }
    }

    /// Build the error for a non-success HTTP status.
    pub fn from_status(status_code: u16, body: &str) -> Self {
        match classify_http_status(status_code) {
            SolverErrorKind::Timeout => Self {
                kind: SolverErrorKind::Timeout,
                status_code: Some(status_code),
                message: body.to_string(),
            },
            SolverErrorKind::ClientError => Self::client_error(status_code, body.to_string()),
            _ => Self::server_error(status_code, body.to_string()),
        }
    }

    /// Check if this error is transient.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == SolverErrorKind::Timeout
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "{} (HTTP {}): {}", self.kind, code, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for SolverError {}

/// Classification of solver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverErrorKind {
    /// Bounded wait expired - transient
    Timeout,
    /// Connection refused, DNS, reset - transient
    NetworkError,
    /// 5xx - transient
    ServerError,
    /// 4xx - permanent, the same task list will be rejected again
    ClientError,
    /// Reply body is not a valid assignment list - usually permanent
    InvalidResponse,
}

impl SolverErrorKind {
    /// Check if this error kind is transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SolverErrorKind::Timeout | SolverErrorKind::NetworkError | SolverErrorKind::ServerError
        )
    }
}

impl std::fmt::Display for SolverErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverErrorKind::Timeout => write!(f, "Solver timeout"),
            SolverErrorKind::NetworkError => write!(f, "Network error"),
            SolverErrorKind::ServerError => write!(f, "Solver error"),
            SolverErrorKind::ClientError => write!(f, "Request rejected by solver"),
            SolverErrorKind::InvalidResponse => write!(f, "Invalid solver response"),
        }
    }
}

/// Parse HTTP status code into error kind.
pub fn classify_http_status(status: u16) -> SolverErrorKind {
    match status {
        408 => SolverErrorKind::Timeout,
        400..=499 => SolverErrorKind::ClientError,
        _ => SolverErrorKind::ServerError,
    }
}
