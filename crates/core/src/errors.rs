use thiserror::Error;

/// Unified error type for the sales-dashboard-core library.
/// Every fallible public function returns `Result<T, DashboardError>`.
#[derive(Debug, Error)]
pub enum DashboardError {
    // ── Session ─────────────────────────────────────────────────────
    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Session is blocked — authorization failed earlier")]
    SessionBlocked,

    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({endpoint}, status {status}): {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration / State ───────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DashboardError {
    /// Fatal errors end the session; everything else can be retried by
    /// re-applying filters or paginating again.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DashboardError::Auth(_) | DashboardError::SessionBlocked)
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        // Filter values (emails, phone numbers) travel in the query string,
        // so drop everything after '?' before the message reaches logs.
        DashboardError::Network(redact_query(&e.to_string()))
    }
}

/// Strip the query string from any URL embedded in `msg`.
pub fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => {
            let rest = &msg[idx..];
            // Keep whatever follows the URL (reqwest appends ")" or ": cause")
            let tail = rest
                .find(|c: char| c == ')' || c.is_whitespace())
                .map(|end| &rest[end..])
                .unwrap_or("");
            format!("{}?<query redacted>{}", &msg[..idx], tail)
        }
        None => msg.to_string(),
    }
}
