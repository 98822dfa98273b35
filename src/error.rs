/// Errors raised by the Calendly API client.
#[derive(Debug, thiserror::Error)]
pub enum CalendlyError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset, ...).
    #[error("request to Calendly failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Calendly answered with a status outside 200-299.
    /// `message` embeds both the status code and the raw response body.
    #[error("{message}")]
    Api {
        status: u16,
        status_text: String,
        message: String,
    },

    /// A successful response whose body does not match the expected shape.
    #[error("unexpected {what} payload from Calendly: {source}")]
    Schema {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl CalendlyError {
    /// Build an API error from a non-success response status and its body text.
    pub fn api(status: reqwest::StatusCode, body: &str) -> Self {
        CalendlyError::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            message: format!("Calendly API error {}: {body}", status.as_u16()),
        }
    }

    /// HTTP status of an upstream API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CalendlyError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience type alias for client calls.
pub type CalendlyResult<T> = Result<T, CalendlyError>;
