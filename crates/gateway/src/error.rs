//! Generator failure classes.

/// Why a generator call failed.
///
/// This error never escapes the gateway:
/// [`PluginGateway::invoke`](crate::gateway::PluginGateway::invoke)
/// converts it into a placeholder artifact. The variants exist so the failure class is visible in logs
/// and rendered into the artifact itself.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}

impl GenerateError {
    /// Short class name rendered into the placeholder artifact header.
    pub fn class(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "missing credentials",
            Self::MissingInput(_) => "missing input",
            Self::Network(_) => "network error",
            Self::MalformedResponse(_) => "malformed response",
            Self::Timeout(_) => "timeout",
            Self::Other(_) => "generator error",
        }
    }
}
