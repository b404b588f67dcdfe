use thiserror::Error;

/// Failure modes of a single fetch cycle.
///
/// All three collapse to one user-visible message via `Display`; the
/// distinction matters to tests and log output, not to the rendered screen.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The city name could not be turned into a valid request.
    #[error("invalid city name: {0}")]
    InvalidInput(String),

    /// Transport failure or a non-success response status.
    #[error("weather request failed: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("unexpected weather response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_failure() {
        let err = FetchError::InvalidInput("city name is empty".to_string());
        assert!(err.to_string().contains("invalid city name"));

        let err = FetchError::Network("connection refused".to_string());
        assert!(err.to_string().contains("weather request failed"));

        let err = FetchError::Decode("missing field `temp`".to_string());
        assert!(err.to_string().contains("unexpected weather response"));
    }
}
