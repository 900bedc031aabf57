use async_trait::async_trait;
use thiserror::Error;

/// Successful fragment fetch. A missing fragment is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FragmentResult {
    Markup(String),
    /// HTTP 404: the view exists in the nav but has no markup yet.
    Placeholder,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum LoadError {
    #[error("Failed to load view: {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("Failed to load view: {0}")]
    Network(String),
}

#[async_trait(?Send)]
pub(crate) trait FragmentSource {
    async fn fetch(&self, path: &str) -> Result<FragmentResult, LoadError>;
}

/// Maps a non-2xx status to its fragment outcome.
pub(crate) fn non_success_outcome(status: u16, reason: &str) -> Result<FragmentResult, LoadError> {
    if status == 404 {
        return Ok(FragmentResult::Placeholder);
    }

    Err(LoadError::Http {
        status,
        reason: reason.to_string(),
    })
}

/// Fetches fragments over HTTP from the same origin as the app.
#[derive(Clone, Default)]
pub(crate) struct HttpFragmentSource;

#[async_trait(?Send)]
impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, path: &str) -> Result<FragmentResult, LoadError> {
        let res = reqwest::Client::new()
            .get(path)
            .send()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return non_success_outcome(status.as_u16(), status.canonical_reason().unwrap_or(""));
        }

        let markup = res
            .text()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;
        Ok(FragmentResult::Markup(markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_is_placeholder_not_error() {
        assert_eq!(non_success_outcome(404, "Not Found"), Ok(FragmentResult::Placeholder));
    }

    #[test]
    fn test_500_is_load_failure_with_readable_message() {
        let err = non_success_outcome(500, "Internal Server Error").expect_err("500 must fail");
        assert_eq!(
            err,
            LoadError::Http {
                status: 500,
                reason: "Internal Server Error".to_string()
            }
        );
        assert_eq!(err.to_string(), "Failed to load view: 500 Internal Server Error");
    }

    #[test]
    fn test_other_4xx_fail() {
        assert!(non_success_outcome(403, "Forbidden").is_err());
        assert!(non_success_outcome(410, "Gone").is_err());
    }

    #[test]
    fn test_network_error_message() {
        let err = LoadError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Failed to load view: connection refused");
    }
}
