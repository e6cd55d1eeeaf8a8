use reqwest::StatusCode;

/// Errors raised by a vision provider adapter.
///
/// Status-derived variants keep the provider name so logs say which
/// service rejected the request. Wrapped `reqwest` errors carry no URL.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("{provider} rejected the credential (401 Unauthorized): {body}")]
    Unauthorized { provider: &'static str, body: String },

    #[error("{provider} rate limit exceeded (429 Too Many Requests): {body}")]
    RateLimited { provider: &'static str, body: String },

    #[error("{provider} rejected the request as malformed (400 Bad Request): {body}")]
    BadRequest { provider: &'static str, body: String },

    #[error("{provider} request failed: {status} - {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{provider} reported an error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    #[error("invalid {provider} credential: {reason}")]
    InvalidCredential {
        provider: &'static str,
        reason: String,
    },

    #[error("failed to reach {provider}: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {provider} response: {source}")]
    Parse {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl VisionError {
    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(provider: &'static str, status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized { provider, body },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { provider, body },
            StatusCode::BAD_REQUEST => Self::BadRequest { provider, body },
            _ => Self::Status {
                provider,
                status,
                body,
            },
        }
    }

    /// HTTP status behind this error, when the transport exposed one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::BadRequest { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            Self::Api { .. } | Self::InvalidCredential { .. } | Self::Parse { .. } => None,
        }
    }
}

/// Send a prepared request and turn non-2xx responses into [`VisionError`].
pub(crate) async fn send(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, VisionError> {
    let response = request
        .send()
        .await
        .map_err(|source| VisionError::Transport {
            provider,
            source: source.without_url(),
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(VisionError::from_status(provider, status, body));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let err = VisionError::from_status("google", StatusCode::UNAUTHORIZED, "bad key".into());
        assert!(matches!(err, VisionError::Unauthorized { .. }));
        assert!(err.to_string().contains("401"));

        let err = VisionError::from_status("clarifai", StatusCode::TOO_MANY_REQUESTS, "".into());
        assert!(matches!(err, VisionError::RateLimited { .. }));
        assert!(err.to_string().contains("rate limit"));

        let err = VisionError::from_status("azure", StatusCode::BAD_REQUEST, "".into());
        assert!(matches!(err, VisionError::BadRequest { .. }));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

        let err = VisionError::from_status("azure", StatusCode::BAD_GATEWAY, "upstream".into());
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.to_string().contains("upstream"));
    }
}
