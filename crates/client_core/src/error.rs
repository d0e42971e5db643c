use shared::error::{ApiErrorBody, ApiException};
use thiserror::Error;

const TRANSPORT_FAILURE_MESSAGE: &str =
    "Unable to reach the catalog server; check your connection and retry.";
const DECODE_FAILURE_MESSAGE: &str = "The catalog server sent an unexpected response.";

/// Failure of a single collection read.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (refused, DNS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server error {0}")]
    Server(#[from] ApiException),
    #[error("failed to decode collection page: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn server(status: u16, message: Option<&str>) -> Self {
        let body = match message {
            Some(message) => ApiErrorBody::new(message),
            None => ApiErrorBody::default(),
        };
        Self::Server(ApiException::new(status, body))
    }

    /// Text suitable for a toast or alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => TRANSPORT_FAILURE_MESSAGE.to_string(),
            Self::Server(err) => match err.body.message() {
                Some(message) => message.to_string(),
                None => format!("Request failed with status {}; please retry.", err.status),
            },
            Self::Decode(_) => DECODE_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server(err) => Some(err.status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid catalog url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = FetchError::server(422, Some("Name is already taken"));
        assert_eq!(err.user_message(), "Name is already taken");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn server_without_message_falls_back_to_status() {
        let err = FetchError::server(503, None);
        assert_eq!(
            err.user_message(),
            "Request failed with status 503; please retry."
        );
    }

    #[test]
    fn transport_failure_hides_low_level_detail() {
        let err = FetchError::Transport("tcp connect error: Connection refused".into());
        assert_eq!(err.user_message(), TRANSPORT_FAILURE_MESSAGE);
        assert_eq!(err.status(), None);
    }
}
