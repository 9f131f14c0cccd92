use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Inappropriate content detected. Please rephrase your query.")]
    ModerationBlocked,

    #[error("Completion service error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Transport(String),

    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl Error {
    // user mistakes are 400, everything else is on us
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::ModerationBlocked => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::ModerationBlocked.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Upstream("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::Config("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_terminal_errors_are_labelled() {
        let err: Error = std::io::Error::other("not a tty").into();
        assert!(matches!(err, Error::Terminal(_)));
        assert_eq!(err.to_string(), "Terminal error: not a tty");
    }
}
