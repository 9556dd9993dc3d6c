//! Error types for the session crate

use feedlens_core::{Error, ErrorCode};
use feedlens_feed::{SourceError, UserId};
use feedlens_search::SearchError;
use thiserror::Error;

/// Session errors
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// Selection refers to an id outside the loaded user set
    #[error("no user with id {0}")]
    UnknownUser(UserId),

    /// A profile is open; close it before selecting another user
    #[error("cannot select a user while the detail view is open")]
    SelectionUnavailable,

    /// Matcher options were rejected
    #[error("invalid search settings: {0}")]
    Search(#[from] SearchError),

    /// The initial feed or user load failed
    #[error("failed to load feed: {0}")]
    Load(#[from] SourceError),
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownUser(id) => Error::unknown_user(id.0),
            SessionError::SelectionUnavailable => Error::new(
                ErrorCode::SessionError,
                SessionError::SelectionUnavailable.to_string(),
            )
            .with_suggestion("Close the open profile first"),
            SessionError::Search(e) => Error::validation(e.to_string()),
            SessionError::Load(e) => source_failure(&e),
        }
    }
}

fn source_failure(err: &SourceError) -> Error {
    match err {
        SourceError::Transport(_) => Error::transport(err.to_string()),
        SourceError::Status { .. } => Error::new(ErrorCode::RemoteError, err.to_string()),
        SourceError::Malformed(_) => Error::new(ErrorCode::MalformedPayload, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedlens_core::error::exit_codes;
    use feedlens_search::SearchError;

    #[test]
    fn test_exit_codes() {
        let err = Error::from(SessionError::UnknownUser(UserId(99)));
        assert_eq!(err.code, ErrorCode::UnknownUser);
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_ERROR);

        let err = Error::from(SessionError::Search(SearchError::EmptyQuery));
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_ERROR);

        let err = Error::from(SessionError::Load(SourceError::Transport("refused".into())));
        assert_eq!(err.exit_code(), exit_codes::TRANSPORT_ERROR);

        let err = Error::from(SessionError::Load(SourceError::Status {
            status: 500,
            message: "boom".into(),
        }));
        assert_eq!(err.code, ErrorCode::RemoteError);
        assert_eq!(err.exit_code(), exit_codes::TRANSPORT_ERROR);
    }
}
