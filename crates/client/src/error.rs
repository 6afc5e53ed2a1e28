use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The session is missing or expired; the caller should log in again.
    #[error("not logged in")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_variants() {
        let cases = [
            (StatusCode::UNAUTHORIZED, "Unauthorized"),
            (StatusCode::FORBIDDEN, "Forbidden"),
            (StatusCode::NOT_FOUND, "NotFound"),
            (StatusCode::CONFLICT, "Conflict"),
            (StatusCode::UNPROCESSABLE_ENTITY, "Validation"),
            (StatusCode::BAD_REQUEST, "Server"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Server"),
        ];
        for (status, expected) in cases {
            let err = ClientError::from_status(status, "boom".to_string());
            let name = format!("{err:?}");
            assert!(name.starts_with(expected), "{status}: {name}");
        }
    }

    #[test]
    fn conflict_keeps_the_server_message() {
        let err = ClientError::from_status(StatusCode::CONFLICT, "name taken".to_string());
        assert_eq!(err.to_string(), "conflict: name taken");
        assert!(ClientError::from_status(StatusCode::UNAUTHORIZED, String::new()).is_unauthorized());
    }
}
