use crate::jwt::KeyPairError;

/// Error creating a new [SnowflakeConnector](crate::SnowflakeConnector)
#[derive(thiserror::Error, Debug)]
pub enum NewSnowflakeConnectorError {
    #[error("account identifier must not be empty")]
    EmptyAccount,
    #[error("user must not be empty")]
    EmptyUser,
    #[error(transparent)]
    ClientBuildError(#[from] reqwest::Error),
}

/// Error opening a session
#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error("could not generate JWT token: {0}")]
    Token(#[from] KeyPairError),
    #[error("login request failed: {0}")]
    Response(#[source] ResponseError),
    #[error("failed to parse login response: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("login response did not contain a session token")]
    MissingToken,
}

/// Error running a single SQL statement
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("session is closed")]
    Closed,
    #[error(transparent)]
    Response(ResponseError),
    #[error("statement failed: {0}")]
    Failed(#[source] ResponseFailure),
    #[error("failed to parse query response: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Error closing a session
#[derive(thiserror::Error, Debug)]
#[error("could not close session: {0}")]
pub struct CloseError(#[source] pub ResponseError);

/// Anything that goes wrong between sending a request and reading Snowflake's envelope
#[derive(thiserror::Error, Debug)]
pub enum ResponseError {
    #[error(transparent)]
    Request(reqwest::Error),
    #[error("unexpected status code: {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Decode(reqwest::Error),
    #[error(transparent)]
    Rejected(ResponseFailure),
}

/// Snowflake answered, but with `"success": false`
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct ResponseFailure {
    code: String,
    message: String,
}

impl ResponseFailure {
    pub(crate) fn new(code: Option<String>, message: Option<String>) -> Self {
        ResponseFailure {
            code: code.unwrap_or_else(|| "N/A".into()),
            message: message.unwrap_or_else(|| "no message".into()),
        }
    }
    pub fn code(&self) -> &str {
        &self.code
    }
    pub fn message(&self) -> &str {
        &self.message
    }
}
