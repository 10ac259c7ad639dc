use std::path::Path;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use errors::{
    CloseError, LoginError, NewSnowflakeConnectorError, QueryError, ResponseError,
    ResponseFailure,
};
pub use jwt::{KeyFileReadError, KeyPairError, KeyPairFromFileError, RS256KeyPair};
pub use session::{PendingQuery, QueryOutcome, SnowflakeSession};

mod errors;
mod jwt;
mod response;
mod session;

const CLIENT_APP_ID: &str = env!("CARGO_PKG_NAME");
const CLIENT_APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How the login request proves who we are.
pub enum Authenticator {
    Password(String),
    KeyPair(RS256KeyPair),
}

impl Authenticator {
    pub fn key_pair_from_file<P: AsRef<Path>>(
        private_key_path: P,
    ) -> Result<Self, KeyPairFromFileError> {
        jwt::key_pair_from_file(private_key_path).map(Authenticator::KeyPair)
    }
    fn name(&self) -> &'static str {
        match self {
            Authenticator::Password(_) => "SNOWFLAKE",
            Authenticator::KeyPair(_) => "SNOWFLAKE_JWT",
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Authenticator").field(&self.name()).finish()
    }
}

/// Knows where an account lives and how to log into it.
#[derive(Debug)]
pub struct SnowflakeConnector {
    host: String,
    account_name: String,
    user: String,
    role: Option<String>,
    client: reqwest::Client,
}

impl SnowflakeConnector {
    /// `account_identifier` may carry a region suffix (`xy12345.us-east-1`),
    /// it is also used as the host unless [with_host](Self::with_host) is called.
    pub fn try_new(
        account_identifier: &str,
        user: &str,
    ) -> Result<Self, NewSnowflakeConnectorError> {
        if account_identifier.trim().is_empty() {
            return Err(NewSnowflakeConnectorError::EmptyAccount);
        }
        if user.trim().is_empty() {
            return Err(NewSnowflakeConnectorError::EmptyUser);
        }
        let client = reqwest::Client::builder()
            .default_headers(Self::get_headers())
            .build()?;
        Ok(SnowflakeConnector {
            host: base_url(&account_identifier.to_ascii_lowercase()),
            account_name: account_name(account_identifier),
            user: user.to_ascii_uppercase(),
            role: None,
            client,
        })
    }
    /// Host is the part before `.snowflakecomputing.com`
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = base_url(host);
        self
    }
    /// Points every request at `base_url` instead of `https://{host}.snowflakecomputing.com/`
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.host = base_url;
        self
    }
    pub fn with_role<R: ToString>(mut self, role: R) -> Self {
        self.role = Some(role.to_string());
        self
    }
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Opens a session. Statements sent through it share `USE ...` context.
    pub async fn connect(
        &self,
        authenticator: Authenticator,
    ) -> Result<SnowflakeSession, LoginError> {
        let token = match &authenticator {
            Authenticator::KeyPair(key_pair) => {
                Some(jwt::create_token(key_pair, &self.account_name, &self.user)?)
            }
            Authenticator::Password(_) => None,
        };
        let body = LoginRequest {
            data: LoginRequestData {
                client_app_id: CLIENT_APP_ID,
                client_app_version: CLIENT_APP_VERSION,
                account_name: &self.account_name,
                login_name: &self.user,
                authenticator: authenticator.name(),
                password: match &authenticator {
                    Authenticator::Password(password) => Some(password.as_str()),
                    Authenticator::KeyPair(_) => None,
                },
                token: token.as_deref(),
            },
        };

        let mut query = vec![("request_id", uuid::Uuid::new_v4().to_string())];
        if let Some(role) = &self.role {
            query.push(("roleName", role.clone()));
        }

        info!(account = %self.account_name, user = %self.user, "logging in");
        let data = response::send(
            self.client
                .post(format!("{}session/v1/login-request", self.host))
                .query(&query)
                .json(&body),
        )
        .await
        .map_err(LoginError::Response)?
        .into_data()
        .map_err(|failure| LoginError::Response(ResponseError::Rejected(failure)))?;

        let login: LoginResponseData = serde_json::from_value(data).map_err(LoginError::Payload)?;
        let token = login.token.ok_or(LoginError::MissingToken)?;
        info!(session_id = ?login.session_id, "session opened");
        Ok(SnowflakeSession::new(
            self.client.clone(),
            self.host.clone(),
            token,
        ))
    }

    fn get_headers() -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(3);
        headers.append(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append(ACCEPT, HeaderValue::from_static("application/json"));
        headers.append(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                '/',
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers
    }
}

fn base_url(host: &str) -> String {
    format!("https://{host}.snowflakecomputing.com/")
}

/// `xy12345.us-east-1` logs in as `XY12345`
fn account_name(account_identifier: &str) -> String {
    account_identifier
        .split('.')
        .next()
        .unwrap_or(account_identifier)
        .trim()
        .to_ascii_uppercase()
}

#[derive(Serialize, Debug)]
struct LoginRequest<'a> {
    data: LoginRequestData<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct LoginRequestData<'a> {
    client_app_id: &'a str,
    client_app_version: &'a str,
    account_name: &'a str,
    login_name: &'a str,
    authenticator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LoginResponseData {
    token: Option<String>,
    session_id: Option<i64>,
}
