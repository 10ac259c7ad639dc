use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{CloseError, QueryError, ResponseError};
use crate::response::{self, SnowflakeResponse};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// An open, authenticated session.
///
/// Statements run one at a time and see the context (`USE DATABASE`, ...)
/// set by earlier statements. Once [closed](Self::close) the session refuses
/// further statements.
pub struct SnowflakeSession {
    client: reqwest::Client,
    host: String,
    token: Option<String>,
    sequence_id: u64,
}

impl std::fmt::Debug for SnowflakeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeSession")
            .field("host", &self.host)
            .field("open", &self.is_open())
            .field("sequence_id", &self.sequence_id)
            .finish()
    }
}

impl SnowflakeSession {
    pub(crate) fn new(client: reqwest::Client, host: String, token: String) -> Self {
        SnowflakeSession {
            client,
            host,
            token: Some(token),
            sequence_id: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.token.is_some()
    }

    pub fn sql(&mut self, statement: impl Into<String>) -> PendingQuery<'_> {
        PendingQuery {
            session: self,
            statement: statement.into(),
            timeout: None,
        }
    }

    pub async fn execute(&mut self, statement: &str) -> Result<QueryOutcome, QueryError> {
        self.sql(statement).execute().await
    }

    /// Deletes the session server side. Calling this again is a no-op.
    pub async fn close(&mut self) -> Result<(), CloseError> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };
        info!("closing session");
        response::send(
            self.client
                .post(format!("{}session", self.host))
                .query(&[("delete", "true")])
                .header(AUTHORIZATION, authorization(&token)),
        )
        .await
        .map_err(CloseError)?
        .into_data()
        .map_err(|failure| CloseError(ResponseError::Rejected(failure)))?;
        Ok(())
    }

    fn next_sequence_id(&mut self) -> u64 {
        self.sequence_id += 1;
        self.sequence_id
    }
}

fn authorization(token: &str) -> String {
    format!("Snowflake Token=\"{token}\"")
}

#[derive(Debug)]
pub struct PendingQuery<'s> {
    session: &'s mut SnowflakeSession,
    statement: String,
    timeout: Option<u32>,
}

impl<'s> PendingQuery<'s> {
    /// Seconds before Snowflake cancels the statement
    pub fn with_timeout(mut self, timeout: u32) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn execute(self) -> Result<QueryOutcome, QueryError> {
        let token = self.session.token.clone().ok_or(QueryError::Closed)?;
        let sequence_id = self.session.next_sequence_id();
        let body = QueryRequest {
            sql_text: &self.statement,
            async_exec: false,
            sequence_id,
            query_submission_time: chrono::Utc::now().timestamp_millis(),
            parameters: self.timeout.map(|statement_timeout_in_seconds| QueryParameters {
                statement_timeout_in_seconds,
            }),
        };
        debug!(sequence_id, sql = %self.statement, "executing statement");

        let client = &self.session.client;
        let host = &self.session.host;
        let mut response = response::send(
            client
                .post(format!("{host}queries/v1/query-request"))
                .query(&[("requestId", uuid::Uuid::new_v4().to_string())])
                .header(ACCEPT, HeaderValue::from_static("application/snowflake"))
                .header(AUTHORIZATION, authorization(&token))
                .json(&body),
        )
        .await
        .map_err(QueryError::Response)?;

        while response.in_progress() {
            let url = result_url(&response)?;
            debug!(sequence_id, %url, "statement still running");
            tokio::time::sleep(POLL_INTERVAL).await;
            response = response::send(
                client
                    .get(format!("{}{}", host, url.trim_start_matches('/')))
                    .header(ACCEPT, HeaderValue::from_static("application/snowflake"))
                    .header(AUTHORIZATION, authorization(&token)),
            )
            .await
            .map_err(QueryError::Response)?;
        }

        let data = response.into_data().map_err(|failure| {
            debug!(
                sequence_id,
                code = failure.code(),
                message = failure.message(),
                "statement failed"
            );
            QueryError::Failed(failure)
        })?;
        let outcome = if data.is_null() {
            QueryOutcome::default()
        } else {
            serde_json::from_value::<QueryOutcome>(data).map_err(QueryError::Payload)?
        };
        debug!(
            sequence_id,
            query_id = outcome.query_id().unwrap_or("N/A"),
            sql_state = outcome.sql_state().unwrap_or("N/A"),
            "statement finished"
        );
        Ok(outcome)
    }
}

fn result_url(response: &SnowflakeResponse) -> Result<String, QueryError> {
    let data = response
        .data
        .clone()
        .unwrap_or(serde_json::Value::Null);
    let progress: QueryProgress = serde_json::from_value(data).map_err(QueryError::Payload)?;
    Ok(progress.get_result_url)
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    sql_text: &'a str,
    async_exec: bool,
    sequence_id: u64,
    query_submission_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<QueryParameters>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct QueryParameters {
    statement_timeout_in_seconds: u32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryProgress {
    get_result_url: String,
}

/// What comes back from a finished statement. Rows are not decoded.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome {
    #[serde(default)]
    query_id: Option<String>,
    #[serde(default)]
    sql_state: Option<String>,
}

impl QueryOutcome {
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }
    pub fn sql_state(&self) -> Option<&str> {
        self.sql_state.as_deref()
    }
}
