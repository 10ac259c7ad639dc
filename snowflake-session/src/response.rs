use serde::Deserialize;

use crate::errors::{ResponseError, ResponseFailure};

/// Query still running, poll `getResultUrl`.
pub(crate) const QUERY_IN_PROGRESS: &str = "333333";
/// Query still running asynchronously, poll `getResultUrl`.
pub(crate) const QUERY_IN_PROGRESS_ASYNC: &str = "333334";

/// The envelope every session endpoint answers with.
#[derive(Deserialize, Debug)]
pub(crate) struct SnowflakeResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub success: bool,
}

impl SnowflakeResponse {
    pub fn in_progress(&self) -> bool {
        matches!(
            self.code.as_deref(),
            Some(QUERY_IN_PROGRESS) | Some(QUERY_IN_PROGRESS_ASYNC)
        )
    }
    pub fn into_data(self) -> Result<serde_json::Value, ResponseFailure> {
        if self.success {
            Ok(self.data.unwrap_or(serde_json::Value::Null))
        } else {
            Err(ResponseFailure::new(self.code, self.message))
        }
    }
}

pub(crate) async fn send(
    request: reqwest::RequestBuilder,
) -> Result<SnowflakeResponse, ResponseError> {
    let response = request.send().await.map_err(ResponseError::Request)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ResponseError::Status(status));
    }
    response
        .json::<SnowflakeResponse>()
        .await
        .map_err(ResponseError::Decode)
}
