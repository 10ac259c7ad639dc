use async_trait::async_trait;
use snowflake_session::{CloseError, QueryError, SnowflakeSession};

/// The two things the provisioner needs from a database session.
#[async_trait]
pub trait Session: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn execute(&mut self, sql: &str) -> Result<(), Self::Error>;

    async fn close(&mut self) -> Result<(), Self::Error>;
}

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Execute(#[from] QueryError),
    #[error(transparent)]
    Close(#[from] CloseError),
}

#[async_trait]
impl Session for SnowflakeSession {
    type Error = DriverError;

    async fn execute(&mut self, sql: &str) -> Result<(), Self::Error> {
        SnowflakeSession::execute(self, sql).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        Ok(SnowflakeSession::close(self).await?)
    }
}
