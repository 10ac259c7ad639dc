use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::session::Session;

#[derive(Debug, Default)]
struct Recorded {
    statements: Vec<String>,
    closes: usize,
    closed_after: Option<usize>,
}

/// Shared view on what a [FakeSession] saw, usable after the session was moved.
#[derive(Clone, Debug, Default)]
pub struct SessionLog(Arc<Mutex<Recorded>>);

impl SessionLog {
    pub fn statements(&self) -> Vec<String> {
        self.0.lock().unwrap().statements.clone()
    }
    pub fn closes(&self) -> usize {
        self.0.lock().unwrap().closes
    }
    /// No statement was sent after the session was closed.
    pub fn closed_last(&self) -> bool {
        let recorded = self.0.lock().unwrap();
        recorded.closed_after == Some(recorded.statements.len())
    }
}

/// Records statements instead of sending them.
#[derive(Debug, Default)]
pub struct FakeSession {
    log: SessionLog,
    fail_at: Option<usize>,
    fail_close: bool,
}

impl FakeSession {
    /// The `n`th statement (1-based) fails.
    pub fn failing_at(n: usize) -> Self {
        FakeSession {
            fail_at: Some(n),
            ..Default::default()
        }
    }
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
    pub fn log(&self) -> SessionLog {
        self.log.clone()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FakeSessionError {
    #[error("statement failed: {0}")]
    Execute(String),
    #[error("close failed")]
    Close,
}

#[async_trait]
impl Session for FakeSession {
    type Error = FakeSessionError;

    async fn execute(&mut self, sql: &str) -> Result<(), Self::Error> {
        let mut recorded = self.log.0.lock().unwrap();
        recorded.statements.push(sql.to_owned());
        if self.fail_at == Some(recorded.statements.len()) {
            return Err(FakeSessionError::Execute(sql.to_owned()));
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        let mut recorded = self.log.0.lock().unwrap();
        recorded.closes += 1;
        recorded.closed_after = Some(recorded.statements.len());
        if self.fail_close {
            return Err(FakeSessionError::Close);
        }
        Ok(())
    }
}
