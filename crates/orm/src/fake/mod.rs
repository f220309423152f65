//! Scripted in-memory driver
//!
//! `FakeConnection` records every statement it receives and answers with
//! queued results in order. When the queue is empty it answers with an empty
//! `QueryResult`. Used by the test suites and handy for downstream tests that
//! want to assert on emitted SQL without a server.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backends::{Connection, QueryResult, Row};
use crate::error::DriverError;

#[derive(Debug, Default)]
pub struct FakeConnection {
    responses: Mutex<VecDeque<Result<QueryResult, DriverError>>>,
    statements: Mutex<Vec<String>>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next unanswered statement
    pub fn push_result(&self, result: QueryResult) {
        self.lock_responses().push_back(Ok(result));
    }

    /// Queue a result carrying only rows
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.push_result(QueryResult::with_rows(rows));
    }

    /// Queue a driver failure
    pub fn push_error(&self, error: DriverError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Every statement received so far, in order
    pub fn statements(&self) -> Vec<String> {
        self.lock_statements().clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.lock_statements().last().cloned()
    }

    /// Number of queued results not consumed yet
    pub fn pending(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<QueryResult, DriverError>>> {
        self.responses.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_statements(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.statements.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Connection for FakeConnection {
    async fn query(&self, sql: &str) -> Result<QueryResult, DriverError> {
        self.lock_statements().push(sql.to_string());
        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResult::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_in_order_and_records() {
        let conn = FakeConnection::new();
        conn.push_result(QueryResult::inserted(3));
        conn.push_error(DriverError::new("boom"));

        assert_eq!(conn.query("A").await.unwrap().insert_id, 3);
        assert_eq!(conn.query("B").await.unwrap_err().message, "boom");
        assert_eq!(conn.query("C").await.unwrap(), QueryResult::default());

        assert_eq!(conn.statements(), vec!["A", "B", "C"]);
        assert_eq!(conn.last_statement().as_deref(), Some("C"));
        assert_eq!(conn.pending(), 0);
    }
}
