//! Mock transport clients for testing
//!
//! Both mocks share their state behind an `Arc`, so a test keeps a clone to
//! inspect what the sink did after handing the original over.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use contracts::ContractError;

use crate::transport::{KeyValueClient, MessagePublisher};

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<(String, Bytes)>,
    attempts: usize,
    fail_on: HashSet<usize>,
    flush_count: usize,
    close_count: usize,
    fail_close: bool,
}

/// Mock message broker
///
/// Publish attempts are numbered from 0; attempts listed via `fail_on` are
/// rejected with a write error.
#[derive(Debug, Clone, Default)]
pub struct MockPublisher {
    state: Arc<Mutex<PublisherState>>,
}

impl MockPublisher {
    /// Create a mock that acknowledges everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the given publish attempts
    pub fn fail_on(self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.state.lock().unwrap().fail_on.extend(attempts);
        self
    }

    /// Make `close` return an error
    pub fn fail_close(self) -> Self {
        self.state.lock().unwrap().fail_close = true;
        self
    }

    /// Acknowledged messages, in publish order
    pub fn published(&self) -> Vec<(String, Bytes)> {
        self.state.lock().unwrap().published.clone()
    }

    /// Total publish attempts, including rejected ones
    pub fn attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }

    pub fn flush_count(&self) -> usize {
        self.state.lock().unwrap().flush_count
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().close_count
    }
}

impl MessagePublisher for MockPublisher {
    async fn publish(
        &mut self,
        topic: &str,
        payload: Bytes,
        _ack_timeout: Duration,
    ) -> Result<(), ContractError> {
        let mut state = self.state.lock().unwrap();
        let attempt = state.attempts;
        state.attempts += 1;

        if state.fail_on.contains(&attempt) {
            return Err(ContractError::sink_write(
                "queue",
                format!("mock rejected message {attempt}"),
            ));
        }
        state.published.push((topic.to_string(), payload));
        Ok(())
    }

    async fn flush(&mut self, _timeout: Duration) -> Result<(), ContractError> {
        self.state.lock().unwrap().flush_count += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        let mut state = self.state.lock().unwrap();
        state.close_count += 1;
        if state.fail_close {
            return Err(ContractError::sink_connection("queue", "mock close failure"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct KeyValueState {
    store: Vec<(String, String)>,
    pending: Vec<(String, String)>,
    queued: usize,
    fail_set_on: HashSet<usize>,
    flush_sizes: Vec<usize>,
    fail_flush: bool,
    close_count: usize,
    fail_close: bool,
}

/// Mock key-value store
///
/// `queue_set` calls are numbered from 0; calls listed via `fail_set_on` are
/// rejected before reaching the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MockKeyValueClient {
    state: Arc<Mutex<KeyValueState>>,
}

impl MockKeyValueClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the given `queue_set` calls
    pub fn fail_set_on(self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.state.lock().unwrap().fail_set_on.extend(calls);
        self
    }

    /// Make every flush fail (the pending writes are dropped)
    pub fn fail_flush(self) -> Self {
        self.state.lock().unwrap().fail_flush = true;
        self
    }

    /// Make `close` return an error
    pub fn fail_close(self) -> Self {
        self.state.lock().unwrap().fail_close = true;
        self
    }

    /// Flushed writes, in write order
    pub fn stored(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().store.clone()
    }

    /// Value stored under `key`, latest write wins
    pub fn get(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .store
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Size of every flush round trip, in order
    pub fn flush_sizes(&self) -> Vec<usize> {
        self.state.lock().unwrap().flush_sizes.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().close_count
    }
}

impl KeyValueClient for MockKeyValueClient {
    fn queue_set(&mut self, key: &str, value: &str) -> Result<(), ContractError> {
        let mut state = self.state.lock().unwrap();
        let call = state.queued;
        state.queued += 1;

        if state.fail_set_on.contains(&call) {
            return Err(ContractError::sink_write("store", format!("mock rejected write {call}")));
        }
        state.pending.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn pending(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    async fn flush(&mut self) -> Result<usize, ContractError> {
        let mut state = self.state.lock().unwrap();
        if state.pending.is_empty() {
            return Ok(0);
        }
        let batch = std::mem::take(&mut state.pending);
        let sent = batch.len();
        state.flush_sizes.push(sent);

        if state.fail_flush {
            return Err(ContractError::sink_write("store", "mock pipeline failure"));
        }
        state.store.extend(batch);
        Ok(sent)
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        let mut state = self.state.lock().unwrap();
        state.close_count += 1;
        if state.fail_close {
            return Err(ContractError::sink_connection("store", "mock close failure"));
        }
        Ok(())
    }
}
