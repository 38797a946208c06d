//! In-memory gateway with canned responses.
//!
//! Used by tests and for running the stores without a backend. Queued
//! responses are consumed first, in order; after that the fixed response
//! for the command (if any) is returned on every call.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::Gateway;
use crate::error::GatewayError;

type Scripted = Result<Value, GatewayError>;

/// One call observed by a [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub command: String,
    pub args: Option<Value>,
}

#[derive(Default)]
pub struct ScriptedGateway {
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    fixed: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `command` with `value`.
    pub fn respond(&self, command: &str, value: Value) -> &Self {
        self.set_fixed(command, Ok(value))
    }

    /// Reject every call to `command` with `message`.
    pub fn reject(&self, command: &str, message: &str) -> &Self {
        self.set_fixed(command, Err(GatewayError::rejected(command, message)))
    }

    /// Fail every call to `command` as if the backend were unreachable.
    pub fn disconnect(&self, command: &str) -> &Self {
        self.set_fixed(
            command,
            Err(GatewayError::transport(command, "connection refused")),
        )
    }

    /// Answer the next unanswered call to `command` with `value`.
    pub fn enqueue(&self, command: &str, value: Value) -> &Self {
        self.push_queued(command, Ok(value))
    }

    /// Fail the next unanswered call to `command` with `error`.
    pub fn enqueue_err(&self, command: &str, error: GatewayError) -> &Self {
        self.push_queued(command, Err(error))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Arguments of every call made to `command`, oldest first.
    pub fn calls_to(&self, command: &str) -> Vec<Option<Value>> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.command == command)
            .map(|c| c.args.clone())
            .collect()
    }

    fn set_fixed(&self, command: &str, response: Scripted) -> &Self {
        lock(&self.fixed).insert(command.to_string(), response);
        self
    }

    fn push_queued(&self, command: &str, response: Scripted) -> &Self {
        lock(&self.queued)
            .entry(command.to_string())
            .or_default()
            .push_back(response);
        self
    }
}

// A poisoned lock only means another test thread panicked mid-call; the
// maps themselves are still consistent.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn invoke(&self, command: &str, args: Option<Value>) -> Result<Value, GatewayError> {
        lock(&self.calls).push(RecordedCall {
            command: command.to_string(),
            args,
        });

        if let Some(next) = lock(&self.queued)
            .get_mut(command)
            .and_then(VecDeque::pop_front)
        {
            return next;
        }

        lock(&self.fixed)
            .get(command)
            .cloned()
            .unwrap_or_else(|| Err(GatewayError::rejected(command, "unknown command")))
    }
}
