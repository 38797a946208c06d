//! Remote Call Gateway: the single request/response seam to the backend.
//!
//! Everything above this module talks to the backend through
//! [`Gateway::invoke`] with an operation name and an optional JSON argument
//! object. Implementations decide how the call travels.

mod http;
mod scripted;

pub use http::HttpGateway;
pub use scripted::{RecordedCall, ScriptedGateway};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Invoke the named backend operation.
    ///
    /// `args` is a JSON object keyed by parameter name, or `None` for
    /// operations without parameters. The returned value is the raw result;
    /// `Value::Null` for operations that return nothing.
    async fn invoke(&self, command: &str, args: Option<Value>) -> Result<Value, GatewayError>;
}
