//! Transport collaborators.
//!
//! The connector hands a serialized request to a [`Transport`] and gets the raw response
//! text back. Transports do not retry; a failure ends the call.

pub mod http;

pub use http::HttpTransport;

use crate::errors::Result;
use async_trait::async_trait;

/// Sends one serialized request and returns the raw response body.
///
/// Implementations must be safe to share between concurrent calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a single request/response exchange.
    async fn send(&self, body: String) -> Result<String>;
}
