//! HTTP and live-channel client for the Raksha alert backend.
//!
//! [`GatewayClient`] wraps the five request/response operations and the
//! WebSocket alert subscription. Every call is a single attempt: there is no
//! retry, backoff or timeout policy, and failures come back as [`ApiError`].

mod client;
mod endpoints;
mod error;
mod live;

pub use client::GatewayClient;
pub use endpoints::Endpoints;
pub use error::ApiError;
pub use error::ApiResult;
pub use live::AlertSubscription;
