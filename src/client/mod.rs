//! Outbound HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! caller: request(method, path, options)
//!     → http_client.rs (join base_url + path, apply defaults)
//!     → interceptor.rs (request stage, registration order)
//!     → transport.rs (network call, bounded by timeout / cancel signal)
//!     → status check (2xx = success, anything else = ClientError::Status)
//!     → interceptor.rs (response stage, registration order)
//!     → caller receives ClientResponse or ClientError
//! ```
//!
//! # Design Decisions
//! - One client instance owns its RequestConfig; it is injected, never global
//! - `configure` takes `&mut self`, so defaults freeze once the client is shared
//! - Interceptors are handler pairs; a failure skips to the next failure branch
//! - Logging interceptors observe values, they never change them
//! - No retries: retry policy belongs to callers

pub mod error;
pub mod http_client;
pub mod interceptor;
pub mod request;
pub mod response;
pub mod transport;

pub use error::ClientError;
pub use http_client::HttpClient;
pub use interceptor::{LoggingInterceptor, RequestInterceptor, ResponseInterceptor};
pub use request::{cancel_pair, CancelHandle, CancelSignal, OutgoingRequest, RequestOptions};
pub use response::ClientResponse;
pub use transport::{ReqwestTransport, Transport};
