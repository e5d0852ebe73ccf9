//! HTTP layer: request/response types, the injectable transport boundary,
//! the retry policy and the retrying client that ties them together.

pub mod client;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::{HttpClient, HttpClientConfig};
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
pub use types::{Headers, HttpMethod, RequestOptions, RequestSpec, ResponseEnvelope};
